//! Deep Zoom Image (DZI) descriptor parsing and pyramid level math.
//!
//! # DZI Level Numbering
//!
//! Deep Zoom numbers levels from 0 (a 1x1 pixel image) up to
//! `max_level = ceil(log2(max(width, height)))` (full resolution). Each
//! level halves the one above it, rounding up.
//!
//! The rendering engine instead numbers zoom levels from 0 at the coarsest
//! tier where the whole image fits in roughly one tile. The levels below
//! `tile_size` pixels are never requested, so the engine's zoom `z` is
//! served from DZI level `z + level_offset`, where
//! `level_offset = ceil(log2(tile_size))`.

use serde::Serialize;

/// Exact `ceil(log2(n))` for `n >= 1`, computed without floating point.
///
/// Returns 0 for `n <= 1`.
#[inline]
pub fn ceil_log2(n: u32) -> u32 {
    if n <= 1 {
        return 0;
    }
    u32::BITS - (n - 1).leading_zeros()
}

/// Pyramid metadata parsed from a DZI descriptor.
///
/// Immutable once parsed. Owned by the tile source it configures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PyramidDescriptor {
    /// Edge length of a square tile in pixels
    pub tile_size: u32,

    /// Overlap between neighbouring tiles in pixels
    pub overlap: u32,

    /// Tile file extension (e.g. "jpg", "jpeg", "png")
    pub format: String,

    /// Full-resolution width in pixels
    pub width: u32,

    /// Full-resolution height in pixels
    pub height: u32,
}

impl PyramidDescriptor {
    /// Parse a DZI XML document.
    ///
    /// The root `Image` element carries `TileSize`, `Format` and an optional
    /// `Overlap`; its first `Size` child carries `Width` and `Height`.
    /// Namespaces are ignored. `Format` must be alphanumeric since it ends
    /// up both in tile URLs and in file names.
    ///
    /// Returns a human-readable reason on failure.
    pub fn parse(xml: &str) -> Result<Self, String> {
        let doc = roxmltree::Document::parse(xml).map_err(|e| format!("invalid XML: {}", e))?;

        let image = doc.root_element();
        if image.tag_name().name() != "Image" {
            return Err(format!(
                "root element is {:?}, expected Image",
                image.tag_name().name()
            ));
        }

        let size = image
            .children()
            .find(|n| n.is_element() && n.tag_name().name() == "Size")
            .ok_or_else(|| "missing Size element".to_string())?;

        let tile_size = positive_attr(&image, "TileSize")?;
        let width = positive_attr(&size, "Width")?;
        let height = positive_attr(&size, "Height")?;

        let overlap = match image.attribute("Overlap") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("Overlap is not a non-negative integer: {:?}", raw))?,
            None => 0,
        };

        let format = image
            .attribute("Format")
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .ok_or_else(|| "missing Format attribute".to_string())?;
        if !format.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!("Format is not a file extension: {:?}", format));
        }
        let format = format.to_string();

        Ok(Self {
            tile_size,
            overlap,
            format,
            width,
            height,
        })
    }

    /// Offset between the rendering engine's zoom levels and DZI levels.
    ///
    /// `ceil(log2(tile_size))`: 256 -> 8, 512 -> 9, 300 -> 9.
    pub fn level_offset(&self) -> u32 {
        ceil_log2(self.tile_size)
    }

    /// Highest DZI level (full resolution).
    ///
    /// `max_level = ceil(log2(max(width, height)))`
    pub fn max_level(&self) -> u32 {
        ceil_log2(self.width.max(self.height))
    }
}

fn positive_attr(node: &roxmltree::Node<'_, '_>, name: &str) -> Result<u32, String> {
    let raw = node
        .attribute(name)
        .ok_or_else(|| format!("missing {} attribute", name))?;

    match raw.trim().parse::<u32>() {
        Ok(0) => Err(format!("{} must be positive", name)),
        Ok(value) => Ok(value),
        Err(_) => Err(format!("{} is not an integer: {:?}", name, raw)),
    }
}

//! Zoomify-style tile grid for a single image.
//!
//! The grid is built the way the rendering engine builds it for a Zoomify
//! source: starting from the full image, the tile span doubles until one
//! tile covers the whole image. Tier 0 is a single tile; the last tier is the
//! full-resolution image at resolution 1.

use serde::Serialize;

use super::coord::TileCoord;
use crate::descriptor::PyramidDescriptor;
use crate::view::Extent;

/// Guards tile boundaries against floating point noise.
const EPSILON: f64 = 0.000_000_1;

/// Tile layout of every zoom tier of an image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileGrid {
    tile_size: u32,
    width: u32,
    height: u32,

    /// `(columns, rows)` per tier, coarsest first
    tiers: Vec<(u32, u32)>,

    /// Map units per pixel per tier, coarsest first
    resolutions: Vec<f64>,
}

impl TileGrid {
    /// Build the grid for a `width x height` image cut into `tile_size` tiles.
    pub fn new(width: u32, height: u32, tile_size: u32) -> Self {
        let tile_size = tile_size.max(1);
        let (w, h) = (width as u64, height as u64);

        let mut tiers = Vec::new();
        let mut span = tile_size as u64;
        while w > span || h > span {
            tiers.push((w.div_ceil(span) as u32, h.div_ceil(span) as u32));
            span *= 2;
        }
        tiers.push((1, 1));
        tiers.reverse();

        let last = tiers.len() - 1;
        let resolutions = (0..tiers.len())
            .map(|z| 2f64.powi((last - z) as i32))
            .collect();

        Self {
            tile_size,
            width,
            height,
            tiers,
            resolutions,
        }
    }

    pub fn for_descriptor(descriptor: &PyramidDescriptor) -> Self {
        Self::new(descriptor.width, descriptor.height, descriptor.tile_size)
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn tier_count(&self) -> u32 {
        self.tiers.len() as u32
    }

    /// Highest zoom, the full-resolution tier.
    pub fn max_zoom(&self) -> u32 {
        self.tier_count() - 1
    }

    /// `(columns, rows)` at zoom `z`.
    pub fn tier_size(&self, z: u32) -> Option<(u32, u32)> {
        self.tiers.get(z as usize).copied()
    }

    pub fn resolution(&self, z: u32) -> Option<f64> {
        self.resolutions.get(z as usize).copied()
    }

    /// Resolutions ordered coarsest first.
    pub fn resolutions(&self) -> &[f64] {
        &self.resolutions
    }

    pub fn extent(&self) -> Extent {
        Extent::for_image(self.width, self.height)
    }

    /// Whether `coord` names a tile of this grid.
    pub fn contains(&self, coord: TileCoord) -> bool {
        self.tier_size(coord.z)
            .is_some_and(|(cols, rows)| coord.x < cols && coord.y < rows)
    }

    /// DZI level the grid's top zoom lines up with.
    ///
    /// For power-of-two tile sizes this equals the descriptor's level
    /// offset. Other tile sizes make the two diverge, which callers report.
    pub fn descriptor_level_offset(&self, descriptor: &PyramidDescriptor) -> u32 {
        descriptor.max_level().saturating_sub(self.max_zoom())
    }

    /// Zoom whose resolution is nearest to `resolution`.
    pub fn zoom_for_resolution(&self, resolution: f64) -> u32 {
        nearest_zoom(&self.resolutions, resolution)
    }

    /// Tiles at zoom `z` that intersect `extent`, or `None` if none do.
    pub fn tile_range_for_extent(&self, extent: &Extent, z: u32) -> Option<TileRange> {
        let (cols, rows) = self.tier_size(z)?;
        let resolution = self.resolution(z)?;
        let span = self.tile_size as f64 * resolution;
        let (origin_x, origin_y) = self.extent().top_left();

        let min_col = ((extent.min_x - origin_x) / span + EPSILON).floor();
        let max_col = ((extent.max_x - origin_x) / span - EPSILON).ceil() - 1.0;
        let min_row = ((origin_y - extent.max_y) / span + EPSILON).floor();
        let max_row = ((origin_y - extent.min_y) / span - EPSILON).ceil() - 1.0;

        if max_col < 0.0 || max_row < 0.0 || min_col >= cols as f64 || min_row >= rows as f64 {
            return None;
        }

        let clamp = |v: f64, limit: u32| v.max(0.0).min((limit - 1) as f64) as u32;
        let range = TileRange {
            z,
            min_x: clamp(min_col, cols),
            min_y: clamp(min_row, rows),
            max_x: clamp(max_col, cols),
            max_y: clamp(max_row, rows),
        };

        (range.min_x <= range.max_x && range.min_y <= range.max_y).then_some(range)
    }
}

/// Index of the entry nearest to `resolution` in a descending ladder.
///
/// Ties go to the coarser entry. Values beyond either end of the ladder
/// resolve to that end.
pub(crate) fn nearest_zoom(ladder: &[f64], resolution: f64) -> u32 {
    let Some(last) = ladder.len().checked_sub(1) else {
        return 0;
    };
    if resolution >= ladder[0] {
        return 0;
    }
    if resolution <= ladder[last] {
        return last as u32;
    }
    for z in 1..=last {
        if ladder[z] <= resolution {
            let coarser = ladder[z - 1] - resolution;
            let finer = resolution - ladder[z];
            return if coarser <= finer { (z - 1) as u32 } else { z as u32 };
        }
    }
    last as u32
}

/// Inclusive rectangle of tiles at one zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileRange {
    pub z: u32,
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl TileRange {
    pub fn count(&self) -> usize {
        let cols = (self.max_x - self.min_x + 1) as usize;
        let rows = (self.max_y - self.min_y + 1) as usize;
        cols * rows
    }

    /// Tiles in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (self.min_y..=self.max_y)
            .flat_map(move |y| (self.min_x..=self.max_x).map(move |x| TileCoord::new(self.z, x, y)))
    }
}

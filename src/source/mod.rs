//! Tile source loading.
//!
//! A [`TileSource`] is everything the viewer needs to draw an image: the
//! parsed descriptor, the tile URL resolver, the tile grid and the image
//! extent. It only exists once the descriptor has been fetched and parsed,
//! so any code holding one can rely on a configured layer.
//!
//! ```text
//! descriptor URL ──fetch──▶ XML ──parse──▶ PyramidDescriptor
//!                                               │
//!                    ┌──────────────────────────┼──────────────────┐
//!                    ▼                          ▼                  ▼
//!             TileUrlResolver               TileGrid             Extent
//! ```

mod loader;

pub use loader::{load_tile_source, LoadOptions, DEFAULT_CROSS_ORIGIN};

use serde::Serialize;

use crate::descriptor::PyramidDescriptor;
use crate::error::TileError;
use crate::tile::{TileCoord, TileGrid, TileUrlResolver};
use crate::view::{Extent, View};

/// A configured deep zoom tile source.
#[derive(Debug, Clone)]
pub struct TileSource {
    descriptor_url: String,
    descriptor: PyramidDescriptor,
    resolver: TileUrlResolver,
    grid: TileGrid,
    options: LoadOptions,
}

impl TileSource {
    pub fn descriptor_url(&self) -> &str {
        &self.descriptor_url
    }

    pub fn descriptor(&self) -> &PyramidDescriptor {
        &self.descriptor
    }

    pub fn resolver(&self) -> &TileUrlResolver {
        &self.resolver
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// `[0, -height, width, 0]`
    pub fn extent(&self) -> Extent {
        self.grid.extent()
    }

    /// URL of the tile at engine coordinate `coord`.
    ///
    /// Coordinates outside the grid still resolve; only a zoom whose DZI
    /// level overflows is rejected.
    pub fn tile_url(&self, coord: TileCoord) -> Result<String, TileError> {
        self.resolver.resolve(coord)
    }

    /// A fresh view over this source, not yet fitted.
    pub fn view(&self) -> View {
        View::for_grid(&self.grid)
    }

    /// Tiles the rendering engine requests to draw `view` in a viewport.
    ///
    /// Uses the zoom nearest to the view resolution and every tile of that
    /// zoom intersecting the visible extent, in row-major order.
    pub fn tiles_for_view(&self, view: &View, viewport: (u32, u32)) -> Vec<TileCoord> {
        let z = self.grid.zoom_for_resolution(view.resolution());
        let visible = view.visible_extent(viewport);
        match self.grid.tile_range_for_extent(&visible, z) {
            Some(range) => range.coords().collect(),
            None => Vec::new(),
        }
    }

    /// Summary used by the CLI's `inspect` output.
    pub fn summary(&self) -> SourceSummary {
        SourceSummary {
            descriptor_url: self.descriptor_url.clone(),
            tile_url_template: self.resolver.template().to_string(),
            level_offset: self.resolver.level_offset(),
            max_level: self.descriptor.max_level(),
            tier_count: self.grid.tier_count(),
            extent: self.extent().to_array(),
            resolutions: self.grid.resolutions().to_vec(),
            descriptor: self.descriptor.clone(),
        }
    }
}

/// Serializable description of a loaded source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub descriptor_url: String,
    pub tile_url_template: String,
    pub level_offset: u32,
    pub max_level: u32,
    pub tier_count: u32,
    pub extent: [f64; 4],
    pub resolutions: Vec<f64>,
    pub descriptor: PyramidDescriptor,
}

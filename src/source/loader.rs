use serde::Serialize;
use tracing::{debug, info, warn};

use super::TileSource;
use crate::descriptor::PyramidDescriptor;
use crate::error::DescriptorError;
use crate::io::Fetcher;
use crate::tile::{TileGrid, TileUrlResolver};

/// Cross-origin mode tiles are requested with by default.
pub const DEFAULT_CROSS_ORIGIN: &str = "anonymous";

/// Presentation options carried alongside a tile source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadOptions {
    /// Attribution text shown over the map
    pub attributions: Option<String>,

    /// CORS mode for tile image requests
    pub cross_origin: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            attributions: None,
            cross_origin: DEFAULT_CROSS_ORIGIN.to_string(),
        }
    }
}

/// Fetch and parse the descriptor at `url`, producing a configured source.
///
/// Nothing is retried. Any failure leaves the caller without a source and
/// with the reason in the returned error.
pub async fn load_tile_source<F: Fetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    options: LoadOptions,
) -> Result<TileSource, DescriptorError> {
    debug!(url = %url, "Loading descriptor");

    let xml = fetcher
        .fetch_text(url)
        .await
        .map_err(|source| DescriptorError::Unavailable {
            url: url.to_string(),
            source,
        })?;

    let descriptor =
        PyramidDescriptor::parse(&xml).map_err(|reason| DescriptorError::Malformed {
            url: url.to_string(),
            reason,
        })?;

    let resolver = TileUrlResolver::for_descriptor(url, &descriptor)?;
    let grid = TileGrid::for_descriptor(&descriptor);

    let grid_offset = grid.descriptor_level_offset(&descriptor);
    if grid_offset != resolver.level_offset() {
        warn!(
            url = %url,
            tile_size = descriptor.tile_size,
            level_offset = resolver.level_offset(),
            grid_level_offset = grid_offset,
            "Tile size is not a power of two; zoom levels may not line up with DZI levels"
        );
    }

    info!(
        url = %url,
        width = descriptor.width,
        height = descriptor.height,
        tile_size = descriptor.tile_size,
        level_offset = resolver.level_offset(),
        tiers = grid.tier_count(),
        "Tile source configured"
    );

    Ok(TileSource {
        descriptor_url: url.to_string(),
        descriptor,
        resolver,
        grid,
        options,
    })
}

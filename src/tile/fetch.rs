use bytes::Bytes;
use tracing::{debug, warn};

use super::coord::TileCoord;
use super::grid::TileGrid;
use super::resolver::TileUrlResolver;
use crate::error::TileError;
use crate::io::Fetcher;

/// A tile body together with where it came from.
#[derive(Debug, Clone)]
pub struct FetchedTile {
    pub coord: TileCoord,
    pub url: String,
    pub data: Bytes,
}

/// Fetches tiles of one image.
///
/// Failures are per tile: a missing tile yields a [`TileError`] for that
/// coordinate and leaves every other request untouched.
pub struct TileFetcher<'a, F: Fetcher + ?Sized> {
    fetcher: &'a F,
    resolver: &'a TileUrlResolver,
    grid: &'a TileGrid,
}

impl<'a, F: Fetcher + ?Sized> TileFetcher<'a, F> {
    pub fn new(fetcher: &'a F, resolver: &'a TileUrlResolver, grid: &'a TileGrid) -> Self {
        Self {
            fetcher,
            resolver,
            grid,
        }
    }

    /// Fetch a single tile.
    pub async fn fetch_tile(&self, coord: TileCoord) -> Result<FetchedTile, TileError> {
        if !self.grid.contains(coord) {
            return Err(TileError::OutOfRange { coord });
        }

        let url = self.resolver.resolve(coord)?;
        match self.fetcher.fetch(&url).await {
            Ok(data) => {
                debug!(tile = %coord, bytes = data.len(), "Fetched tile");
                Ok(FetchedTile { coord, url, data })
            }
            Err(source) => Err(TileError::Unavailable { coord, url, source }),
        }
    }

    /// Fetch every tile in `coords`, in order.
    ///
    /// The result has one entry per requested coordinate.
    pub async fn fetch_all<I>(&self, coords: I) -> Vec<Result<FetchedTile, TileError>>
    where
        I: IntoIterator<Item = TileCoord>,
    {
        let mut results = Vec::new();
        for coord in coords {
            let result = self.fetch_tile(coord).await;
            if let Err(ref e) = result {
                warn!(tile = %coord, error = %e, "Tile load failed");
            }
            results.push(result);
        }
        results
    }
}

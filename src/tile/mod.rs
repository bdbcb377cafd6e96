//! Tile addressing and retrieval.
//!
//! Maps the rendering engine's tile coordinates onto the DZI tile tree and
//! fetches the resulting tiles.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │        TileCoord (z, x, y)               │
//! └────────────────────┬─────────────────────┘
//!                      │
//!          ┌───────────┴────────────┐
//!          ▼                        ▼
//! ┌─────────────────┐     ┌─────────────────────┐
//! │    TileGrid     │     │   TileUrlResolver   │
//! │  (tiers, res,   │     │  (template +        │
//! │   bounds)       │     │   level offset)     │
//! └────────┬────────┘     └──────────┬──────────┘
//!          │                         │
//!          └───────────┬─────────────┘
//!                      ▼
//! ┌──────────────────────────────────────────┐
//! │     TileFetcher  →  Fetcher (HTTP)       │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`TileCoord`]: Engine-side tile coordinate
//! - [`TilePathTemplate`]: `{stem}_files/{z}/{x}_{y}.{format}` derived from the descriptor URL
//! - [`TileUrlResolver`]: Applies the level offset and expands the template
//! - [`TileGrid`]: Zoom tiers, resolutions and bounds checks
//! - [`TileFetcher`]: Per-tile retrieval with isolated failures

mod coord;
mod fetch;
pub(crate) mod grid;
mod resolver;
mod template;

pub use coord::TileCoord;
pub use fetch::{FetchedTile, TileFetcher};
pub use grid::{TileGrid, TileRange};
pub use resolver::TileUrlResolver;
pub use template::TilePathTemplate;

//! # dzi-view
//!
//! A Deep Zoom (DZI) image viewer core.
//!
//! Given a viewer page URL carrying an image id, this library fetches the
//! image's DZI descriptor, maps its pyramid onto a Zoomify-style tile grid
//! and fits a map view to the image. Tiles are then addressed by the
//! rendering engine's `(z, x, y)` and resolved to DZI tile URLs.
//!
//! ## Features
//!
//! - **Descriptor loading**: fetch and parse `slide.dzi`, with typed errors
//! - **Level offset**: engine zoom `z` is served from DZI level `z + ceil(log2(tile_size))`
//! - **View fitting**: resolution ladder, extent `[0, -h, w, 0]`, center constraint
//! - **Scale bar**: metric scale line for the current resolution
//! - **Viewer page**: standalone OpenLayers page mounting the map into `#map`
//!
//! ## Architecture
//!
//! - [`descriptor`] - DZI parsing and descriptor location
//! - [`io`] - Fetcher trait and HTTP implementation
//! - [`source`] - Descriptor loading into a configured tile source
//! - [`tile`] - Tile URL template, level offset, tile grid and tile fetching
//! - [`view`] - Extent, view fitting and scale line
//! - [`viewer`] - The owned map object and its HTML page
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use dzi_view::{HttpFetcher, ImageLocation, Viewer, ViewerOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let location = ImageLocation::from_page_url("http://localhost:5000/viewer?id=42")
//!         .expect("valid page URL")
//!         .expect("page names an image");
//!
//!     let fetcher = HttpFetcher::new().expect("HTTP client");
//!     let mut viewer = Viewer::new(fetcher, ViewerOptions::default());
//!     match viewer.open(location).await {
//!         Ok(view) => println!("resolution {}", view.resolution()),
//!         Err(e) => eprintln!("image unavailable: {}", e),
//!     }
//! }
//! ```

pub mod config;
pub mod descriptor;
pub mod error;
pub mod io;
pub mod source;
pub mod tile;
pub mod view;
pub mod viewer;

// Re-export commonly used types
pub use config::{Cli, Command, OutputFormat};
pub use descriptor::{ceil_log2, ImageLocation, PyramidDescriptor};
pub use error::{DescriptorError, IoError, TileError};
pub use io::{Fetcher, HttpFetcher};
pub use source::{load_tile_source, LoadOptions, TileSource};
pub use tile::{
    FetchedTile, TileCoord, TileFetcher, TileGrid, TilePathTemplate, TileRange, TileUrlResolver,
};
pub use view::{Extent, ScaleBar, ScaleLine, View};
pub use viewer::{page::render_viewer_page, ImageLayer, LayerState, Viewer, ViewerOptions};

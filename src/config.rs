//! Configuration management for the deep zoom viewer CLI.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap, one subcommand per task
//! - Environment variables with `DZI_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Subcommands
//!
//! ```text
//! dzi-view inspect  <PAGE_URL>            descriptor, offset, extent, ladder
//! dzi-view tile-url <PAGE_URL> <Z> <X> <Y> one tile URL
//! dzi-view view     <PAGE_URL>            fitted view, visible tiles, scale bar
//! dzi-view page     <PAGE_URL>            HTML viewer page
//! dzi-view fetch    <PAGE_URL> --out DIR  download the visible tiles
//! ```
//!
//! `PAGE_URL` is the viewer page address carrying the image id, e.g.
//! `http://localhost:5000/viewer?id=42`. `--id` overrides the query string.
//!
//! # Environment Variables
//!
//! - `DZI_ID` - Image identifier
//! - `DZI_TIMEOUT` - Request timeout in seconds (default: 30)
//! - `DZI_ATTRIBUTION` - Attribution text shown on the map
//! - `DZI_CROSS_ORIGIN` - Cross-origin mode for tile requests (default: anonymous)
//! - `DZI_VIEWPORT_WIDTH` / `DZI_VIEWPORT_HEIGHT` - Viewport size (default: 1024x768)
//! - `DZI_METERS_PER_PIXEL` - Ground size of one image pixel (default: 1.0)
//! - `DZI_SCALE_MIN_WIDTH` - Minimum scale bar width in pixels (default: 64)

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::descriptor::ImageLocation;
use crate::error::DescriptorError;
use crate::source::{LoadOptions, DEFAULT_CROSS_ORIGIN};
use crate::view::{ScaleLine, DEFAULT_METERS_PER_PIXEL, DEFAULT_MIN_WIDTH};
use crate::viewer::{ViewerOptions, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};

// =============================================================================
// Default Values
// =============================================================================

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Largest accepted viewport edge in pixels.
pub const MAX_VIEWPORT_EDGE: u32 = 16_384;

// =============================================================================
// CLI Arguments
// =============================================================================

/// dzi-view - Deep Zoom image viewer.
///
/// Loads a DZI descriptor, maps it onto a Zoomify tile grid and fits a view
/// to the image.
#[derive(Parser, Debug, Clone)]
#[command(name = "dzi-view")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the parsed descriptor, level offset, extent and resolutions.
    Inspect(InspectConfig),

    /// Resolve one rendering-engine tile coordinate to its URL.
    TileUrl(TileUrlConfig),

    /// Print the fitted view, visible tiles and scale bar.
    View(ViewConfig),

    /// Write the HTML viewer page.
    Page(PageConfig),

    /// Download the tiles covering the fitted view.
    Fetch(FetchConfig),
}

/// Output format for printed results.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human readable text
    #[default]
    Text,
    /// JSON document
    Json,
}

// =============================================================================
// Shared Arguments
// =============================================================================

/// Which image to load and how to fetch it.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Viewer page URL, e.g. http://localhost:5000/viewer?id=42
    pub page_url: String,

    /// Image identifier. Overrides the page URL's `id` parameter.
    #[arg(long, env = "DZI_ID")]
    pub id: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, env = "DZI_TIMEOUT")]
    pub timeout: u64,

    /// Attribution text shown over the map.
    #[arg(long, env = "DZI_ATTRIBUTION")]
    pub attribution: Option<String>,

    /// Cross-origin mode for tile image requests.
    #[arg(long, default_value = DEFAULT_CROSS_ORIGIN, env = "DZI_CROSS_ORIGIN")]
    pub cross_origin: String,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl SourceArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.page_url.trim().is_empty() {
            return Err("Page URL is required".to_string());
        }
        if self.timeout == 0 {
            return Err("timeout must be greater than 0".to_string());
        }
        if self.cross_origin.trim().is_empty() {
            return Err("cross_origin must not be empty".to_string());
        }
        Ok(())
    }

    /// Image location named by the arguments.
    ///
    /// `Ok(None)` means no image id was given; there is nothing to load.
    pub fn location(&self) -> Result<Option<ImageLocation>, DescriptorError> {
        match self.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => ImageLocation::new(&self.page_url, id).map(Some),
            None => ImageLocation::from_page_url(&self.page_url),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            attributions: self.attribution.clone(),
            cross_origin: self.cross_origin.clone(),
        }
    }
}

/// Viewport, scale bar and overlay settings.
#[derive(Args, Debug, Clone)]
pub struct ViewportArgs {
    /// Viewport width in pixels.
    #[arg(long, default_value_t = DEFAULT_VIEWPORT_WIDTH, env = "DZI_VIEWPORT_WIDTH")]
    pub width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = DEFAULT_VIEWPORT_HEIGHT, env = "DZI_VIEWPORT_HEIGHT")]
    pub height: u32,

    /// Meters covered by one image pixel at full resolution.
    #[arg(long, default_value_t = DEFAULT_METERS_PER_PIXEL, env = "DZI_METERS_PER_PIXEL")]
    pub meters_per_pixel: f64,

    /// Minimum scale bar width in pixels.
    #[arg(long, default_value_t = DEFAULT_MIN_WIDTH, env = "DZI_SCALE_MIN_WIDTH")]
    pub scale_min_width: u32,

    /// Overlay identifiers to load on top of the image (repeatable).
    #[arg(long = "overlay")]
    pub overlays: Vec<String>,
}

impl ViewportArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("viewport width and height must be greater than 0".to_string());
        }
        if self.width > MAX_VIEWPORT_EDGE || self.height > MAX_VIEWPORT_EDGE {
            return Err(format!(
                "viewport width and height must not exceed {}",
                MAX_VIEWPORT_EDGE
            ));
        }
        if !(self.meters_per_pixel.is_finite() && self.meters_per_pixel > 0.0) {
            return Err("meters_per_pixel must be a positive number".to_string());
        }
        if self.scale_min_width == 0 {
            return Err("scale_min_width must be greater than 0".to_string());
        }
        if self.overlays.iter().any(|o| o.trim().is_empty()) {
            return Err("overlay identifiers must not be empty".to_string());
        }
        Ok(())
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn viewer_options(&self, load: LoadOptions) -> ViewerOptions {
        ViewerOptions {
            viewport: self.viewport(),
            scale_line: ScaleLine::new(self.scale_min_width, self.meters_per_pixel),
            load,
        }
    }
}

// =============================================================================
// Subcommand Arguments
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct InspectConfig {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl InspectConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.source.validate()
    }
}

#[derive(Args, Debug, Clone)]
pub struct TileUrlConfig {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Zoom level (0 = whole image in one tile).
    pub z: u32,

    /// Tile column.
    pub x: u32,

    /// Tile row.
    pub y: u32,

    /// Resolve even if the coordinate lies outside the tile grid.
    #[arg(long, default_value_t = false)]
    pub unchecked: bool,
}

impl TileUrlConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.source.validate()
    }
}

#[derive(Args, Debug, Clone)]
pub struct ViewConfig {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub viewport: ViewportArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl ViewConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.source.validate()?;
        self.viewport.validate()
    }
}

#[derive(Args, Debug, Clone)]
pub struct PageConfig {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub viewport: ViewportArgs,

    /// File to write the page to. Prints to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl PageConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.source.validate()?;
        self.viewport.validate()
    }
}

#[derive(Args, Debug, Clone)]
pub struct FetchConfig {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub viewport: ViewportArgs,

    /// Directory the tiles are written to, as `{level}/{x}_{y}.{format}`.
    #[arg(long = "out", env = "DZI_OUT_DIR")]
    pub out_dir: PathBuf,
}

impl FetchConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.source.validate()?;
        self.viewport.validate()?;
        if self.out_dir.as_os_str().is_empty() {
            return Err("Output directory is required. Set --out or DZI_OUT_DIR".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

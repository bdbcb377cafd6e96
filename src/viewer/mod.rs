//! The viewer: one owned map holding an image layer, its overlays and a view.
//!
//! # Lifecycle
//!
//! ```text
//! Viewer::new ──▶ open(location) ──┬─ Ok  ──▶ layer configured, view fitted
//!                                  └─ Err ──▶ layer unconfigured, no view
//! ```
//!
//! A failed load is never fatal. The viewer keeps running with an empty
//! map, the error is kept on the layer and returned to the caller.
//! Overlays load the same way and fail independently of each other and of
//! the base image.

pub mod page;

use tracing::{info, warn};

use crate::descriptor::ImageLocation;
use crate::error::{DescriptorError, TileError};
use crate::io::Fetcher;
use crate::source::{load_tile_source, LoadOptions, TileSource};
use crate::tile::{FetchedTile, TileCoord, TileFetcher};
use crate::view::{ScaleBar, ScaleLine, View};

/// Default viewport width in pixels.
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1024;

/// Default viewport height in pixels.
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 768;

/// Load state of one image layer.
#[derive(Debug, Clone)]
pub enum LayerState {
    /// Descriptor loaded, tiles can be requested
    Ready(TileSource),

    /// Descriptor could not be loaded; the layer draws nothing
    Failed(DescriptorError),
}

/// One deep zoom layer of the map.
#[derive(Debug, Clone)]
pub struct ImageLayer {
    location: ImageLocation,
    state: LayerState,
}

impl ImageLayer {
    pub fn location(&self) -> &ImageLocation {
        &self.location
    }

    pub fn state(&self) -> &LayerState {
        &self.state
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.state, LayerState::Ready(_))
    }

    pub fn source(&self) -> Option<&TileSource> {
        match &self.state {
            LayerState::Ready(source) => Some(source),
            LayerState::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&DescriptorError> {
        match &self.state {
            LayerState::Ready(_) => None,
            LayerState::Failed(err) => Some(err),
        }
    }
}

/// Viewer settings.
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    /// Viewport `(width, height)` in pixels
    pub viewport: (u32, u32),

    pub scale_line: ScaleLine,

    pub load: LoadOptions,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            viewport: (DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT),
            scale_line: ScaleLine::default(),
            load: LoadOptions::default(),
        }
    }
}

/// A deep zoom viewer bound to a fetcher.
pub struct Viewer<F: Fetcher> {
    fetcher: F,
    options: ViewerOptions,
    base: Option<ImageLayer>,
    overlays: Vec<ImageLayer>,
    view: Option<View>,
}

impl<F: Fetcher> Viewer<F> {
    /// Create an empty viewer. Nothing is fetched until [`Viewer::open`].
    pub fn new(fetcher: F, options: ViewerOptions) -> Self {
        Self {
            fetcher,
            options,
            base: None,
            overlays: Vec::new(),
            view: None,
        }
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Load the base image and fit the view to it.
    ///
    /// On failure the base layer is left unconfigured, any previous view is
    /// dropped and the error is returned.
    pub async fn open(&mut self, location: ImageLocation) -> Result<&View, DescriptorError> {
        self.overlays.clear();
        self.view = None;

        let state = load_layer(&self.fetcher, &location, &self.options.load).await;
        let result = match &state {
            LayerState::Ready(source) => {
                let mut view = source.view();
                view.fit(&source.extent(), self.options.viewport);
                info!(
                    image = %location.image_id(),
                    resolution = view.resolution(),
                    zoom = view.zoom(),
                    "View fitted to image"
                );
                Ok(view)
            }
            LayerState::Failed(err) => Err(err.clone()),
        };

        self.base = Some(ImageLayer { location, state });
        match result {
            Ok(view) => Ok(&*self.view.insert(view)),
            Err(err) => Err(err),
        }
    }

    /// Load an overlay on top of the base image.
    ///
    /// The layer is kept either way; a failed overlay draws nothing and
    /// leaves the base image and other overlays untouched.
    pub async fn add_overlay(&mut self, location: ImageLocation) -> Result<(), DescriptorError> {
        let state = load_layer(&self.fetcher, &location, &self.options.load).await;
        let result = match &state {
            LayerState::Ready(_) => Ok(()),
            LayerState::Failed(err) => Err(err.clone()),
        };
        self.overlays.push(ImageLayer { location, state });
        result
    }

    pub fn base(&self) -> Option<&ImageLayer> {
        self.base.as_ref()
    }

    pub fn overlays(&self) -> &[ImageLayer] {
        &self.overlays
    }

    /// The base tile source, if the base image loaded.
    pub fn source(&self) -> Option<&TileSource> {
        self.base.as_ref().and_then(ImageLayer::source)
    }

    /// The current view. `None` until the base image has loaded.
    pub fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut View> {
        self.view.as_mut()
    }

    /// Scale bar for the current view.
    pub fn scale_bar(&self) -> Option<ScaleBar> {
        let view = self.view.as_ref()?;
        self.options.scale_line.render(view.resolution())
    }

    /// Base image tiles needed to draw the current view.
    pub fn visible_tiles(&self) -> Vec<TileCoord> {
        match (self.source(), self.view.as_ref()) {
            (Some(source), Some(view)) => source.tiles_for_view(view, self.options.viewport),
            _ => Vec::new(),
        }
    }

    /// Fetch the base image tiles of the current view.
    ///
    /// One result per tile; failures do not stop the batch.
    pub async fn fetch_visible_tiles(&self) -> Vec<Result<FetchedTile, TileError>> {
        let Some(source) = self.source() else {
            return Vec::new();
        };
        let tiles = TileFetcher::new(&self.fetcher, source.resolver(), source.grid());
        tiles.fetch_all(self.visible_tiles()).await
    }
}

async fn load_layer<F: Fetcher + ?Sized>(
    fetcher: &F,
    location: &ImageLocation,
    options: &LoadOptions,
) -> LayerState {
    let url = match location.descriptor_url() {
        Ok(url) => url,
        Err(err) => return LayerState::Failed(err),
    };

    match load_tile_source(fetcher, url.as_str(), options.clone()).await {
        Ok(source) => LayerState::Ready(source),
        Err(err) => {
            warn!(
                image = %location.image_id(),
                overlay = location.overlay_id().unwrap_or("-"),
                kind = err.kind(),
                error = %err,
                "Image layer left unconfigured"
            );
            LayerState::Failed(err)
        }
    }
}

use serde::Serialize;

use super::extent::Extent;
use crate::tile::grid::nearest_zoom;
use crate::tile::TileGrid;

/// Viewer camera: a center and a resolution over a fixed resolution ladder.
///
/// Only the center is constrained to the image extent; the resolution may
/// sit anywhere between the ladder's ends, so a fitted view does not snap
/// to a tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    /// Allowed resolutions, coarsest first
    resolutions: Vec<f64>,

    /// Extent the center is kept inside
    extent: Extent,

    center: (f64, f64),
    resolution: f64,
}

impl View {
    /// Create a view over `resolutions` (coarsest first) centered on `extent`.
    ///
    /// The initial resolution is the coarsest one.
    pub(crate) fn new(resolutions: Vec<f64>, extent: Extent) -> Self {
        let resolution = resolutions.first().copied().unwrap_or(1.0);
        Self {
            center: extent.center(),
            resolution,
            resolutions,
            extent,
        }
    }

    /// View over a tile grid's resolutions and image extent.
    pub(crate) fn for_grid(grid: &TileGrid) -> Self {
        Self::new(grid.resolutions().to_vec(), grid.extent())
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn resolutions(&self) -> &[f64] {
        &self.resolutions
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Coarsest allowed resolution.
    pub fn max_resolution(&self) -> f64 {
        self.resolutions.first().copied().unwrap_or(self.resolution)
    }

    /// Finest allowed resolution.
    pub fn min_resolution(&self) -> f64 {
        self.resolutions.last().copied().unwrap_or(self.resolution)
    }

    /// Move the center, keeping it inside the extent.
    pub fn set_center(&mut self, center: (f64, f64)) {
        self.center = self.extent.clamp(center);
    }

    /// Change the resolution, clamped to the ladder's range.
    pub fn set_resolution(&mut self, resolution: f64) {
        self.resolution = resolution.clamp(self.min_resolution(), self.max_resolution());
    }

    /// Fit `target` into a `width x height` pixel viewport.
    ///
    /// The resolution is the smallest one that shows the whole target,
    /// clamped to the ladder; the center is the target's center.
    pub fn fit(&mut self, target: &Extent, viewport: (u32, u32)) {
        let (vw, vh) = viewport;
        let vw = vw.max(1) as f64;
        let vh = vh.max(1) as f64;

        let resolution = (target.width() / vw).max(target.height() / vh);
        self.set_resolution(resolution);
        self.set_center(target.center());
    }

    /// Nearest zoom index on the ladder for the current resolution.
    pub fn zoom(&self) -> u32 {
        nearest_zoom(&self.resolutions, self.resolution)
    }

    /// Map area shown in a `width x height` pixel viewport.
    pub fn visible_extent(&self, viewport: (u32, u32)) -> Extent {
        let (vw, vh) = viewport;
        Extent::around(
            self.center,
            vw as f64 * self.resolution,
            vh as f64 * self.resolution,
        )
    }
}

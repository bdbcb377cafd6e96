use std::fmt;

use serde::Serialize;

/// A tile coordinate in the rendering engine's convention.
///
/// `z = 0` is the coarsest zoom level. Columns grow to the right and rows
/// grow downwards from the top-left corner of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TileCoord {
    /// Zoom level (0 = lowest resolution)
    pub z: u32,

    /// Tile column (0-indexed from left)
    pub x: u32,

    /// Tile row (0-indexed from top)
    pub y: u32,
}

impl TileCoord {
    pub const fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

impl From<(u32, u32, u32)> for TileCoord {
    fn from((z, x, y): (u32, u32, u32)) -> Self {
        Self::new(z, x, y)
    }
}

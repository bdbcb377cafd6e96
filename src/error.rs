use thiserror::Error;

use crate::tile::TileCoord;

/// I/O errors that can occur when fetching remote resources
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String },

    /// Resource not found (HTTP 404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Network or connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request did not complete within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// URL could not be parsed or joined
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl IoError {
    /// Build the error for a non-success HTTP status.
    pub fn from_status(status: u16, url: impl Into<String>) -> Self {
        let url = url.into();
        if status == 404 {
            IoError::NotFound(url)
        } else {
            IoError::Http { status, url }
        }
    }
}

/// Errors raised while loading an image descriptor.
///
/// Every variant is terminal for the load that produced it but never for the
/// viewer: the layer simply stays unconfigured.
#[derive(Debug, Clone, Error)]
pub enum DescriptorError {
    /// The descriptor could not be fetched (transport failure or non-2xx)
    #[error("Descriptor unavailable at {url}: {source}")]
    Unavailable {
        url: String,
        #[source]
        source: IoError,
    },

    /// The descriptor was fetched but is not a usable DZI document
    #[error("Descriptor malformed at {url}: {reason}")]
    Malformed { url: String, reason: String },

    /// The descriptor URL cannot be turned into a tile path template
    #[error("Invalid descriptor URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl DescriptorError {
    /// Short machine-readable kind, used in logs and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            DescriptorError::Unavailable { .. } => "descriptor_unavailable",
            DescriptorError::Malformed { .. } => "descriptor_malformed",
            DescriptorError::InvalidUrl { .. } => "invalid_url",
        }
    }
}

/// Per-tile errors. These never propagate past the tile they belong to.
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// The tile could not be fetched
    #[error("Tile {coord} unavailable at {url}: {source}")]
    Unavailable {
        coord: TileCoord,
        url: String,
        #[source]
        source: IoError,
    },

    /// The coordinate lies outside the tile grid
    #[error("Tile {coord} is outside the tile grid")]
    OutOfRange { coord: TileCoord },
}

impl TileError {
    /// The coordinate this error belongs to.
    pub fn coord(&self) -> TileCoord {
        match self {
            TileError::Unavailable { coord, .. } | TileError::OutOfRange { coord } => *coord,
        }
    }
}

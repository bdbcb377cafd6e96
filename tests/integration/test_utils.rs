//! Test utilities for integration tests.
//!
//! This module provides an in-memory [`Fetcher`] and helpers for building
//! DZI descriptors and page URLs.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dzi_view::error::IoError;
use dzi_view::io::Fetcher;

/// Host used by every fixture URL.
pub const BASE_URL: &str = "http://slides.test";

/// Viewer page for image `42`.
pub const PAGE_URL: &str = "http://slides.test/viewer?id=42";

/// Descriptor URL the page above resolves to.
pub const DESCRIPTOR_URL: &str = "http://slides.test/deepzoom/42/slide.dzi";

// =============================================================================
// Mock Fetcher with Request Tracking
// =============================================================================

/// A fetcher serving fixed bodies from memory.
///
/// Unknown URLs answer with [`IoError::NotFound`]. Every request is recorded
/// so tests can check what was (and was not) fetched.
#[derive(Clone, Default)]
pub struct MockFetcher {
    resources: Arc<Mutex<HashMap<String, Bytes>>>,
    failures: Arc<Mutex<HashMap<String, IoError>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(self, url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.resources
            .lock()
            .unwrap()
            .insert(url.into(), body.into());
        self
    }

    /// Make `url` fail with `error` instead of answering.
    pub fn with_failure(self, url: impl Into<String>, error: IoError) -> Self {
        self.failures.lock().unwrap().insert(url.into(), error);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, IoError> {
        self.requests.lock().unwrap().push(url.to_string());

        if let Some(error) = self.failures.lock().unwrap().get(url) {
            return Err(error.clone());
        }

        self.resources
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| IoError::NotFound(url.to_string()))
    }
}

// =============================================================================
// Descriptor Fixtures
// =============================================================================

/// A namespaced DZI descriptor.
pub fn dzi_xml(tile_size: u32, width: u32, height: u32, format: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Image xmlns="http://schemas.microsoft.com/deepzoom/2008" TileSize="{}" Overlap="1" Format="{}">
  <Size Width="{}" Height="{}"/>
</Image>"#,
        tile_size, format, width, height
    )
}

/// The 10000 x 8000, 256 px, JPEG descriptor most tests use.
pub fn standard_dzi() -> String {
    dzi_xml(256, 10000, 8000, "jpeg")
}

/// Descriptor URL of overlay `overlay` on image `42`.
pub fn overlay_descriptor_url(overlay: &str) -> String {
    format!("{}/deepzoom/42/overlays/{}/slide.dzi", BASE_URL, overlay)
}

/// Fake tile body identifying the tile it stands for.
pub fn tile_body(level: u32, x: u32, y: u32) -> Bytes {
    Bytes::from(format!("tile {}/{}/{}", level, x, y))
}

/// A fetcher serving the standard descriptor and its tiles for DZI `level`.
pub fn fetcher_with_level(level: u32, columns: u32, rows: u32) -> MockFetcher {
    let mut fetcher = MockFetcher::new().with_resource(DESCRIPTOR_URL, standard_dzi());
    for x in 0..columns {
        for y in 0..rows {
            let url = format!(
                "{}/deepzoom/42/slide_files/{}/{}_{}.jpeg",
                BASE_URL, level, x, y
            );
            fetcher = fetcher.with_resource(url, tile_body(level, x, y));
        }
    }
    fetcher
}

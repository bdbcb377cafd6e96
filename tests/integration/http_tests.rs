//! HTTP fetcher tests against a local server.
//!
//! Tests verify:
//! - The real fetcher loads a descriptor and tiles end to end
//! - 404 and other error statuses map to the right `IoError`
//! - A 404 descriptor leaves the viewer without a view

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;

use dzi_view::error::{DescriptorError, IoError, TileError};
use dzi_view::io::Fetcher;
use dzi_view::{HttpFetcher, ImageLocation, TileCoord, Viewer, ViewerOptions};

use super::test_utils::standard_dzi;

/// Serve a small deep zoom tree on an ephemeral port.
async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/deepzoom/42/slide.dzi", get(|| async { standard_dzi() }))
        .route(
            "/deepzoom/42/slide_files/8/0_0.jpeg",
            get(|| async { "tile 8/0/0" }),
        )
        .route(
            "/deepzoom/broken/slide.dzi",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_fetch_existing_and_missing_resources() {
    let addr = spawn_server().await;
    let fetcher = HttpFetcher::new().unwrap();

    let xml = fetcher
        .fetch_text(&format!("http://{}/deepzoom/42/slide.dzi", addr))
        .await
        .unwrap();
    assert!(xml.contains(r#"TileSize="256""#));

    let missing = format!("http://{}/deepzoom/7/slide.dzi", addr);
    let err = fetcher.fetch(&missing).await.unwrap_err();
    assert!(matches!(err, IoError::NotFound(ref url) if *url == missing));

    let err = fetcher
        .fetch(&format!("http://{}/deepzoom/broken/slide.dzi", addr))
        .await
        .unwrap_err();
    assert!(matches!(err, IoError::Http { status: 500, .. }));
}

#[tokio::test]
async fn test_viewer_over_http() {
    let addr = spawn_server().await;
    let page = format!("http://{}/viewer?id=42", addr);

    let mut options = ViewerOptions::default();
    options.viewport = (1000, 800);
    let mut viewer = Viewer::new(HttpFetcher::new().unwrap(), options);

    let view = viewer
        .open(ImageLocation::from_page_url(&page).unwrap().unwrap())
        .await
        .unwrap();
    assert_eq!(view.resolution(), 10.0);
    assert_eq!(view.center(), (5000.0, -4000.0));

    let source = viewer.source().unwrap();
    assert_eq!(
        source.tile_url(TileCoord::new(0, 0, 0)).unwrap(),
        format!("http://{}/deepzoom/42/slide_files/8/0_0.jpeg", addr)
    );

    let tile = viewer
        .fetcher()
        .fetch(&source.tile_url(TileCoord::new(0, 0, 0)).unwrap())
        .await
        .unwrap();
    assert_eq!(&tile[..], b"tile 8/0/0");
}

#[tokio::test]
async fn test_missing_descriptor_over_http() {
    let addr = spawn_server().await;
    let page = format!("http://{}/viewer?id=does-not-exist", addr);

    let mut viewer = Viewer::new(HttpFetcher::new().unwrap(), ViewerOptions::default());
    let err = viewer
        .open(ImageLocation::from_page_url(&page).unwrap().unwrap())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DescriptorError::Unavailable {
            source: IoError::NotFound(_),
            ..
        }
    ));
    assert!(viewer.view().is_none());
    assert!(!viewer.base().unwrap().is_configured());
}

#[tokio::test]
async fn test_missing_tiles_over_http() {
    let addr = spawn_server().await;
    let page = format!("http://{}/viewer?id=42", addr);

    let mut options = ViewerOptions::default();
    options.viewport = (1000, 800);
    let mut viewer = Viewer::new(HttpFetcher::new().unwrap(), options);
    viewer
        .open(ImageLocation::from_page_url(&page).unwrap().unwrap())
        .await
        .unwrap();

    // Zoom 3 tiles are not served: every one fails on its own.
    let results = viewer.fetch_visible_tiles().await;
    assert_eq!(results.len(), 20);
    assert!(results.iter().all(|r| matches!(
        r,
        Err(TileError::Unavailable {
            source: IoError::NotFound(_),
            ..
        })
    )));
}

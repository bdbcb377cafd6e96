//! Viewer page and CLI tests.
//!
//! Tests verify:
//! - The page mounts the map into `#map` with the computed tile settings
//! - A failed load renders the empty map plus an error banner
//! - User-controlled text is escaped
//! - The `page` and `fetch` subcommands write their output to disk

use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;

use dzi_view::{
    render_viewer_page, ImageLocation, LoadOptions, ScaleLine, Viewer, ViewerOptions,
};

use super::test_utils::{
    overlay_descriptor_url, standard_dzi, MockFetcher, DESCRIPTOR_URL, PAGE_URL,
};

async fn open_viewer(fetcher: MockFetcher, load: LoadOptions) -> Viewer<MockFetcher> {
    let options = ViewerOptions {
        load,
        ..ViewerOptions::default()
    };
    let mut viewer = Viewer::new(fetcher, options);
    let _ = viewer
        .open(ImageLocation::from_page_url(PAGE_URL).unwrap().unwrap())
        .await;
    viewer
}

// =============================================================================
// Rendered Page
// =============================================================================

#[tokio::test]
async fn test_page_contains_map_and_tile_settings() {
    let fetcher = MockFetcher::new().with_resource(DESCRIPTOR_URL, standard_dzi());
    let viewer = open_viewer(fetcher, LoadOptions::default()).await;

    let html = render_viewer_page(&viewer);

    assert!(html.contains(r#"<div id="map"></div>"#));
    assert!(html.contains("ol.source.Zoomify"));
    assert!(html.contains("ol.control.ScaleLine"));
    assert!(html.contains(r#"units: "metric""#));
    assert!(html.contains(r#"const scaleLine = {"minWidth":64,"metersPerUnit":1.0};"#));
    assert!(html.contains("new ol.proj.Projection"));
    assert!(html.contains("metersPerUnit: scaleLine.metersPerUnit"));
    assert!(html.contains("projection: projection"));
    assert!(html.contains("constrainOnlyCenter: true"));
    assert!(html.contains(
        r#""url":"http://slides.test/deepzoom/42/slide_files/{z}/{x}_{y}.jpeg""#
    ));
    assert!(html.contains(r#""offset":8"#));
    assert!(html.contains(r#""extent":[0.0,-8000.0,10000.0,0.0]"#));
    assert!(html.contains(r#""crossOrigin":"anonymous""#));
    assert!(html.contains("[64.0,32.0,16.0,8.0,4.0,2.0,1.0]"));
    assert!(html.contains(r#"class="error-banner""#));
}

#[tokio::test]
async fn test_page_scale_line_matches_viewer_scale_bar() {
    let fetcher = MockFetcher::new().with_resource(DESCRIPTOR_URL, standard_dzi());
    let options = ViewerOptions {
        viewport: (1000, 800),
        scale_line: ScaleLine::new(64, 2.5e-7),
        ..ViewerOptions::default()
    };
    let mut viewer = Viewer::new(fetcher, options);
    viewer
        .open(ImageLocation::from_page_url(PAGE_URL).unwrap().unwrap())
        .await
        .unwrap();
    assert_eq!(viewer.scale_bar().unwrap().label, "200 μm");

    let html = render_viewer_page(&viewer);

    assert!(html.contains(r#"const scaleLine = {"minWidth":64,"metersPerUnit":2.5e-7};"#));
}

#[tokio::test]
async fn test_page_includes_attribution_and_overlays() {
    let fetcher = MockFetcher::new()
        .with_resource(DESCRIPTOR_URL, standard_dzi())
        .with_resource(overlay_descriptor_url("tumor"), standard_dzi());
    let load = LoadOptions {
        attributions: Some("&copy; 2022 Lab".to_string()),
        ..LoadOptions::default()
    };
    let mut viewer = open_viewer(fetcher, load).await;
    let overlay = viewer.base().unwrap().location().overlay("tumor");
    viewer.add_overlay(overlay).await.unwrap();

    let html = render_viewer_page(&viewer);

    assert!(html.contains(r#""attributions":"&copy; 2022 Lab""#));
    assert!(html.contains("overlays/tumor/slide_files/{z}/{x}_{y}.jpeg"));
}

#[tokio::test]
async fn test_page_after_failed_load_shows_banner() {
    let viewer = open_viewer(MockFetcher::new(), LoadOptions::default()).await;

    let html = render_viewer_page(&viewer);

    assert!(html.contains(r#"<div id="map"></div>"#));
    assert!(html.contains(r#"class="error-banner visible""#));
    assert!(html.contains("Descriptor unavailable"));
    assert!(html.contains("const baseLayer = null;"));
}

#[tokio::test]
async fn test_page_escapes_image_id() {
    let mut viewer = Viewer::new(MockFetcher::new(), ViewerOptions::default());
    let location = ImageLocation::new(PAGE_URL, "<script>alert(1)</script>").unwrap();
    let _ = viewer.open(location).await;

    let html = render_viewer_page(&viewer);

    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
}

// =============================================================================
// CLI
// =============================================================================

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/deepzoom/42/slide.dzi", get(|| async { standard_dzi() }))
        .route(
            "/deepzoom/42/slide_files/8/0_0.jpeg",
            get(|| async { "tile 8/0/0" }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn cli() -> tokio::process::Command {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_dzi-view"))
}

#[tokio::test]
async fn test_cli_page_writes_file() {
    let addr = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("viewer.html");

    let status = cli()
        .arg("page")
        .arg(format!("http://{}/viewer?id=42", addr))
        .arg("--output")
        .arg(&out)
        .status()
        .await
        .unwrap();

    assert!(status.success());
    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains(r#"<div id="map"></div>"#));
    assert!(html.contains("slide_files/{z}/{x}_{y}.jpeg"));
}

#[tokio::test]
async fn test_cli_fetch_writes_visible_tiles() {
    let addr = spawn_server().await;
    let dir = tempfile::tempdir().unwrap();

    // A 200 x 200 viewport shows only zoom 0, which is DZI level 8.
    let status = cli()
        .arg("fetch")
        .arg(format!("http://{}/viewer?id=42", addr))
        .args(["--width", "200", "--height", "200", "--out"])
        .arg(dir.path())
        .status()
        .await
        .unwrap();

    assert!(status.success());
    let tile = std::fs::read(dir.path().join("8").join("0_0.jpeg")).unwrap();
    assert_eq!(tile, b"tile 8/0/0");
}

#[tokio::test]
async fn test_cli_tile_url() {
    let addr = spawn_server().await;

    let output = cli()
        .arg("tile-url")
        .arg(format!("http://{}/viewer?id=42", addr))
        .args(["0", "3", "5", "--unchecked"])
        .output()
        .await
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout.trim(),
        format!("http://{}/deepzoom/42/slide_files/8/3_5.jpeg", addr)
    );
}

#[tokio::test]
async fn test_cli_missing_descriptor_fails() {
    let addr = spawn_server().await;

    let status = cli()
        .arg("inspect")
        .arg(format!("http://{}/viewer?id=7", addr))
        .status()
        .await
        .unwrap();

    assert!(!status.success());
}

#[tokio::test]
async fn test_cli_tile_url_overflowing_zoom_fails() {
    let addr = spawn_server().await;

    let output = cli()
        .arg("tile-url")
        .arg(format!("http://{}/viewer?id=42", addr))
        .args(["4294967295", "0", "0", "--unchecked"])
        .output()
        .await
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

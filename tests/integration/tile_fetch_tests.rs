//! Tile fetch tests.
//!
//! Tests verify:
//! - Tiles are requested at the offset DZI level
//! - A missing tile fails alone; the rest of the batch succeeds
//! - Coordinates outside the grid are rejected without a request

use dzi_view::error::{IoError, TileError};
use dzi_view::{
    load_tile_source, ImageLocation, LoadOptions, TileCoord, TileFetcher, Viewer, ViewerOptions,
};

use super::test_utils::{
    fetcher_with_level, standard_dzi, tile_body, MockFetcher, BASE_URL, DESCRIPTOR_URL, PAGE_URL,
};

#[tokio::test]
async fn test_fetch_tile_uses_offset_level() {
    // Zoom 1 of the standard image is DZI level 9, a 2 x 1 tier.
    let fetcher = fetcher_with_level(9, 2, 1);
    let source = load_tile_source(&fetcher, DESCRIPTOR_URL, LoadOptions::default())
        .await
        .unwrap();

    let tiles = TileFetcher::new(&fetcher, source.resolver(), source.grid());
    let tile = tiles.fetch_tile(TileCoord::new(1, 1, 0)).await.unwrap();

    assert_eq!(tile.coord, TileCoord::new(1, 1, 0));
    assert_eq!(
        tile.url,
        format!("{}/deepzoom/42/slide_files/9/1_0.jpeg", BASE_URL)
    );
    assert_eq!(tile.data, tile_body(9, 1, 0));
}

#[tokio::test]
async fn test_missing_tile_fails_alone() {
    let fetcher = fetcher_with_level(9, 2, 1).with_failure(
        format!("{}/deepzoom/42/slide_files/9/0_0.jpeg", BASE_URL),
        IoError::NotFound("0_0.jpeg".to_string()),
    );
    let source = load_tile_source(&fetcher, DESCRIPTOR_URL, LoadOptions::default())
        .await
        .unwrap();

    let tiles = TileFetcher::new(&fetcher, source.resolver(), source.grid());
    let results = tiles
        .fetch_all([TileCoord::new(1, 0, 0), TileCoord::new(1, 1, 0)])
        .await;

    assert_eq!(results.len(), 2);
    let failures: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures[0],
        TileError::Unavailable {
            source: IoError::NotFound(_),
            ..
        }
    ));
    assert_eq!(failures[0].coord(), TileCoord::new(1, 0, 0));
    assert!(results[1].is_ok());
}

#[tokio::test]
async fn test_out_of_range_tile_is_not_requested() {
    let fetcher = MockFetcher::new().with_resource(DESCRIPTOR_URL, standard_dzi());
    let source = load_tile_source(&fetcher, DESCRIPTOR_URL, LoadOptions::default())
        .await
        .unwrap();
    let before = fetcher.request_count();

    let tiles = TileFetcher::new(&fetcher, source.resolver(), source.grid());
    let err = tiles.fetch_tile(TileCoord::new(1, 2, 0)).await.unwrap_err();

    assert!(matches!(err, TileError::OutOfRange { .. }));
    let err = tiles.fetch_tile(TileCoord::new(7, 0, 0)).await.unwrap_err();
    assert!(matches!(err, TileError::OutOfRange { .. }));
    assert_eq!(fetcher.request_count(), before);
}

#[tokio::test]
async fn test_viewer_fetches_visible_tiles() {
    // A 200 x 200 viewport fits the image at resolution 50, nearest zoom 0.
    let fetcher = fetcher_with_level(8, 1, 1);
    let mut options = ViewerOptions::default();
    options.viewport = (200, 200);
    let mut viewer = Viewer::new(fetcher, options);
    viewer
        .open(ImageLocation::from_page_url(PAGE_URL).unwrap().unwrap())
        .await
        .unwrap();

    let results = viewer.fetch_visible_tiles().await;
    assert_eq!(results.len(), 1);
    let tile = results.into_iter().next().unwrap().unwrap();
    assert_eq!(tile.coord, TileCoord::new(0, 0, 0));
    assert_eq!(tile.data, tile_body(8, 0, 0));
}

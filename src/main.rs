//! dzi-view - Deep Zoom image viewer CLI.
//!
//! Loads a DZI descriptor through the viewer core and reports, renders or
//! downloads what the map would show.

use clap::Parser;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dzi_view::{
    config::{
        Cli, Command, FetchConfig, InspectConfig, OutputFormat, PageConfig, SourceArgs,
        TileUrlConfig, ViewConfig, ViewportArgs,
    },
    load_tile_source, render_viewer_page, HttpFetcher, ImageLocation, ScaleBar, TileCoord,
    Viewer,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Inspect(config) => run_inspect(config).await,
        Command::TileUrl(config) => run_tile_url(config).await,
        Command::View(config) => run_view(config).await,
        Command::Page(config) => run_page(config).await,
        Command::Fetch(config) => run_fetch(config).await,
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "dzi_view=debug"
    } else {
        "dzi_view=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Common startup: logging, validation, location and HTTP client.
fn prepare(
    source: &SourceArgs,
    validation: Result<(), String>,
) -> Result<(ImageLocation, HttpFetcher), ExitCode> {
    init_logging(source.verbose);

    if let Err(e) = validation {
        error!("Configuration error: {}", e);
        return Err(ExitCode::FAILURE);
    }

    let location = match source.location() {
        Ok(Some(location)) => location,
        Ok(None) => {
            error!("No image id: add ?id=<image> to the page URL or pass --id");
            return Err(ExitCode::FAILURE);
        }
        Err(e) => {
            error!("{}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    let fetcher = match HttpFetcher::with_timeout(source.request_timeout()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("{}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    Ok((location, fetcher))
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Inspect Command
// =============================================================================

async fn run_inspect(config: InspectConfig) -> ExitCode {
    let (location, fetcher) = match prepare(&config.source, config.validate()) {
        Ok(prepared) => prepared,
        Err(code) => return code,
    };

    let url = match location.descriptor_url() {
        Ok(url) => url,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let source = match load_tile_source(&fetcher, url.as_str(), config.source.load_options()).await
    {
        Ok(source) => source,
        Err(e) => {
            error!(kind = e.kind(), "{}", e);
            return ExitCode::FAILURE;
        }
    };

    let summary = source.summary();
    match config.format {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Text => {
            let d = &summary.descriptor;
            println!("Descriptor:    {}", summary.descriptor_url);
            println!("Size:          {} x {} px", d.width, d.height);
            println!("Tile size:     {} px (overlap {})", d.tile_size, d.overlap);
            println!("Format:        {}", d.format);
            println!("DZI levels:    0..={}", summary.max_level);
            println!("Level offset:  {}", summary.level_offset);
            println!("Zoom levels:   {}", summary.tier_count);
            println!("Extent:        {:?}", summary.extent);
            println!("Resolutions:   {:?}", summary.resolutions);
            println!("Tile URLs:     {}", summary.tile_url_template);
            ExitCode::SUCCESS
        }
    }
}

// =============================================================================
// Tile URL Command
// =============================================================================

async fn run_tile_url(config: TileUrlConfig) -> ExitCode {
    let (location, fetcher) = match prepare(&config.source, config.validate()) {
        Ok(prepared) => prepared,
        Err(code) => return code,
    };

    let url = match location.descriptor_url() {
        Ok(url) => url,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let source = match load_tile_source(&fetcher, url.as_str(), config.source.load_options()).await
    {
        Ok(source) => source,
        Err(e) => {
            error!(kind = e.kind(), "{}", e);
            return ExitCode::FAILURE;
        }
    };

    let coord = TileCoord::new(config.z, config.x, config.y);
    if !config.unchecked && !source.grid().contains(coord) {
        error!(
            "Tile {} is outside the tile grid ({} zoom levels)",
            coord,
            source.grid().tier_count()
        );
        return ExitCode::FAILURE;
    }

    match source.tile_url(coord) {
        Ok(url) => {
            println!("{}", url);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// View Command
// =============================================================================

#[derive(Serialize)]
struct ViewReport {
    image_id: String,
    resolution: f64,
    zoom: u32,
    center: (f64, f64),
    visible_extent: [f64; 4],
    scale_bar: Option<ScaleBar>,
    tiles: Vec<TileReport>,
    overlays: Vec<OverlayReport>,
}

#[derive(Serialize)]
struct TileReport {
    coord: TileCoord,
    url: String,
}

#[derive(Serialize)]
struct OverlayReport {
    id: String,
    configured: bool,
    error: Option<String>,
}

/// Open the base image and any overlays, keeping overlay failures local.
async fn open_viewer(
    location: ImageLocation,
    fetcher: HttpFetcher,
    source: &SourceArgs,
    viewport: &ViewportArgs,
) -> Result<Viewer<HttpFetcher>, ExitCode> {
    let mut viewer = Viewer::new(fetcher, viewport.viewer_options(source.load_options()));

    if let Err(e) = viewer.open(location.clone()).await {
        error!(kind = e.kind(), "{}", e);
        return Err(ExitCode::FAILURE);
    }

    for overlay in &viewport.overlays {
        if let Err(e) = viewer.add_overlay(location.overlay(overlay.as_str())).await {
            warn!(overlay = %overlay, "Overlay not shown: {}", e);
        }
    }

    Ok(viewer)
}

async fn run_view(config: ViewConfig) -> ExitCode {
    let (location, fetcher) = match prepare(&config.source, config.validate()) {
        Ok(prepared) => prepared,
        Err(code) => return code,
    };

    let viewer = match open_viewer(location, fetcher, &config.source, &config.viewport).await {
        Ok(viewer) => viewer,
        Err(code) => return code,
    };

    let (Some(source), Some(view)) = (viewer.source(), viewer.view()) else {
        return ExitCode::FAILURE;
    };

    let report = ViewReport {
        image_id: source_image_id(&viewer),
        resolution: view.resolution(),
        zoom: view.zoom(),
        center: view.center(),
        visible_extent: view.visible_extent(config.viewport.viewport()).to_array(),
        scale_bar: viewer.scale_bar(),
        tiles: viewer
            .visible_tiles()
            .into_iter()
            .filter_map(|coord| {
                let url = source.tile_url(coord).ok()?;
                Some(TileReport { coord, url })
            })
            .collect(),
        overlays: viewer
            .overlays()
            .iter()
            .map(|layer| OverlayReport {
                id: layer.location().overlay_id().unwrap_or_default().to_string(),
                configured: layer.is_configured(),
                error: layer.error().map(|e| e.to_string()),
            })
            .collect(),
    };

    match config.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            println!("Image:       {}", report.image_id);
            println!("Resolution:  {}", report.resolution);
            println!("Zoom:        {}", report.zoom);
            println!("Center:      ({}, {})", report.center.0, report.center.1);
            println!("Visible:     {:?}", report.visible_extent);
            if let Some(ref bar) = report.scale_bar {
                println!("Scale bar:   {} ({} px)", bar.label, bar.width_px);
            }
            for overlay in &report.overlays {
                match overlay.error {
                    None => println!("Overlay:     {}", overlay.id),
                    Some(ref e) => println!("Overlay:     {} (unavailable: {})", overlay.id, e),
                }
            }
            println!("Tiles:       {}", report.tiles.len());
            for tile in &report.tiles {
                println!("  {}  {}", tile.coord, tile.url);
            }
            ExitCode::SUCCESS
        }
    }
}

fn source_image_id(viewer: &Viewer<HttpFetcher>) -> String {
    viewer
        .base()
        .map(|layer| layer.location().image_id().to_string())
        .unwrap_or_default()
}

// =============================================================================
// Page Command
// =============================================================================

async fn run_page(config: PageConfig) -> ExitCode {
    let (location, fetcher) = match prepare(&config.source, config.validate()) {
        Ok(prepared) => prepared,
        Err(code) => return code,
    };

    // A failed load still yields a page: the empty map plus an error banner.
    let mut viewer = Viewer::new(
        fetcher,
        config
            .viewport
            .viewer_options(config.source.load_options()),
    );
    if viewer.open(location.clone()).await.is_ok() {
        for overlay in &config.viewport.overlays {
            if let Err(e) = viewer.add_overlay(location.overlay(overlay.as_str())).await {
                warn!(overlay = %overlay, "Overlay not shown: {}", e);
            }
        }
    }

    let html = render_viewer_page(&viewer);

    match config.output {
        None => {
            println!("{}", html);
            ExitCode::SUCCESS
        }
        Some(ref path) => match tokio::fs::write(path, html).await {
            Ok(()) => {
                info!(path = %path.display(), "Viewer page written");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to write {}: {}", path.display(), e);
                ExitCode::FAILURE
            }
        },
    }
}

// =============================================================================
// Fetch Command
// =============================================================================

async fn run_fetch(config: FetchConfig) -> ExitCode {
    let (location, fetcher) = match prepare(&config.source, config.validate()) {
        Ok(prepared) => prepared,
        Err(code) => return code,
    };

    let viewer = match open_viewer(location, fetcher, &config.source, &config.viewport).await {
        Ok(viewer) => viewer,
        Err(code) => return code,
    };

    let Some(source) = viewer.source() else {
        return ExitCode::FAILURE;
    };
    let resolver = source.resolver().clone();
    let format = source.descriptor().format.clone();

    let results = viewer.fetch_visible_tiles().await;
    let total = results.len();
    let mut failed = 0;

    for result in results {
        match result {
            Ok(tile) => {
                let Some(level) = resolver.level(tile.coord.z) else {
                    failed += 1;
                    continue;
                };
                let name = format!("{}_{}.{}", tile.coord.x, tile.coord.y, format);
                if let Err(e) = write_tile(&config.out_dir, level, &name, &tile.data).await {
                    error!(tile = %tile.coord, "Failed to write tile: {}", e);
                    failed += 1;
                }
            }
            Err(e) => {
                println!("failed  {}", e);
                failed += 1;
            }
        }
    }

    info!(
        dir = %config.out_dir.display(),
        fetched = total - failed,
        failed = failed,
        "Fetch complete"
    );
    println!("{} of {} tiles written to {}", total - failed, total, config.out_dir.display());

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn write_tile(dir: &Path, level: u32, name: &str, data: &[u8]) -> std::io::Result<()> {
    let level_dir = dir.join(level.to_string());
    tokio::fs::create_dir_all(&level_dir).await?;
    tokio::fs::write(level_dir.join(name), data).await
}

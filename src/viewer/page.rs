//! Viewer page - standalone HTML mounting an OpenLayers map into `#map`.
//!
//! All tile math is done by the crate and baked into the page: the tile URL
//! template, the level offset, the extent and the resolution ladder. The
//! page only wires them into a Zoomify source, a tile layer and a view.
//! The view runs in a pixel projection whose `metersPerUnit` is the scale
//! line's meters per pixel, so the page's scale bar agrees with
//! [`ScaleLine::render`](crate::ScaleLine::render).

use serde::Serialize;

use super::Viewer;
use crate::io::Fetcher;
use crate::source::TileSource;

/// OpenLayers release the page loads from the CDN.
const OPENLAYERS_VERSION: &str = "v9.2.4";

/// Escape HTML special characters to prevent XSS attacks.
fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Serialize a value as a JS literal safe to embed in a `<script>` block.
fn js_literal<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

/// Layer configuration handed to the page script.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayerConfig<'a> {
    url: String,
    offset: u32,
    size: [u32; 2],
    tile_size: u32,
    extent: [f64; 4],
    attributions: Option<&'a str>,
    cross_origin: &'a str,
}

impl<'a> LayerConfig<'a> {
    fn for_source(source: &'a TileSource) -> Self {
        let descriptor = source.descriptor();
        let options = source.options();
        Self {
            url: source.resolver().template().to_string(),
            offset: source.resolver().level_offset(),
            size: [descriptor.width, descriptor.height],
            tile_size: descriptor.tile_size,
            extent: source.extent().to_array(),
            attributions: options.attributions.as_deref(),
            cross_origin: &options.cross_origin,
        }
    }
}

/// Scale line settings handed to the page script.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScaleLineConfig {
    min_width: u32,
    meters_per_unit: f64,
}

/// Render the viewer page for the current state of `viewer`.
///
/// A viewer without a configured base image renders the empty map and, if
/// a load was attempted, an error banner naming the failure.
pub fn render_viewer_page<F: Fetcher>(viewer: &Viewer<F>) -> String {
    let title = viewer
        .base()
        .map(|layer| layer.location().image_id().to_string())
        .unwrap_or_else(|| "Deep Zoom Viewer".to_string());

    let base = viewer.source().map(LayerConfig::for_source);
    let overlays: Vec<LayerConfig<'_>> = viewer
        .overlays()
        .iter()
        .filter_map(|layer| layer.source())
        .map(LayerConfig::for_source)
        .collect();
    let resolutions = viewer.view().map(|view| view.resolutions().to_vec());

    let (banner_class, error_message) = match viewer.base().and_then(|layer| layer.error()) {
        Some(err) => ("error-banner visible", html_escape(&err.to_string())),
        None => ("error-banner", String::new()),
    };

    let scale_line = &viewer.options().scale_line;
    let scale_line = ScaleLineConfig {
        min_width: scale_line.min_width,
        meters_per_unit: scale_line.meters_per_pixel,
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Deep Zoom Viewer - {escaped_title}</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/ol@{ol_version}/ol.css">
    <script src="https://cdn.jsdelivr.net/npm/ol@{ol_version}/dist/ol.js"></script>
    <style>
        * {{
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }}
        body {{
            background: #0f0f0f;
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            overflow: hidden;
        }}
        #map {{
            width: 100vw;
            height: 100vh;
        }}
        .error-banner {{
            position: absolute;
            top: 0;
            left: 0;
            right: 0;
            background: rgba(220, 38, 38, 0.95);
            color: white;
            padding: 12px 20px;
            font-size: 14px;
            z-index: 1000;
            display: none;
        }}
        .error-banner.visible {{
            display: block;
        }}
        .error-banner .error-details {{
            font-size: 12px;
            opacity: 0.9;
            margin-top: 4px;
        }}
    </style>
</head>
<body>
    <div id="error-banner" class="{banner_class}">
        <strong>Failed to load image</strong>
        <div class="error-details" id="error-details">{error_message}</div>
    </div>

    <div id="map"></div>

    <script>
        const baseLayer = {base};
        const overlayLayers = {overlays};
        const resolutions = {resolutions};
        const scaleLine = {scale_line};

        function tileLayer(config) {{
            const source = new ol.source.Zoomify({{
                attributions: config.attributions || undefined,
                url: config.url,
                size: config.size,
                tileSize: config.tileSize,
                crossOrigin: config.crossOrigin
            }});

            source.setTileUrlFunction(function (tileCoord) {{
                return config.url
                    .replace('{{z}}', tileCoord[0] + config.offset)
                    .replace('{{x}}', tileCoord[1])
                    .replace('{{y}}', tileCoord[2]);
            }});

            return new ol.layer.Tile({{ source: source, extent: config.extent }});
        }}

        const map = new ol.Map({{
            controls: ol.control.defaults.defaults().extend([
                new ol.control.ScaleLine({{ units: "metric", minWidth: scaleLine.minWidth }})
            ]),
            target: "map"
        }});

        if (baseLayer) {{
            map.addLayer(tileLayer(baseLayer));
            overlayLayers.forEach(function (config) {{
                map.addLayer(tileLayer(config));
            }});

            const projection = new ol.proj.Projection({{
                code: "dzi-pixels",
                units: "pixels",
                metersPerUnit: scaleLine.metersPerUnit,
                extent: baseLayer.extent
            }});

            map.setView(new ol.View({{
                projection: projection,
                resolutions: resolutions,
                extent: baseLayer.extent,
                constrainOnlyCenter: true
            }}));
            map.getView().fit(baseLayer.extent, {{ size: map.getSize() }});
        }}
    </script>
</body>
</html>"##,
        escaped_title = html_escape(&title),
        ol_version = OPENLAYERS_VERSION,
        banner_class = banner_class,
        error_message = error_message,
        base = js_literal(&base),
        overlays = js_literal(&overlays),
        resolutions = js_literal(&resolutions),
        scale_line = js_literal(&scale_line),
    )
}

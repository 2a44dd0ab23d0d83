pub mod attributes;
pub mod color;
pub mod config;
pub mod layout;
pub mod output;
pub mod plots;
pub mod scene;
pub mod svg;
pub mod text;
pub mod theme;

use std::path::Path;

use config::RenderConfig;
use scene::Scene;
use thiserror::Error;

pub use config::resolve_config;
pub use scene::{
    BinAxis, Draw1d, Draw2d, LegendEntrySpec, LegendSpec, LineSpec, SceneBody, Series1d, Series2d,
    StatFields, StatsSpec,
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown output format: {0}")]
    UnknownFormat(String),
    #[error("scene serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
    #[cfg(feature = "jpeg")]
    #[error("JPEG encoding error: {0}")]
    Jpeg(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Render a scene to an SVG string.
pub fn render_svg(scene: &Scene, config: &RenderConfig) -> Result<String> {
    plots::render_scene(scene, config)
}

/// Render a scene to bytes in `format` (`svg`, `png`, `jpg`/`jpeg` or `C`).
///
/// `macro_name` is the entry point of a `.C` macro and is ignored otherwise.
pub fn render_to_bytes(
    scene: &Scene,
    format: &str,
    macro_name: &str,
    config: &RenderConfig,
) -> Result<Vec<u8>> {
    if format == "C" {
        return Ok(output::macro_c::scene_to_macro(scene, macro_name).into_bytes());
    }
    let svg = render_svg(scene, config)?;
    match format.to_ascii_lowercase().as_str() {
        "svg" => Ok(svg.into_bytes()),
        #[cfg(feature = "png")]
        "png" => output::png::svg_to_png(&svg, config.output.dpi),
        #[cfg(feature = "jpeg")]
        "jpg" | "jpeg" => output::jpeg::svg_to_jpeg(&svg, config.output.dpi, config.output.jpeg_quality),
        other => Err(RenderError::UnknownFormat(other.to_string())),
    }
}

/// Render a scene to a file, format inferred from the extension.
pub fn render_to_file(scene: &Scene, path: &Path, config: &RenderConfig) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("svg");
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(&scene.name);
    let bytes = render_to_bytes(scene, ext, stem, config)?;
    std::fs::write(path, bytes)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

use crate::color::Color;
use crate::theme::BuiltinTheme;

/// Top-level rendering configuration (YAML or programmatic).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub theme: String,
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub margins: MarginsConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub output: OutputConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        BuiltinTheme::Root.base_config()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        // TCanvas default window size
        Self { width: 700.0, height: 500.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub title_size: f64,
    pub label_size: f64,
    pub tick_size: f64,
    pub stats_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { title_size: 16.0, label_size: 14.0, tick_size: 12.0, stats_size: 11.0 }
    }
}

/// Pad margins as fractions of the canvas (ROOT `gPad->SetLeftMargin` etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginsConfig {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for MarginsConfig {
    fn default() -> Self {
        Self { left: 0.1, right: 0.1, top: 0.1, bottom: 0.1 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_direction: String,
    pub show_top_ticks: bool,
    pub show_right_ticks: bool,
    pub tick_length: f64,
    pub minor_tick_length: f64,
    pub target_ticks: usize,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_direction: "in".into(),
            show_top_ticks: false,
            show_right_ticks: false,
            tick_length: 9.0,
            minor_tick_length: 4.5,
            target_ticks: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub alpha: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: false, color: Color::hex("#b0b0b0"), alpha: 0.6 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dpi: u32,
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dpi: 72, jpeg_quality: 90 }
    }
}

/// Resolve a RenderConfig from an optional YAML string.
///
/// The `theme` key selects the base preset; every other key overrides it,
/// nested sections field by field.
pub fn resolve_config(user_yaml: Option<&str>) -> crate::Result<RenderConfig> {
    let Some(yaml) = user_yaml.filter(|y| !y.trim().is_empty()) else {
        return Ok(RenderConfig::default());
    };
    let overlay: Value =
        serde_yaml_ng::from_str(yaml).map_err(|e| crate::RenderError::Config(e.to_string()))?;
    if overlay.is_null() {
        return Ok(RenderConfig::default());
    }
    if !overlay.is_mapping() {
        return Err(crate::RenderError::Config("render config must be a mapping".into()));
    }
    let theme = overlay.get("theme").and_then(Value::as_str).map(BuiltinTheme::parse);
    let base = theme.unwrap_or(BuiltinTheme::Root).base_config();

    let mut merged =
        serde_yaml_ng::to_value(&base).map_err(|e| crate::RenderError::Config(e.to_string()))?;
    merge_yaml(&mut merged, overlay);
    serde_yaml_ng::from_value(merged).map_err(|e| crate::RenderError::Config(e.to_string()))
}

fn merge_yaml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge_yaml(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_root_theme() {
        let cfg = resolve_config(None).unwrap();
        assert_eq!(cfg.theme, "root");
        assert_eq!(cfg.figure.width, 700.0);
        assert!(!cfg.grid.show);
    }

    #[test]
    fn partial_override_keeps_siblings() {
        let cfg = resolve_config(Some("figure:\n  width: 800\noutput:\n  jpeg_quality: 75\n")).unwrap();
        assert_eq!(cfg.figure.width, 800.0);
        assert_eq!(cfg.figure.height, 500.0);
        assert_eq!(cfg.output.jpeg_quality, 75);
        assert_eq!(cfg.output.dpi, 72);
    }

    #[test]
    fn theme_selects_base() {
        let cfg = resolve_config(Some("theme: minimal\n")).unwrap();
        assert_eq!(cfg.theme, "minimal");
        assert!(cfg.grid.show);
        assert_eq!(cfg.axes.tick_direction, "out");

        let cfg = resolve_config(Some("theme: minimal\ngrid:\n  show: false\n")).unwrap();
        assert!(!cfg.grid.show);
    }

    #[test]
    fn rejects_garbage() {
        assert!(resolve_config(Some("- 1\n- 2\n")).is_err());
        assert!(resolve_config(Some("figure: [1, 2\n")).is_err());
    }

    #[test]
    fn empty_document_is_default() {
        let cfg = resolve_config(Some("")).unwrap();
        assert_eq!(cfg.theme, "root");
    }
}

//! `--config` YAML: display style, report wording and render settings in one file.
//!
//! ```yaml
//! style:
//!   stat_options: "1111"
//! report:
//!   fiducial: "wallv > 200 && nring == 2"
//! render:
//!   theme: minimal
//!   output: { dpi: 144 }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tp_plot::{DisplayStyle, RenderConfig, ReportConfig};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ToolsConfig {
    style: DisplayStyle,
    report: ReportConfig,
    /// Kept raw so the `theme` key can pick the preset it overrides.
    render: Option<serde_yaml_ng::Value>,
}

/// Settings every command runs with.
#[derive(Debug, Default)]
pub struct Settings {
    pub style: DisplayStyle,
    pub report: ReportConfig,
    pub render: RenderConfig,
}

pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_settings(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn parse_settings(text: &str) -> Result<Settings> {
    let cfg: ToolsConfig = if text.trim().is_empty() {
        ToolsConfig::default()
    } else {
        serde_yaml_ng::from_str(text)?
    };
    let render_yaml = cfg.render.map(|v| serde_yaml_ng::to_string(&v)).transpose()?;
    let render = tp_render::resolve_config(render_yaml.as_deref())?;
    Ok(Settings { style: cfg.style, report: cfg.report, render })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let s = parse_settings("").unwrap();
        assert_eq!(s.report, ReportConfig::default());
        assert_eq!(s.render.figure.width, 700.0);
    }

    #[test]
    fn sections_override() {
        let s = parse_settings(
            "style:\n  stat_options: \"111\"\nreport:\n  background_name: cosmics\nrender:\n  theme: minimal\n  output:\n    dpi: 144\n",
        )
        .unwrap();
        assert_eq!(s.style.stat_options.to_letters(), "nem");
        assert_eq!(s.report.background_name, "cosmics");
        assert_eq!(s.report.fiducial, "wallv > 200");
        assert!(s.render.grid.show);
        assert_eq!(s.render.output.dpi, 144);
    }

    #[test]
    fn unknown_section_rejected() {
        assert!(parse_settings("plots: {}\n").is_err());
    }

    #[test]
    fn bad_stat_option_rejected() {
        assert!(parse_settings("style:\n  stat_options: xyz\n").is_err());
    }
}

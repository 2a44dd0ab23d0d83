use crate::color::Color;
use crate::config::*;

/// Built-in theme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTheme {
    /// Plain ROOT look: white pad, inward ticks on the bottom/left axes, no grid.
    Root,
    Minimal,
}

impl BuiltinTheme {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "minimal" => Self::Minimal,
            other => {
                if other != "root" {
                    log::warn!("unknown theme '{s}', falling back to 'root'");
                }
                Self::Root
            }
        }
    }

    pub fn base_config(self) -> RenderConfig {
        match self {
            Self::Root => root(),
            Self::Minimal => minimal(),
        }
    }
}

fn root() -> RenderConfig {
    RenderConfig {
        theme: "root".into(),
        figure: FigureConfig::default(),
        font: FontConfig::default(),
        margins: MarginsConfig::default(),
        axes: AxesConfig::default(),
        grid: GridConfig::default(),
        output: OutputConfig::default(),
    }
}

fn minimal() -> RenderConfig {
    RenderConfig {
        theme: "minimal".into(),
        font: FontConfig { title_size: 14.0, label_size: 12.0, tick_size: 10.5, stats_size: 10.0 },
        margins: MarginsConfig { left: 0.12, right: 0.06, top: 0.08, bottom: 0.12 },
        axes: AxesConfig {
            tick_direction: "out".into(),
            show_top_ticks: false,
            show_right_ticks: false,
            tick_length: 5.0,
            minor_tick_length: 0.0,
            target_ticks: 6,
        },
        grid: GridConfig { show: true, color: Color::hex("#cbd5e1"), alpha: 0.55 },
        ..root()
    }
}

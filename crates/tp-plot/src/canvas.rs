//! Caller-owned drawing surface.

use std::path::Path;

use tp_render::config::RenderConfig;
use tp_render::scene::Scene;

use crate::error::Result;

/// A named canvas: the scene drawn on it, its y-scale and the last image shown.
///
/// Helpers borrow the canvas mutably for the duration of one call. The
/// `log_y` flag is the pad's `SetLogy` state; it is copied into the scene
/// whenever the canvas is displayed or printed.
#[derive(Debug, Clone)]
pub struct Canvas {
    scene: Scene,
    log_y: bool,
    config: RenderConfig,
    displayed: Option<String>,
}

impl Canvas {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, RenderConfig::default())
    }

    /// Canvas sized by `config.figure`.
    pub fn with_config(name: impl Into<String>, config: RenderConfig) -> Self {
        let scene = Scene::new(name, config.figure.width, config.figure.height);
        Self { scene, log_y: false, config, displayed: None }
    }

    pub fn name(&self) -> &str {
        &self.scene.name
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn log_y(&self) -> bool {
        self.log_y
    }

    pub fn set_log_y(&mut self, log_y: bool) {
        self.log_y = log_y;
    }

    /// Drop the current drawing.
    pub fn clear(&mut self) {
        self.scene.clear();
    }

    /// Render the current scene; the SVG stays available from [`displayed_svg`](Self::displayed_svg).
    pub fn display(&mut self) -> Result<()> {
        self.scene.log_y = self.log_y;
        let svg = tp_render::render_svg(&self.scene, &self.config)?;
        log::debug!("displayed canvas '{}' ({} bytes)", self.scene.name, svg.len());
        self.displayed = Some(svg);
        Ok(())
    }

    pub fn displayed_svg(&self) -> Option<&str> {
        self.displayed.as_deref()
    }

    /// Write one file, format taken from the extension (`png`, `jpg`/`jpeg`, `svg`, `C`).
    pub fn print(&mut self, path: &Path) -> Result<()> {
        self.scene.log_y = self.log_y;
        tp_render::render_to_file(&self.scene, path, &self.config)?;
        Ok(())
    }

    /// Run `f` with the y-axis in log scale when `log` is set, then restore
    /// linear scale whatever `f` returned.
    pub(crate) fn with_log_scale<T>(
        &mut self,
        log: bool,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        if log {
            self.set_log_y(true);
        }
        let out = f(self);
        self.set_log_y(false);
        out
    }
}

use crate::config::RenderConfig;
use crate::layout::axes::Axis;
use crate::attributes::TextAttr;
use crate::text::measure_text;

/// Rectangular frame area within the canvas, in pixels from the top-left.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Frame from the configured pad margins, widened on the left when the
    /// y tick labels would not fit.
    pub fn auto(
        canvas_w: f64,
        canvas_h: f64,
        y_axis: Option<&Axis>,
        extra_right: f64,
        config: &RenderConfig,
    ) -> Self {
        let m = &config.margins;
        let mut left = m.left * canvas_w;
        if let Some(y) = y_axis {
            let tick_style = TextAttr::sized(config.font.tick_size);
            let widest = y
                .tick_labels
                .iter()
                .map(|l| measure_text(l, &tick_style).width)
                .fold(0.0_f64, f64::max);
            let mut needed = widest + 8.0;
            if !y.label.is_empty() {
                needed += config.font.label_size + 8.0;
            }
            left = left.max(needed);
        }
        let top = m.top * canvas_h;
        let right = m.right * canvas_w + extra_right;
        let bottom = m.bottom * canvas_h;

        Self {
            left,
            top,
            width: (canvas_w - left - right).max(50.0),
            height: (canvas_h - top - bottom).max(50.0),
        }
    }

    #[cfg(test)]
    pub fn manual(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
}

/// Convert NDC coordinates (origin bottom-left, unit square) to canvas pixels.
pub fn ndc_to_px(x: f64, y: f64, canvas_w: f64, canvas_h: f64) -> (f64, f64) {
    (x * canvas_w, (1.0 - y) * canvas_h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn margins_follow_config() {
        let cfg = RenderConfig::default();
        let area = PlotArea::auto(700.0, 500.0, None, 0.0, &cfg);
        assert_relative_eq!(area.left, 70.0);
        assert_relative_eq!(area.top, 50.0);
        assert_relative_eq!(area.right(), 630.0);
        assert_relative_eq!(area.bottom(), 450.0);
    }

    #[test]
    fn wide_tick_labels_push_frame() {
        let cfg = RenderConfig::default();
        let y = Axis::exact_linear(0.0, 1_000_000.0, 5).with_label("Events / bin");
        let area = PlotArea::auto(700.0, 500.0, Some(&y), 0.0, &cfg);
        assert!(area.left > 70.0);
    }

    #[test]
    fn ndc_origin_is_bottom_left() {
        assert_eq!(ndc_to_px(0.0, 0.0, 700.0, 500.0), (0.0, 500.0));
        assert_eq!(ndc_to_px(1.0, 1.0, 700.0, 500.0), (700.0, 0.0));
    }
}

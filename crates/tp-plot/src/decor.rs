//! Legends and line annotations.

use tp_render::{LegendEntrySpec, LegendSpec, LineSpec, Series1d, Series2d};

use crate::style::DisplayStyle;

/// The look of one drawn series, what a legend entry refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub name: String,
    /// ROOT color index.
    pub color: u16,
    pub line_width: f64,
}

impl From<&Series1d> for SeriesStyle {
    fn from(s: &Series1d) -> Self {
        Self { name: s.name.clone(), color: s.color, line_width: s.line_width }
    }
}

impl From<&Series2d> for SeriesStyle {
    fn from(s: &Series2d) -> Self {
        Self { name: s.name.clone(), color: s.color, line_width: 1.0 }
    }
}

/// Legend with one line entry per `(series, label)` pair.
///
/// Pairs are zipped, so surplus series or labels are ignored.
pub fn get_legend<S: AsRef<str>>(
    style: &DisplayStyle,
    series: &[SeriesStyle],
    labels: &[S],
    header: Option<&str>,
) -> LegendSpec {
    let l = &style.legend;
    let entries = series
        .iter()
        .zip(labels)
        .map(|(s, label)| LegendEntrySpec {
            object: Some(s.name.clone()),
            label: label.as_ref().to_string(),
            color: s.color,
            line_width: s.line_width,
            option: "L".to_string(),
        })
        .collect();
    LegendSpec {
        x1: l.x1,
        y1: l.y1,
        x2: l.x2,
        y2: l.y2,
        header: header.map(str::to_string),
        entries,
        border_size: l.border_size,
        fill_color: l.fill_color,
        text_font: l.text_font,
        text_size: l.text_size,
    }
}

/// A straight line in data coordinates (`TLine`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineAnnotation {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub color: u16,
    pub width: f64,
    pub dashed: bool,
}

/// Black line of width 2 between two points.
pub fn make_line(x1: f64, y1: f64, x2: f64, y2: f64) -> LineAnnotation {
    LineAnnotation { x1, y1, x2, y2, color: 1, width: 2.0, dashed: false }
}

impl LineAnnotation {
    pub fn with_color(mut self, color: u16) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }
}

impl From<&LineAnnotation> for LineSpec {
    fn from(l: &LineAnnotation) -> Self {
        LineSpec {
            x1: l.x1,
            y1: l.y1,
            x2: l.x2,
            y2: l.y2,
            color: l.color,
            width: l.width,
            style: if l.dashed { 2 } else { 1 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(name: &str, color: u16) -> SeriesStyle {
        SeriesStyle { name: name.into(), color, line_width: 2.0 }
    }

    #[test]
    fn legend_geometry_and_text() {
        let leg = get_legend(&DisplayStyle::default(), &[series("h1", 2)], &["PDK"], None);
        assert_eq!((leg.x1, leg.y1, leg.x2, leg.y2), (0.70, 0.32, 0.94, 0.53));
        assert_eq!(leg.border_size, 0);
        assert_eq!(leg.fill_color, None);
        assert_eq!(leg.text_font, 42);
        assert_eq!(leg.text_size, 0.035);
        assert_eq!(leg.entries[0].option, "L");
        assert_eq!(leg.entries[0].object.as_deref(), Some("h1"));
    }

    #[test]
    fn legend_zips_series_and_labels() {
        let two = [series("h1", 2), series("h2", 4)];
        let leg = get_legend(&DisplayStyle::default(), &two, &["signal"], Some("hdr"));
        assert_eq!(leg.entries.len(), 1);
        assert_eq!(leg.header.as_deref(), Some("hdr"));

        let leg = get_legend(&DisplayStyle::default(), &two[..1], &["a", "b", "c"], None);
        assert_eq!(leg.entries.len(), 1);
        assert_eq!(leg.entries[0].label, "a");
    }

    #[test]
    fn line_defaults_and_builders() {
        let l = make_line(0.0, 1.0, 10.0, 1.0);
        assert_eq!((l.color, l.width, l.dashed), (1, 2.0, false));
        let spec = LineSpec::from(&l.with_color(2).with_width(3.0).dashed());
        assert_eq!(spec.color, 2);
        assert_eq!(spec.width, 3.0);
        assert_eq!(spec.style, 2);
        assert_eq!(LineSpec::from(&l).style, 1);
    }
}

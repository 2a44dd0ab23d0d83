use crate::attributes::TextAttr;

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

// Average advance of a Helvetica-like face, in ems.
const REGULAR_ADVANCE: f64 = 0.55;
const BOLD_ADVANCE: f64 = 0.60;
const MONO_ADVANCE: f64 = 0.60;

/// Estimate text extent in points.
///
/// Output relies on system fonts at rasterisation time, so layout uses
/// average glyph advances rather than real font metrics.
pub fn measure_text(text: &str, style: &TextAttr) -> TextMetrics {
    let advance = if style.font.is_monospace() {
        MONO_ADVANCE
    } else if style.font.is_bold() {
        BOLD_ADVANCE
    } else {
        REGULAR_ADVANCE
    };
    let glyphs = text.chars().count() as f64;
    TextMetrics {
        width: glyphs * advance * style.size,
        height: style.size * 1.2,
        ascent: style.size * 0.9,
    }
}

use crate::color::Color;
use crate::layout::margins::ndc_to_px;
use crate::attributes::*;
use crate::scene::LegendSpec;
use crate::svg::SvgCanvas;

/// Fraction of the legend width reserved for the entry symbols (`TLegend::fMargin`).
const SYMBOL_MARGIN: f64 = 0.25;

/// Draw a legend box positioned in NDC.
pub fn draw_legend(canvas: &mut SvgCanvas, legend: &LegendSpec) {
    let rows = legend.entries.len() + usize::from(legend.header.is_some());
    if rows == 0 {
        return;
    }

    let (w, h) = (canvas.width, canvas.height);
    let (x1, y_top) = ndc_to_px(legend.x1.min(legend.x2), legend.y1.max(legend.y2), w, h);
    let (x2, y_bottom) = ndc_to_px(legend.x1.max(legend.x2), legend.y1.min(legend.y2), w, h);
    let box_w = x2 - x1;
    let box_h = y_bottom - y_top;

    let fill = legend.fill_color.map(Color::root);
    let border = (legend.border_size > 0).then_some((Color::BLACK, legend.border_size as f64));
    if fill.is_some() || border.is_some() {
        canvas.rect(x1, y_top, box_w, box_h, &BoxAttr { fill, border });
    }

    let row_h = box_h / rows as f64;
    let text_size = (legend.text_size * h).min(row_h * 0.9);
    let text_style = TextAttr {
        font: RootFont(legend.text_font),
        ..TextAttr::sized(text_size).aligned(TextAlign::LEFT_CENTER)
    };

    let mut row = 0;
    if let Some(header) = &legend.header {
        let style = text_style.aligned(TextAlign::CENTER);
        canvas.text(x1 + box_w / 2.0, y_top + row_h * 0.5, header, &style);
        row += 1;
    }

    let symbol_w = box_w * SYMBOL_MARGIN;
    for entry in &legend.entries {
        let cy = y_top + row_h * (row as f64 + 0.5);
        let color = Color::root(entry.color);
        let opt = entry.option.to_uppercase();
        if opt.contains('F') {
            let sh = row_h * 0.5;
            canvas.rect(x1 + symbol_w * 0.15, cy - sh / 2.0, symbol_w * 0.7, sh, &BoxAttr::filled(color));
        }
        if opt.contains('L') {
            let ls = LineAttr::solid(color, entry.line_width.max(0.5));
            canvas.line(x1 + symbol_w * 0.15, cy, x1 + symbol_w * 0.85, cy, &ls);
        }
        if opt.contains('P') {
            canvas.marker(x1 + symbol_w * 0.5, cy, &MarkerAttr::new(MarkerKind::FullCircle, 2.5, color));
        }
        canvas.text(x1 + symbol_w, cy, &entry.label, &text_style);
        row += 1;
    }
}

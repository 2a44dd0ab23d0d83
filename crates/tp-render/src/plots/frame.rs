use crate::color::Color;
use crate::config::RenderConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::attributes::*;
use crate::svg::SvgCanvas;

/// Draw the pad frame with ticks, optional grid, tick labels and axis titles.
pub fn draw_frame(
    canvas: &mut SvgCanvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    config: &RenderConfig,
) {
    let black = Color::BLACK;
    let tick_line = LineAttr::solid(black, 1.0);
    let minor_line = LineAttr::solid(black, 0.8);
    let grid_line =
        LineAttr::solid(config.grid.color.with_alpha(config.grid.alpha), 0.5).with_kind(LineKind::Dotted);

    let inward = config.axes.tick_direction != "out";
    let dir = if inward { -1.0 } else { 1.0 };
    let tl = config.axes.tick_length;
    let mtl = config.axes.minor_tick_length;

    canvas.rect(area.left, area.top, area.width, area.height, &BoxAttr::outlined(black, 1.0));

    // ── X axis ──
    let x_label_style = TextAttr::sized(config.font.tick_size).aligned(TextAlign::CENTER_TOP);
    for (i, &val) in x_axis.tick_positions.iter().enumerate() {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if px < area.left - 0.5 || px > area.right() + 0.5 {
            continue;
        }
        if config.grid.show {
            canvas.line(px, area.top, px, area.bottom(), &grid_line);
        }
        canvas.line(px, area.bottom(), px, area.bottom() + dir * tl, &tick_line);
        if config.axes.show_top_ticks {
            canvas.line(px, area.top, px, area.top - dir * tl, &tick_line);
        }
        if let Some(label) = x_axis.tick_labels.get(i) {
            let ly = if inward { area.bottom() + 4.0 } else { area.bottom() + tl + 4.0 };
            canvas.text(px, ly, label, &x_label_style);
        }
    }
    if mtl > 0.0 {
        for &val in &x_axis.minor_ticks {
            let px = x_axis.data_to_pixel(val, area.left, area.right());
            if px >= area.left - 0.5 && px <= area.right() + 0.5 {
                canvas.line(px, area.bottom(), px, area.bottom() + dir * mtl, &minor_line);
            }
        }
    }

    // ── Y axis ──
    let y_label_style = TextAttr::sized(config.font.tick_size).aligned(TextAlign::RIGHT_CENTER);
    let mut widest_label = 0.0_f64;
    for (i, &val) in y_axis.tick_positions.iter().enumerate() {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }
        if config.grid.show {
            canvas.line(area.left, py, area.right(), py, &grid_line);
        }
        canvas.line(area.left, py, area.left - dir * tl, py, &tick_line);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), py, area.right() + dir * tl, py, &tick_line);
        }
        if let Some(label) = y_axis.tick_labels.get(i) {
            let lx = if inward { area.left - 4.0 } else { area.left - tl - 4.0 };
            canvas.text(lx, py, label, &y_label_style);
            widest_label = widest_label.max(canvas.measure_text(label, &y_label_style).width);
        }
    }
    if mtl > 0.0 {
        for &val in &y_axis.minor_ticks {
            let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
            if py >= area.top - 0.5 && py <= area.bottom() + 0.5 {
                canvas.line(area.left, py, area.left - dir * mtl, py, &minor_line);
            }
        }
    }

    // ── Axis titles, right/top aligned as in ROOT ──
    let title_style = TextAttr::sized(config.font.label_size).aligned(TextAlign::RIGHT_BOTTOM);
    if !x_axis.label.is_empty() {
        let ly = area.bottom() + config.font.tick_size + config.font.label_size + 10.0;
        canvas.text(area.right(), ly, &x_axis.label, &title_style);
    }
    if !y_axis.label.is_empty() {
        let lx = area.left - widest_label - config.font.label_size * 0.5 - 8.0;
        canvas.text_rotated(lx.max(config.font.label_size), area.top, &y_axis.label, &title_style, -90.0);
    }
}

/// Histogram title, centered above the frame.
pub fn draw_title(canvas: &mut SvgCanvas, area: &PlotArea, title: &str, config: &RenderConfig) {
    if title.is_empty() {
        return;
    }
    let style = TextAttr::sized(config.font.title_size).aligned(TextAlign::CENTER);
    canvas.text(canvas.width / 2.0, area.top / 2.0, title, &style);
}

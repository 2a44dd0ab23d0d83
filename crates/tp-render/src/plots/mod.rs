pub mod frame;
pub mod hist1d;
pub mod hist2d;

use crate::config::RenderConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::attributes::LineAttr;
use crate::scene::{LineSpec, Scene, SceneBody};
use crate::svg::SvgCanvas;

/// Render any scene to an SVG document.
pub fn render_scene(scene: &Scene, config: &RenderConfig) -> crate::Result<String> {
    match &scene.body {
        SceneBody::Empty => render_empty(scene, config),
        SceneBody::Hist1d(series) => hist1d::render(scene, series, config),
        SceneBody::Hist2d(series) => hist2d::render(scene, series, config),
    }
}

/// A blank unit frame, what an undrawn pad looks like.
pub(crate) fn render_empty(scene: &Scene, config: &RenderConfig) -> crate::Result<String> {
    let mut canvas = SvgCanvas::new(scene.width, scene.height)?;
    let x_axis = Axis::exact_linear(0.0, 1.0, config.axes.target_ticks).with_label(scene.x_label.clone());
    let y_axis = Axis::exact_linear(0.0, 1.0, config.axes.target_ticks).with_label(scene.y_label.clone());
    let area = PlotArea::auto(scene.width, scene.height, Some(&y_axis), 0.0, config);
    frame::draw_frame(&mut canvas, &area, &x_axis, &y_axis, config);
    frame::draw_title(&mut canvas, &area, &scene.title, config);
    draw_lines(&mut canvas, &area, &x_axis, &y_axis, &scene.lines);
    Ok(canvas.finish_svg())
}

/// Line annotations, given in data coordinates and drawn unclipped like `TLine`.
pub(crate) fn draw_lines(
    canvas: &mut SvgCanvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    lines: &[LineSpec],
) {
    for l in lines {
        let attr = LineAttr::root(l.color, l.width, l.style);
        canvas.line(
            x_axis.data_to_pixel(l.x1, area.left, area.right()),
            y_axis.data_to_pixel(l.y1, area.bottom(), area.top),
            x_axis.data_to_pixel(l.x2, area.left, area.right()),
            y_axis.data_to_pixel(l.y2, area.bottom(), area.top),
            &attr,
        );
    }
}

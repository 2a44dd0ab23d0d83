use crate::color::{Color, bird};
use crate::config::RenderConfig;
use crate::layout::axes::Axis;
use crate::layout::legend::draw_legend;
use crate::layout::margins::PlotArea;
use crate::layout::stats::{draw_stats, stats_box_2d};
use crate::plots::draw_lines;
use crate::plots::frame::{draw_frame, draw_title};
use crate::attributes::*;
use crate::scene::{Draw2d, Scene, Series2d};
use crate::svg::SvgCanvas;

/// Dots drawn in the fullest cell of a scatter plot.
const SCATTER_MAX_DOTS: f64 = 25.0;
/// Color bar width as a fraction of the canvas width.
const PALETTE_WIDTH: f64 = 0.05;

pub fn render(scene: &Scene, series: &[Series2d], config: &RenderConfig) -> crate::Result<String> {
    let Some(first) = series.first() else {
        return super::render_empty(scene, config);
    };
    let mut canvas = SvgCanvas::new(scene.width, scene.height)?;

    let x_axis = Axis::exact_linear(first.x.min, first.x.max, config.axes.target_ticks)
        .with_label(scene.x_label.clone());
    let y_axis = if scene.log_y && first.y.max > 0.0 {
        Axis::auto_log(first.y.min.max(first.y.max * 1e-3), first.y.max)
    } else {
        Axis::exact_linear(first.y.min, first.y.max, config.axes.target_ticks)
    }
    .with_label(scene.y_label.clone());

    let colz = series.iter().any(|s| s.draw == Draw2d::Colz);
    let palette_room = if colz { scene.width * (PALETTE_WIDTH + 0.04) } else { 0.0 };
    let area = PlotArea::auto(scene.width, scene.height, Some(&y_axis), palette_room, config);
    draw_frame(&mut canvas, &area, &x_axis, &y_axis, config);
    draw_title(&mut canvas, &area, &scene.title, config);

    let z_max = series.iter().map(Series2d::max_cell).fold(0.0, f64::max);

    canvas.push_clip(area.left, area.top, area.width, area.height);
    for (index, s) in series.iter().enumerate() {
        let cells = CellMapper { area: &area, x: &x_axis, y: &y_axis, series: s };
        match s.draw {
            Draw2d::Scatter => draw_scatter(&mut canvas, &cells, index, z_max),
            Draw2d::Box => draw_boxes(&mut canvas, &cells, z_max),
            Draw2d::Colz => draw_colz(&mut canvas, &cells, z_max),
        }
    }
    canvas.pop_clip();

    if colz && z_max > 0.0 {
        draw_palette(&mut canvas, &area, z_max, config);
    }

    draw_lines(&mut canvas, &area, &x_axis, &y_axis, &scene.lines);

    if let Some(legend) = &scene.legend {
        draw_legend(&mut canvas, legend);
    }
    if let Some(stats) = &scene.stats
        && !stats.fields.is_empty()
    {
        let boxes: Vec<_> = series.iter().map(|s| stats_box_2d(s, &stats.fields)).collect();
        draw_stats(&mut canvas, stats, &boxes, config.font.stats_size);
    }

    Ok(canvas.finish_svg())
}

struct CellMapper<'a> {
    area: &'a PlotArea,
    x: &'a Axis,
    y: &'a Axis,
    series: &'a Series2d,
}

impl CellMapper<'_> {
    /// Pixel rectangle `(left, top, width, height)` of ROOT cell `(bx, by)`.
    fn rect(&self, bx: usize, by: usize) -> (f64, f64, f64, f64) {
        let s = self.series;
        let a = self.area;
        let x0 = self.x.data_to_pixel(s.x.low_edge(bx), a.left, a.right());
        let x1 = self.x.data_to_pixel(s.x.low_edge(bx + 1), a.left, a.right());
        let y0 = self.y.data_to_pixel(s.y.low_edge(by), a.bottom(), a.top);
        let y1 = self.y.data_to_pixel(s.y.low_edge(by + 1), a.bottom(), a.top);
        (x0, y1, x1 - x0, y0 - y1)
    }

    fn filled_cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let s = self.series;
        (1..=s.y.nbins)
            .flat_map(move |by| (1..=s.x.nbins).map(move |bx| (bx, by, s.cell(bx, by))))
            .filter(|(_, _, v)| *v > 0.0)
    }
}

fn draw_scatter(canvas: &mut SvgCanvas, cells: &CellMapper<'_>, index: usize, z_max: f64) {
    if z_max <= 0.0 {
        return;
    }
    let marker = MarkerAttr::new(MarkerKind::Dot, 1.2, Color::root(cells.series.color));
    for (bx, by, v) in cells.filled_cells() {
        let (left, top, w, h) = cells.rect(bx, by);
        let dots = (v / z_max * SCATTER_MAX_DOTS).ceil() as usize;
        // Dot positions depend only on the cell, so renders are reproducible.
        let mut rng = Lcg::new(((index as u64) << 40) ^ ((bx as u64) << 20) ^ by as u64);
        for _ in 0..dots {
            canvas.marker(left + rng.next_unit() * w, top + rng.next_unit() * h, &marker);
        }
    }
}

fn draw_boxes(canvas: &mut SvgCanvas, cells: &CellMapper<'_>, z_max: f64) {
    if z_max <= 0.0 {
        return;
    }
    let style = BoxAttr::outlined(Color::root(cells.series.color), 1.0);
    for (bx, by, v) in cells.filled_cells() {
        let (left, top, w, h) = cells.rect(bx, by);
        let frac = (v / z_max).clamp(0.0, 1.0);
        let (bw, bh) = (w * frac, h * frac);
        canvas.rect(left + (w - bw) / 2.0, top + (h - bh) / 2.0, bw, bh, &style);
    }
}

fn draw_colz(canvas: &mut SvgCanvas, cells: &CellMapper<'_>, z_max: f64) {
    if z_max <= 0.0 {
        return;
    }
    for (bx, by, v) in cells.filled_cells() {
        let (left, top, w, h) = cells.rect(bx, by);
        canvas.rect(left, top, w, h, &BoxAttr::filled(bird(v / z_max)));
    }
}

fn draw_palette(canvas: &mut SvgCanvas, area: &PlotArea, z_max: f64, config: &RenderConfig) {
    const STEPS: usize = 50;
    let left = area.right() + canvas.width * 0.01;
    let width = canvas.width * PALETTE_WIDTH * 0.5;
    let step_h = area.height / STEPS as f64;
    for i in 0..STEPS {
        let t = (i as f64 + 0.5) / STEPS as f64;
        let top = area.bottom() - (i + 1) as f64 * step_h;
        canvas.rect(left, top, width, step_h + 0.3, &BoxAttr::filled(bird(t)));
    }
    canvas.rect(left, area.top, width, area.height, &BoxAttr::outlined(Color::BLACK, 0.8));

    let z_axis = Axis::exact_linear(0.0, z_max, 5);
    let label_style = TextAttr::sized(config.font.tick_size * 0.9).aligned(TextAlign::LEFT_CENTER);
    let tick = LineAttr::solid(Color::BLACK, 0.8);
    for (pos, label) in z_axis.tick_positions.iter().zip(&z_axis.tick_labels) {
        let py = z_axis.data_to_pixel(*pos, area.bottom(), area.top);
        canvas.line(left + width - 3.0, py, left + width, py, &tick);
        canvas.text(left + width + 3.0, py, label, &label_style);
    }
}

/// Minimal linear congruential generator (Knuth MMIX constants).
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        let mut lcg = Self(seed ^ 0x9E37_79B9_7F4A_7C15);
        lcg.step();
        lcg
    }

    fn step(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0
    }

    fn next_unit(&mut self) -> f64 {
        (self.step() >> 11) as f64 / (1u64 << 53) as f64
    }
}

use crate::color::Color;
use crate::config::RenderConfig;
use crate::layout::axes::Axis;
use crate::layout::legend::draw_legend;
use crate::layout::margins::PlotArea;
use crate::layout::stats::{draw_stats, stats_box_1d};
use crate::plots::draw_lines;
use crate::plots::frame::{draw_frame, draw_title};
use crate::attributes::*;
use crate::scene::{Draw1d, Scene, Series1d};
use crate::svg::SvgCanvas;

// gStyle->GetHistTopMargin()
const TOP_MARGIN: f64 = 0.05;

pub fn render(scene: &Scene, series: &[Series1d], config: &RenderConfig) -> crate::Result<String> {
    let Some(first) = series.first() else {
        return super::render_empty(scene, config);
    };
    let mut canvas = SvgCanvas::new(scene.width, scene.height)?;

    let x_axis = Axis::exact_linear(first.axis.min, first.axis.max, config.axes.target_ticks)
        .with_label(scene.x_label.clone());
    let y_axis = y_axis_for(series, scene.log_y, config).with_label(scene.y_label.clone());

    let area = PlotArea::auto(scene.width, scene.height, Some(&y_axis), 0.0, config);
    draw_frame(&mut canvas, &area, &x_axis, &y_axis, config);
    draw_title(&mut canvas, &area, &scene.title, config);

    canvas.push_clip(area.left, area.top, area.width, area.height);
    for s in series {
        match s.draw {
            Draw1d::Hist => draw_outline(&mut canvas, &area, &x_axis, &y_axis, s),
            Draw1d::Errors => draw_error_points(&mut canvas, &area, &x_axis, &y_axis, s),
        }
    }
    canvas.pop_clip();

    draw_lines(&mut canvas, &area, &x_axis, &y_axis, &scene.lines);

    if let Some(legend) = &scene.legend {
        draw_legend(&mut canvas, legend);
    }
    if let Some(stats) = &scene.stats
        && !stats.fields.is_empty()
    {
        let boxes: Vec<_> = series.iter().map(|s| stats_box_1d(s, &stats.fields)).collect();
        draw_stats(&mut canvas, stats, &boxes, config.font.stats_size);
    }

    Ok(canvas.finish_svg())
}

/// Vertical range over every overlaid series, ROOT style.
fn y_axis_for(series: &[Series1d], log: bool, config: &RenderConfig) -> Axis {
    let with_errors = |s: &Series1d, i: usize, v: f64| match s.draw {
        Draw1d::Errors => v + s.bin_error(i + 1),
        Draw1d::Hist => v,
    };
    let max = series
        .iter()
        .flat_map(|s| s.bins().iter().enumerate().map(move |(i, &v)| with_errors(s, i, v)))
        .fold(f64::NEG_INFINITY, f64::max);
    let min = series.iter().flat_map(|s| s.bins().iter().copied()).fold(f64::INFINITY, f64::min);

    if log {
        let min_pos = series
            .iter()
            .flat_map(|s| s.bins().iter().copied())
            .filter(|v| *v > 0.0)
            .fold(f64::INFINITY, f64::min);
        if !min_pos.is_finite() {
            log::debug!("no positive bin content, log axis defaults to [0.1, 1]");
            return Axis::auto_log(0.1, 1.0);
        }
        return Axis::auto_log(min_pos * 0.5, max * 2.0);
    }

    if !max.is_finite() || max <= 0.0 {
        let lo = if min.is_finite() && min < 0.0 { min * (1.0 + TOP_MARGIN) } else { 0.0 };
        return Axis::exact_linear(lo, 1.0, config.axes.target_ticks);
    }
    let lo = if min < 0.0 { min * (1.0 + TOP_MARGIN) } else { 0.0 };
    Axis::exact_linear(lo, max * (1.0 + TOP_MARGIN), config.axes.target_ticks)
}

fn draw_outline(canvas: &mut SvgCanvas, area: &PlotArea, x: &Axis, y: &Axis, s: &Series1d) {
    let base_value = if y.log { y.min } else { y.min.max(0.0) };
    let base = y.data_to_pixel(base_value, area.bottom(), area.top);
    let to_py = |v: f64| {
        if y.log && v <= 0.0 { area.bottom() } else { y.data_to_pixel(v, area.bottom(), area.top) }
    };

    let n = s.axis.nbins;
    let mut points = Vec::with_capacity(2 * n + 2);
    points.push((x.data_to_pixel(s.axis.low_edge(1), area.left, area.right()), base));
    for (i, &v) in s.bins().iter().enumerate() {
        let bin = i + 1;
        let lo = x.data_to_pixel(s.axis.low_edge(bin), area.left, area.right());
        let hi = x.data_to_pixel(s.axis.low_edge(bin + 1), area.left, area.right());
        let py = to_py(v);
        points.push((lo, py));
        points.push((hi, py));
    }
    points.push((x.data_to_pixel(s.axis.max, area.left, area.right()), base));

    canvas.polyline(&points, &LineAttr::solid(Color::root(s.color), s.line_width));
}

fn draw_error_points(canvas: &mut SvgCanvas, area: &PlotArea, x: &Axis, y: &Axis, s: &Series1d) {
    let color = Color::root(s.color);
    let bar = LineAttr::solid(color, s.line_width.max(1.0));
    let marker = MarkerAttr::new(MarkerKind::FullCircle, 2.5, color);
    for (i, &v) in s.bins().iter().enumerate() {
        let bin = i + 1;
        if v == 0.0 && s.bin_error(bin) == 0.0 {
            continue;
        }
        let cx = x.data_to_pixel(s.axis.low_edge(bin) + s.axis.bin_width() / 2.0, area.left, area.right());
        let err = s.bin_error(bin);
        let lo = if y.log { (v - err).max(y.min) } else { v - err };
        let py_lo = y.data_to_pixel(lo, area.bottom(), area.top);
        let py_hi = y.data_to_pixel(v + err, area.bottom(), area.top);
        canvas.error_bar(cx, py_lo, py_hi, &bar);
        if !(y.log && v <= 0.0) {
            canvas.marker(cx, y.data_to_pixel(v, area.bottom(), area.top), &marker);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{BinAxis, LegendEntrySpec, LegendSpec, LineSpec, SceneBody, StatFields, StatsSpec};

    fn series(name: &str, color: u16, bins: &[f64]) -> Series1d {
        let mut contents = vec![0.0];
        contents.extend_from_slice(bins);
        contents.push(0.0);
        Series1d {
            name: name.into(),
            title: "pmu".into(),
            axis: BinAxis { nbins: bins.len(), min: 0.0, max: bins.len() as f64 },
            errors: contents.iter().map(|v: &f64| v.sqrt()).collect(),
            contents,
            entries: bins.iter().sum::<f64>() as u64,
            mean: 1.0,
            std_dev: 0.5,
            color,
            line_width: 2.0,
            draw: Draw1d::Hist,
        }
    }

    fn scene(series: Vec<Series1d>) -> Scene {
        let mut scene = Scene::new("c1", 700.0, 500.0);
        scene.title = "pmu".into();
        scene.x_label = "p_{#mu} [MeV/c]".into();
        scene.y_label = "events".into();
        scene.body = SceneBody::Hist1d(series);
        scene
    }

    #[test]
    fn overlay_draws_both_outlines() {
        let a = series("h1", 2, &[1.0, 4.0, 2.0]);
        let b = series("h2", 4, &[3.0, 1.0, 0.0]);
        let sc = scene(vec![a.clone(), b.clone()]);
        let svg = render(&sc, &[a, b], &RenderConfig::default()).unwrap();
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains(r##"stroke="#ff0000""##));
        assert!(svg.contains(r##"stroke="#0000ff""##));
    }

    #[test]
    fn y_range_covers_tallest_series() {
        let a = series("h1", 2, &[1.0, 4.0]);
        let b = series("h2", 4, &[10.0, 1.0]);
        let ax = y_axis_for(&[a, b], false, &RenderConfig::default());
        assert_eq!(ax.min, 0.0);
        assert!(ax.max >= 10.0);
    }

    #[test]
    fn log_range_uses_positive_bins() {
        let a = series("h1", 2, &[0.0, 3.0, 300.0]);
        let ax = y_axis_for(&[a], true, &RenderConfig::default());
        assert!(ax.log);
        assert!(ax.min <= 1.5);
        assert!(ax.max >= 600.0);
    }

    #[test]
    fn decorations_rendered() {
        let a = series("h1", 2, &[1.0, 4.0, 2.0]);
        let mut sc = scene(vec![a.clone()]);
        sc.legend = Some(LegendSpec {
            x1: 0.70,
            y1: 0.32,
            x2: 0.94,
            y2: 0.53,
            header: None,
            entries: vec![LegendEntrySpec {
                object: Some("h1".into()),
                label: "PDK MC".into(),
                color: 2,
                line_width: 2.0,
                option: "L".into(),
            }],
            border_size: 0,
            fill_color: None,
            text_font: 42,
            text_size: 0.035,
        });
        sc.lines.push(LineSpec { x1: 1.5, y1: 0.0, x2: 1.5, y2: 3.0, color: 1, width: 2.0, style: 1 });
        sc.stats = Some(StatsSpec {
            fields: StatFields { entries: true, mean: true, rms: true, ..Default::default() },
            x1: 0.72,
            x2: 0.92,
            y1: 0.80,
            y2: 0.92,
        });
        let svg = render(&sc, &[a], &RenderConfig::default()).unwrap();
        assert!(svg.contains(">PDK MC</text>"));
        assert!(svg.contains(">Entries</text>"));
        assert!(svg.contains(">Std Dev</text>"));
    }
}

//! Drawing helpers: fill histograms from datasets and compose them on a canvas.
//!
//! Every helper leaves the canvas in linear y-scale when it returns, whether
//! it succeeded or not.

use std::path::PathBuf;

use tp_render::scene::Scene;
use tp_render::{Draw1d, Draw2d, LineSpec, SceneBody, Series1d, Series2d};
use tp_tree::{
    AxisSpec, Dataset, Hist1D, Hist2D, count_entries, project, project_2d, select_values,
    select_values_2d, split_2d,
};

use crate::canvas::Canvas;
use crate::decor::{LineAnnotation, SeriesStyle, get_legend};
use crate::error::Result;
use crate::histogram::{make_histogram, make_histogram_2d, normalize, series_1d, series_2d};
use crate::save::save_siblings;
use crate::style::{DisplayStyle, set_stats_box};

/// Bins of an automatically binned 1D draw.
pub const AUTO_BINS_1D: usize = 100;
/// Bins per axis of an automatically binned 2D draw.
pub const AUTO_BINS_2D: usize = 40;
/// Line width of histogram outlines.
const LINE_WIDTH: f64 = 2.0;
/// Name of an automatically binned histogram.
const TEMP_NAME: &str = "htemp";

// ── Draw options ────────────────────────────────────────────────

/// The parts of a ROOT draw option string the helpers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct DrawOptions {
    same: bool,
    goff: bool,
    errors: bool,
    style_2d: Draw2d,
}

impl DrawOptions {
    fn parse(option: &str) -> Self {
        let opt = option.to_lowercase();
        let mut rest = opt.clone();
        for keyword in ["sames", "same", "goff", "colz", "col", "box", "hist"] {
            rest = rest.replace(keyword, "");
        }
        Self {
            same: opt.contains("same"),
            goff: opt.contains("goff"),
            errors: rest.contains('e') && !opt.contains("hist"),
            style_2d: Draw2d::from_option(&opt),
        }
    }

    fn draw_1d(&self) -> Draw1d {
        if self.errors { Draw1d::Errors } else { Draw1d::Hist }
    }
}

/// Clear `scene` for a fresh drawing titled and labeled as given.
fn start_scene(scene: &mut Scene, title: &str, x_label: &str, y_label: &str) {
    scene.clear();
    scene.title = title.to_string();
    scene.x_label = x_label.to_string();
    scene.y_label = y_label.to_string();
}

/// Put `series` on the canvas, on top of what is there when `same` is set and
/// the current drawing is 1D.
fn place_1d(canvas: &mut Canvas, same: bool, series: Series1d, labels: [&str; 3]) {
    let scene = canvas.scene_mut();
    if same && let SceneBody::Hist1d(existing) = &mut scene.body {
        existing.push(series);
        return;
    }
    start_scene(scene, labels[0], labels[1], labels[2]);
    scene.body = SceneBody::Hist1d(vec![series]);
}

fn place_2d(canvas: &mut Canvas, same: bool, series: Series2d, labels: [&str; 3]) {
    let scene = canvas.scene_mut();
    if same && let SceneBody::Hist2d(existing) = &mut scene.body {
        existing.push(series);
        return;
    }
    start_scene(scene, labels[0], labels[1], labels[2]);
    scene.body = SceneBody::Hist2d(vec![series]);
}

// ── Raw variable ────────────────────────────────────────────────

/// Draw a raw expression with automatic binning and return the number of
/// selected rows.
///
/// A `y:x` variable makes a 2D scatter; an empty variable only counts. Option
/// `goff` fills without drawing, `same` draws over the current plot.
pub fn draw_variable(
    canvas: &mut Canvas,
    style: &DisplayStyle,
    dataset: &Dataset,
    variable: &str,
    selection: &str,
    option: &str,
    log: bool,
) -> Result<f64> {
    if variable.trim().is_empty() {
        return Ok(count_entries(dataset, selection)? as f64);
    }
    let opts = DrawOptions::parse(option);
    let title = if selection.trim().is_empty() {
        variable.to_string()
    } else {
        format!("{variable} {{{selection}}}")
    };

    canvas.with_log_scale(log, |canvas| {
        let selected = if let Some((y_var, x_var)) = split_2d(variable) {
            let sel = select_values_2d(dataset, variable, selection)?;
            let x = AxisSpec::covering(AUTO_BINS_2D, &sel.x)?.with_label(x_var.trim());
            let y = AxisSpec::covering(AUTO_BINS_2D, &sel.y)?.with_label(y_var.trim());
            let mut h = Hist2D::new(TEMP_NAME, title.as_str(), x, y);
            for ((&x, &y), &w) in sel.x.iter().zip(&sel.y).zip(&sel.weights) {
                h.fill(x, y, w);
            }
            if !opts.goff {
                let series = series_2d(&h, 1, opts.style_2d);
                place_2d(canvas, opts.same, series, [title.as_str(), x_var.trim(), y_var.trim()]);
            }
            sel.x.len()
        } else {
            let sel = select_values(dataset, variable, selection)?;
            let x = AxisSpec::covering(AUTO_BINS_1D, &sel.values)?.with_label(variable);
            let mut h = Hist1D::new(TEMP_NAME, title.as_str(), x);
            for (&v, &w) in sel.values.iter().zip(&sel.weights) {
                h.fill(v, w);
            }
            if !opts.goff {
                let series = series_1d(&h, 1, 1.0, opts.draw_1d());
                place_1d(canvas, opts.same, series, [title.as_str(), variable, ""]);
            }
            sel.values.len()
        };

        if !opts.goff {
            canvas.scene_mut().stats = style.stats_spec();
            canvas.display()?;
        }
        Ok(selected as f64)
    })
}

// ── Single sample ───────────────────────────────────────────────

/// One histogram of `variable` under `selection`.
#[derive(Debug, Clone)]
pub struct HistogramRequest {
    pub variable: String,
    pub selection: String,
    /// ROOT draw option (`e`, `same`, `goff`, ...).
    pub option: String,
    pub nbins: usize,
    pub xmin: f64,
    pub xmax: f64,
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    /// ROOT color index of the line.
    pub color: u16,
    pub log: bool,
    pub normalize: bool,
    pub stats: bool,
    /// Legend label; an empty list draws no legend.
    pub legend: Vec<String>,
    /// Base path of the `.png`/`.jpg`/`.C` files to write.
    pub save: Option<PathBuf>,
}

impl Default for HistogramRequest {
    fn default() -> Self {
        Self {
            variable: String::new(),
            selection: String::new(),
            option: String::new(),
            nbins: 100,
            xmin: 0.0,
            xmax: 100.0,
            title: String::new(),
            xlabel: String::new(),
            ylabel: String::new(),
            color: 1,
            log: false,
            normalize: false,
            stats: true,
            legend: Vec::new(),
            save: None,
        }
    }
}

impl HistogramRequest {
    pub fn new(variable: impl Into<String>, selection: impl Into<String>) -> Self {
        Self { variable: variable.into(), selection: selection.into(), ..Default::default() }
    }
}

/// Fill `h1` from `dataset` and draw it.
pub fn draw_histogram(
    canvas: &mut Canvas,
    style: &mut DisplayStyle,
    dataset: &Dataset,
    req: &HistogramRequest,
) -> Result<()> {
    set_stats_box(style, req.stats);
    let style = &*style;
    let opts = DrawOptions::parse(&req.option);
    let mut h1 = make_histogram("h1", req.nbins, req.xmin, req.xmax, &req.title, &req.xlabel, &req.ylabel)?;

    canvas.with_log_scale(req.log, |canvas| {
        project(dataset, &mut h1, &req.variable, &req.selection)?;
        if req.normalize {
            normalize(&mut h1)?;
        }
        if !opts.goff {
            let series = series_1d(&h1, req.color, LINE_WIDTH, opts.draw_1d());
            let legend = (!req.legend.is_empty())
                .then(|| get_legend(style, &[SeriesStyle::from(&series)], &req.legend, None));
            place_1d(canvas, opts.same, series, [req.title.as_str(), req.xlabel.as_str(), req.ylabel.as_str()]);
            let scene = canvas.scene_mut();
            scene.stats = style.stats_spec();
            if legend.is_some() {
                scene.legend = legend;
            }
            canvas.display()?;
        }
        if let Some(path) = &req.save {
            save_siblings(canvas, path)?;
        }
        Ok(())
    })
}

// ── Two samples ─────────────────────────────────────────────────

/// `variable_a` from one dataset against `variable_b` from another, same binning.
#[derive(Debug, Clone)]
pub struct OverlayRequest {
    pub variable_a: String,
    /// Defaults to `variable_a`.
    pub variable_b: Option<String>,
    pub selection_a: String,
    pub selection_b: String,
    pub nbins: usize,
    pub xmin: f64,
    pub xmax: f64,
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub color_a: u16,
    pub color_b: u16,
    pub log: bool,
    pub normalize: bool,
    pub show: bool,
    pub stats: bool,
    /// Labels of `h1` then `h2`; empty draws no legend.
    pub legend: Vec<String>,
    pub lines: Vec<LineAnnotation>,
    pub save: Option<PathBuf>,
}

impl Default for OverlayRequest {
    fn default() -> Self {
        Self {
            variable_a: String::new(),
            variable_b: None,
            selection_a: String::new(),
            selection_b: String::new(),
            nbins: 100,
            xmin: 0.0,
            xmax: 100.0,
            title: String::new(),
            xlabel: String::new(),
            ylabel: String::new(),
            color_a: 2,
            color_b: 4,
            log: false,
            normalize: false,
            show: true,
            stats: true,
            legend: Vec::new(),
            lines: Vec::new(),
            save: None,
        }
    }
}

impl OverlayRequest {
    pub fn new(variable: impl Into<String>) -> Self {
        Self { variable_a: variable.into(), ..Default::default() }
    }

    /// Variable filled into `h2`.
    pub fn second_variable(&self) -> &str {
        self.variable_b
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(&self.variable_a)
    }
}

/// Fill `h1` from `dataset_a` and `h2` from `dataset_b` and draw `h2` over `h1`.
pub fn draw_two_histograms(
    canvas: &mut Canvas,
    style: &mut DisplayStyle,
    dataset_a: &Dataset,
    dataset_b: &Dataset,
    req: &OverlayRequest,
) -> Result<()> {
    set_stats_box(style, req.stats);
    let style = &*style;
    let mut h1 = make_histogram("h1", req.nbins, req.xmin, req.xmax, &req.title, &req.xlabel, &req.ylabel)?;
    let mut h2 = make_histogram("h2", req.nbins, req.xmin, req.xmax, "", "", "")?;

    canvas.with_log_scale(req.log, |canvas| {
        project(dataset_a, &mut h1, &req.variable_a, &req.selection_a)?;
        project(dataset_b, &mut h2, req.second_variable(), &req.selection_b)?;
        if req.normalize {
            normalize(&mut h1)?;
            normalize(&mut h2)?;
        }

        let series = vec![
            series_1d(&h1, req.color_a, LINE_WIDTH, Draw1d::Hist),
            series_1d(&h2, req.color_b, LINE_WIDTH, Draw1d::Hist),
        ];
        let styles: Vec<SeriesStyle> = series.iter().map(SeriesStyle::from).collect();

        let scene = canvas.scene_mut();
        start_scene(scene, &req.title, &req.xlabel, &req.ylabel);
        scene.body = SceneBody::Hist1d(series);
        scene.stats = style.stats_spec();
        if !req.legend.is_empty() {
            scene.legend = Some(get_legend(style, &styles, &req.legend, None));
        }
        scene.lines = req.lines.iter().map(LineSpec::from).collect();

        if req.show {
            canvas.display()?;
        }
        if let Some(path) = &req.save {
            save_siblings(canvas, path)?;
        }
        Ok(())
    })
}

// ── 2D ──────────────────────────────────────────────────────────

/// One `y:x` histogram.
#[derive(Debug, Clone)]
pub struct Histogram2dRequest {
    pub variable: String,
    pub selection: String,
    /// ROOT draw option: empty for scatter, `box`, `colz`.
    pub option: String,
    pub nbins_x: usize,
    pub xmin: f64,
    pub xmax: f64,
    pub nbins_y: usize,
    pub ymin: f64,
    pub ymax: f64,
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    /// ROOT marker color index.
    pub color: u16,
    pub log: bool,
    pub save: Option<PathBuf>,
}

impl Default for Histogram2dRequest {
    fn default() -> Self {
        Self {
            variable: String::new(),
            selection: String::new(),
            option: String::new(),
            nbins_x: 100,
            xmin: 0.0,
            xmax: 100.0,
            nbins_y: 100,
            ymin: 0.0,
            ymax: 100.0,
            title: String::new(),
            xlabel: String::new(),
            ylabel: String::new(),
            color: 1,
            log: false,
            save: None,
        }
    }
}

impl Histogram2dRequest {
    pub fn new(variable: impl Into<String>, selection: impl Into<String>) -> Self {
        Self { variable: variable.into(), selection: selection.into(), ..Default::default() }
    }
}

/// Fill a 2D `h1` from `dataset` and draw it.
pub fn draw_histogram_2d(
    canvas: &mut Canvas,
    style: &DisplayStyle,
    dataset: &Dataset,
    req: &Histogram2dRequest,
) -> Result<()> {
    let opts = DrawOptions::parse(&req.option);
    let mut h1 = make_histogram_2d(
        "h1", req.nbins_x, req.xmin, req.xmax, req.nbins_y, req.ymin, req.ymax, &req.title,
        &req.xlabel, &req.ylabel,
    )?;

    canvas.with_log_scale(req.log, |canvas| {
        project_2d(dataset, &mut h1, &req.variable, &req.selection)?;
        if !opts.goff {
            let series = series_2d(&h1, req.color, opts.style_2d);
            place_2d(canvas, opts.same, series, [req.title.as_str(), req.xlabel.as_str(), req.ylabel.as_str()]);
            canvas.scene_mut().stats = style.stats_spec();
            canvas.display()?;
        }
        if let Some(path) = &req.save {
            save_siblings(canvas, path)?;
        }
        Ok(())
    })
}

/// Two `y:x` histograms with identical binning, the second drawn over the first.
#[derive(Debug, Clone)]
pub struct Overlay2dRequest {
    pub variable_a: String,
    /// Defaults to `variable_a`.
    pub variable_b: Option<String>,
    pub selection_a: String,
    pub selection_b: String,
    /// ROOT draw option applied to both: empty for scatter, `box`, `colz`.
    pub option: String,
    pub nbins_x: usize,
    pub xmin: f64,
    pub xmax: f64,
    pub nbins_y: usize,
    pub ymin: f64,
    pub ymax: f64,
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub color_a: u16,
    pub color_b: u16,
    pub log: bool,
    pub save: Option<PathBuf>,
}

impl Default for Overlay2dRequest {
    fn default() -> Self {
        Self {
            variable_a: String::new(),
            variable_b: None,
            selection_a: String::new(),
            selection_b: String::new(),
            option: String::new(),
            nbins_x: 100,
            xmin: 0.0,
            xmax: 100.0,
            nbins_y: 100,
            ymin: 0.0,
            ymax: 100.0,
            title: String::new(),
            xlabel: String::new(),
            ylabel: String::new(),
            color_a: 2,
            color_b: 4,
            log: false,
            save: None,
        }
    }
}

impl Overlay2dRequest {
    pub fn new(variable: impl Into<String>) -> Self {
        Self { variable_a: variable.into(), ..Default::default() }
    }

    pub fn second_variable(&self) -> &str {
        self.variable_b
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(&self.variable_a)
    }
}

/// Fill 2D `h1` from `dataset_a` and `h2` from `dataset_b` and overlay them.
pub fn draw_two_histograms_2d(
    canvas: &mut Canvas,
    style: &DisplayStyle,
    dataset_a: &Dataset,
    dataset_b: &Dataset,
    req: &Overlay2dRequest,
) -> Result<()> {
    let draw = Draw2d::from_option(&req.option);
    let hist = |name: &str| {
        make_histogram_2d(
            name, req.nbins_x, req.xmin, req.xmax, req.nbins_y, req.ymin, req.ymax, &req.title,
            &req.xlabel, &req.ylabel,
        )
    };
    let mut h1 = hist("h1")?;
    let mut h2 = hist("h2")?;

    canvas.with_log_scale(req.log, |canvas| {
        project_2d(dataset_a, &mut h1, &req.variable_a, &req.selection_a)?;
        project_2d(dataset_b, &mut h2, req.second_variable(), &req.selection_b)?;

        let scene = canvas.scene_mut();
        start_scene(scene, &req.title, &req.xlabel, &req.ylabel);
        scene.body =
            SceneBody::Hist2d(vec![series_2d(&h1, req.color_a, draw), series_2d(&h2, req.color_b, draw)]);
        scene.stats = style.stats_spec();
        canvas.display()?;

        if let Some(path) = &req.save {
            save_siblings(canvas, path)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decor::make_line;
    use crate::error::PlotError;
    use approx::assert_relative_eq;
    use tp_tree::TreeError;

    fn events() -> Dataset {
        Dataset::from_columns(
            "h1",
            [
                ("pmu", vec![10.0, 20.0, 20.0, 35.0, 80.0, 150.0]),
                ("wallv", vec![50.0, 250.0, 300.0, 400.0, 500.0, 600.0]),
                ("MuGamma", vec![0.0, 1.0, 1.0, 0.0, 1.0, 0.0]),
            ],
        )
        .unwrap()
    }

    fn first_series(canvas: &Canvas) -> &Series1d {
        match &canvas.scene().body {
            SceneBody::Hist1d(s) => &s[0],
            other => panic!("expected a 1D scene, got {other:?}"),
        }
    }

    #[test]
    fn options() {
        let o = DrawOptions::parse("e same");
        assert!(o.same && o.errors && !o.goff);
        assert!(!DrawOptions::parse("sames").errors);
        assert!(!DrawOptions::parse("HIST").errors);
        assert!(DrawOptions::parse("goff").goff);
        assert_eq!(DrawOptions::parse("colz").style_2d, Draw2d::Colz);
        assert_eq!(DrawOptions::parse("").draw_1d(), Draw1d::Hist);
    }

    #[test]
    fn draw_variable_counts_and_draws() {
        let mut canvas = Canvas::new("c1");
        let n = draw_variable(&mut canvas, &DisplayStyle::default(), &events(), "pmu", "wallv > 200", "", true)
            .unwrap();
        assert_eq!(n, 5.0);
        assert!(!canvas.log_y());
        let s = first_series(&canvas);
        assert_eq!(s.name, "htemp");
        assert_eq!(s.axis.nbins, AUTO_BINS_1D);
        assert_eq!(s.entries, 5);
        assert_eq!(canvas.scene().title, "pmu {wallv > 200}");
        assert!(canvas.displayed_svg().is_some());
    }

    #[test]
    fn draw_variable_empty_only_counts() {
        let mut canvas = Canvas::new("c1");
        let n = draw_variable(&mut canvas, &DisplayStyle::default(), &events(), "", "MuGamma", "", false)
            .unwrap();
        assert_eq!(n, 3.0);
        assert!(matches!(canvas.scene().body, SceneBody::Empty));
        assert!(canvas.displayed_svg().is_none());
    }

    #[test]
    fn draw_variable_goff_and_2d() {
        let mut canvas = Canvas::new("c1");
        let style = DisplayStyle::default();
        let n = draw_variable(&mut canvas, &style, &events(), "pmu", "", "goff", false).unwrap();
        assert_eq!(n, 6.0);
        assert!(canvas.displayed_svg().is_none());

        draw_variable(&mut canvas, &style, &events(), "pmu:wallv", "", "", false).unwrap();
        match &canvas.scene().body {
            SceneBody::Hist2d(s) => {
                assert_eq!(s[0].x.nbins, AUTO_BINS_2D);
                assert_relative_eq!(s[0].x.min, 50.0);
                assert_relative_eq!(s[0].y.min, 10.0);
            }
            other => panic!("expected a 2D scene, got {other:?}"),
        }
        assert_eq!(canvas.scene().x_label, "wallv");
        assert_eq!(canvas.scene().y_label, "pmu");
    }

    #[test]
    fn draw_variable_same_overlays() {
        let mut canvas = Canvas::new("c1");
        let style = DisplayStyle::default();
        draw_variable(&mut canvas, &style, &events(), "pmu", "", "", false).unwrap();
        draw_variable(&mut canvas, &style, &events(), "pmu", "MuGamma", "same", false).unwrap();
        match &canvas.scene().body {
            SceneBody::Hist1d(s) => assert_eq!(s.len(), 2),
            other => panic!("expected a 1D scene, got {other:?}"),
        }
        assert_eq!(canvas.scene().title, "pmu");
    }

    #[test]
    fn draw_histogram_styles_h1() {
        let mut canvas = Canvas::new("c1");
        let mut style = DisplayStyle::default();
        let req = HistogramRequest {
            nbins: 20,
            xmin: 0.0,
            xmax: 200.0,
            color: 4,
            legend: vec!["PDK".into()],
            title: "Muon momentum".into(),
            ..HistogramRequest::new("pmu", "wallv > 200")
        };
        draw_histogram(&mut canvas, &mut style, &events(), &req).unwrap();

        let s = first_series(&canvas);
        assert_eq!(s.name, "h1");
        assert_eq!((s.color, s.line_width), (4, 2.0));
        assert_relative_eq!(s.integral(), 5.0);
        let scene = canvas.scene();
        assert_eq!(scene.title, "Muon momentum");
        assert_eq!(scene.legend.as_ref().unwrap().entries.len(), 1);
        assert_eq!(scene.stats.unwrap().x2, 0.92);
        assert_eq!(style.stat_options.to_letters(), "emr");
    }

    #[test]
    fn draw_histogram_without_stats() {
        let mut canvas = Canvas::new("c1");
        let mut style = DisplayStyle::default();
        let req = HistogramRequest { stats: false, ..HistogramRequest::new("pmu", "") };
        draw_histogram(&mut canvas, &mut style, &events(), &req).unwrap();
        assert!(canvas.scene().stats.is_none());
    }

    #[test]
    fn normalize_empty_restores_linear_scale() {
        let mut canvas = Canvas::new("c1");
        let mut style = DisplayStyle::default();
        let req = HistogramRequest {
            log: true,
            normalize: true,
            ..HistogramRequest::new("pmu", "wallv > 10000")
        };
        let err = draw_histogram(&mut canvas, &mut style, &events(), &req).unwrap_err();
        assert!(matches!(err, PlotError::EmptyIntegral { ref name } if name == "h1"));
        assert!(!canvas.log_y());
    }

    #[test]
    fn unknown_column_propagates() {
        let mut canvas = Canvas::new("c1");
        let mut style = DisplayStyle::default();
        let req = HistogramRequest { log: true, ..HistogramRequest::new("nope", "") };
        let err = draw_histogram(&mut canvas, &mut style, &events(), &req).unwrap_err();
        assert!(matches!(err, PlotError::Tree(TreeError::ColumnNotFound(_))));
        assert!(!canvas.log_y());
    }

    #[test]
    fn overlay_defaults_second_variable() {
        let mut canvas = Canvas::new("c1");
        let mut style = DisplayStyle::default();
        let req = OverlayRequest {
            selection_a: "MuGamma".into(),
            selection_b: "!MuGamma".into(),
            nbins: 16,
            xmin: 0.0,
            xmax: 160.0,
            legend: vec!["signal".into(), "background".into()],
            lines: vec![make_line(30.0, 0.0, 30.0, 2.0)],
            ..OverlayRequest::new("pmu")
        };
        assert_eq!(req.second_variable(), "pmu");
        draw_two_histograms(&mut canvas, &mut style, &events(), &events(), &req).unwrap();

        let SceneBody::Hist1d(series) = &canvas.scene().body else {
            panic!("expected a 1D scene");
        };
        assert_eq!(series[0].name, "h1");
        assert_eq!(series[1].name, "h2");
        assert_eq!((series[0].color, series[1].color), (2, 4));
        assert_relative_eq!(series[0].integral(), 3.0);
        assert_relative_eq!(series[1].integral(), 3.0);
        assert_eq!(series[1].title, "");
        let scene = canvas.scene();
        assert_eq!(scene.legend.as_ref().unwrap().entries.len(), 2);
        assert_eq!(scene.lines.len(), 1);
    }

    #[test]
    fn overlay_normalizes_each() {
        let mut canvas = Canvas::new("c1");
        let mut style = DisplayStyle::default();
        let req = OverlayRequest {
            variable_b: Some("pmu * 0.5".into()),
            normalize: true,
            log: true,
            show: false,
            nbins: 10,
            xmin: 0.0,
            xmax: 200.0,
            ..OverlayRequest::new("pmu")
        };
        draw_two_histograms(&mut canvas, &mut style, &events(), &events(), &req).unwrap();
        assert!(!canvas.log_y());
        assert!(canvas.displayed_svg().is_none());
        let SceneBody::Hist1d(series) = &canvas.scene().body else {
            panic!("expected a 1D scene");
        };
        for s in series {
            assert_relative_eq!(s.integral(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn two_dimensional_overlay() {
        let mut canvas = Canvas::new("c1");
        let req = Overlay2dRequest {
            selection_a: "MuGamma".into(),
            selection_b: "!MuGamma".into(),
            nbins_x: 10,
            xmin: 0.0,
            xmax: 1000.0,
            nbins_y: 10,
            ymin: 0.0,
            ymax: 200.0,
            option: "box".into(),
            log: true,
            ..Overlay2dRequest::new("pmu:wallv")
        };
        draw_two_histograms_2d(&mut canvas, &DisplayStyle::default(), &events(), &events(), &req).unwrap();
        assert!(!canvas.log_y());
        let SceneBody::Hist2d(series) = &canvas.scene().body else {
            panic!("expected a 2D scene");
        };
        assert_eq!(series.len(), 2);
        assert_eq!((series[0].color, series[1].color), (2, 4));
        assert_eq!(series[0].draw, Draw2d::Box);
        assert_eq!(series[0].entries + series[1].entries, 6);
    }

    #[test]
    fn single_2d_marker_color() {
        let mut canvas = Canvas::new("c1");
        let req = Histogram2dRequest {
            color: 3,
            xmax: 1000.0,
            ymax: 200.0,
            ..Histogram2dRequest::new("pmu:wallv", "wallv > 200")
        };
        draw_histogram_2d(&mut canvas, &DisplayStyle::default(), &events(), &req).unwrap();
        let SceneBody::Hist2d(series) = &canvas.scene().body else {
            panic!("expected a 2D scene");
        };
        assert_eq!(series[0].name, "h1");
        assert_eq!(series[0].color, 3);
        assert_eq!(series[0].entries, 5);
    }
}

//! # tp-plot
//!
//! Plot helpers for event trees: count entries under a cut, draw one or two
//! samples as 1D or 2D histograms with stats boxes, legends and lines, save
//! the canvas as `.png`, `.jpg` and `.C`, and print efficiency and rejection
//! ratios.
//!
//! ```no_run
//! use tp_plot::{Canvas, DisplayStyle, OverlayRequest, draw_two_histograms, open_chained_dataset};
//! use std::path::Path;
//!
//! let base = Path::new("files");
//! let pdk = open_chained_dataset(base, "pdk/pdk_100k.parquet", None, "h1", "treePDK").unwrap();
//! let atm = open_chained_dataset(base, "atm/atm.parquet", None, "h1", "treeATM").unwrap();
//!
//! let mut canvas = Canvas::new("c1");
//! let mut style = DisplayStyle::default();
//! let req = OverlayRequest {
//!     selection_a: "wallv > 200 && MuGamma".into(),
//!     selection_b: "wallv > 200".into(),
//!     nbins: 50,
//!     xmax: 500.0,
//!     normalize: true,
//!     legend: vec!["PDK".into(), "atm #nu".into()],
//!     save: Some("plots/pmu".into()),
//!     ..OverlayRequest::new("pmu")
//! };
//! draw_two_histograms(&mut canvas, &mut style, &pdk, &atm, &req).unwrap();
//! ```

#![warn(clippy::all)]

pub mod canvas;
pub mod decor;
pub mod draw;
pub mod error;
pub mod histogram;
pub mod report;
pub mod save;
pub mod style;

pub use canvas::Canvas;
pub use decor::{LineAnnotation, SeriesStyle, get_legend, make_line};
pub use draw::{
    HistogramRequest, Histogram2dRequest, Overlay2dRequest, OverlayRequest, draw_histogram,
    draw_histogram_2d, draw_two_histograms, draw_two_histograms_2d, draw_variable,
};
pub use error::{PlotError, Result};
pub use histogram::{make_histogram, make_histogram_2d, normalize};
pub use report::{
    EfficiencyReport, RejectionReport, ReportConfig, report_efficiency, report_rejection,
};
pub use save::{save, save_siblings};
pub use style::{DisplayStyle, LegendStyle, StatOptions, draw_box, set_stats_box};
pub use tp_render::config::RenderConfig;
pub use tp_tree::{Dataset, count_entries, open_chained_dataset, split_2d};

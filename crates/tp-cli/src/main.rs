//! treeplot CLI

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tp_plot::{
    Canvas, Dataset, Histogram2dRequest, HistogramRequest, LineAnnotation, Overlay2dRequest,
    OverlayRequest, count_entries, draw_histogram, draw_histogram_2d, draw_two_histograms,
    draw_two_histograms_2d, make_line, open_chained_dataset, report_efficiency, report_rejection,
    split_2d,
};

use crate::config::{Settings, load_settings};

#[derive(Parser)]
#[command(name = "treeplot")]
#[command(about = "treeplot - counts, efficiencies and histograms from event trees")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    /// YAML with `style`, `report` and `render` sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Where a tree lives.
#[derive(Args, Debug, Clone)]
struct TreeArgs {
    /// Directory the file paths are relative to
    #[arg(long, default_value = ".")]
    base: PathBuf,

    /// Primary tree file (Parquet)
    #[arg(long)]
    file: String,

    /// Primary tree name
    #[arg(long, default_value = "h1")]
    tree: String,

    /// Friend tree file, row-aligned with the primary
    #[arg(long)]
    friend_file: Option<String>,

    /// Friend tree name
    #[arg(long, default_value = "treePDK")]
    friend_tree: String,
}

impl TreeArgs {
    fn open(&self) -> Result<Dataset> {
        open_chained_dataset(
            &self.base,
            &self.file,
            self.friend_file.as_deref(),
            &self.tree,
            &self.friend_tree,
        )
        .with_context(|| format!("failed to open tree '{}' from {}", self.tree, self.file))
    }
}

/// Binning, labels and scale of a drawn histogram.
#[derive(Args, Debug, Clone)]
struct PlotArgs {
    #[arg(long, default_value = "100")]
    nbins: usize,
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    xmin: f64,
    #[arg(long, default_value = "100", allow_hyphen_values = true)]
    xmax: f64,

    /// Y bins, for `y:x` variables
    #[arg(long, default_value = "100")]
    nbins_y: usize,
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    ymin: f64,
    #[arg(long, default_value = "100", allow_hyphen_values = true)]
    ymax: f64,

    #[arg(long, default_value = "")]
    title: String,
    #[arg(long, default_value = "")]
    xlabel: String,
    #[arg(long, default_value = "")]
    ylabel: String,

    /// Logarithmic y axis
    #[arg(long)]
    log: bool,

    /// ROOT draw option (`e`, `box`, `colz`, ...)
    #[arg(long, default_value = "")]
    option: String,

    /// Output base path; `.png`, `.jpg` and `.C` are written next to it
    #[arg(short, long)]
    out: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Count entries passing a selection
    Count {
        #[command(flatten)]
        tree: TreeArgs,

        /// Selection expression (empty selects everything)
        #[arg(long, default_value = "")]
        cut: String,
    },

    /// Print the signal efficiency of a selection
    Eff {
        #[command(flatten)]
        tree: TreeArgs,

        #[arg(long)]
        cut: String,

        /// Reference sample cut used as an extra denominator
        #[arg(long)]
        sample: Option<String>,
    },

    /// Print the background rejection of a selection
    Bck {
        #[command(flatten)]
        tree: TreeArgs,

        #[arg(long)]
        cut: String,

        #[arg(long)]
        sample: Option<String>,
    },

    /// Draw one variable from one tree
    Draw {
        #[command(flatten)]
        tree: TreeArgs,

        /// Variable expression, `y:x` for 2D
        variable: String,

        #[arg(long, default_value = "")]
        cut: String,

        #[command(flatten)]
        plot: PlotArgs,

        /// ROOT color index of the line (marker for 2D)
        #[arg(long, default_value = "1")]
        color: u16,

        /// Normalise to unit area
        #[arg(long)]
        norm: bool,

        /// Hide the stats box
        #[arg(long)]
        no_stats: bool,

        /// Legend label
        #[arg(long)]
        legend: Option<String>,
    },

    /// Overlay one variable from two trees
    Draw2 {
        #[command(flatten)]
        tree: TreeArgs,

        /// Second tree file, same base and tree name unless overridden
        #[arg(long)]
        file2: String,

        #[arg(long)]
        tree2: Option<String>,

        #[arg(long)]
        friend_file2: Option<String>,

        /// Variable expression, `y:x` for 2D
        variable: String,

        /// Variable of the second tree, defaults to the first
        #[arg(long)]
        variable2: Option<String>,

        #[arg(long, default_value = "")]
        cut1: String,

        #[arg(long, default_value = "")]
        cut2: String,

        #[command(flatten)]
        plot: PlotArgs,

        #[arg(long, default_value = "2")]
        color1: u16,

        #[arg(long, default_value = "4")]
        color2: u16,

        #[arg(long)]
        norm: bool,

        #[arg(long)]
        no_stats: bool,

        /// Legend labels, first then second tree
        #[arg(long, num_args = 2)]
        legend: Vec<String>,

        /// Line annotation `x1,y1,x2,y2` (repeatable)
        #[arg(long, value_parser = parse_line)]
        line: Vec<LineAnnotation>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // reports go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Count { tree, cut } => cmd_count(&tree, &cut),
        Commands::Eff { tree, cut, sample } => {
            let ds = tree.open()?;
            report_efficiency(&ds, &cut, sample.as_deref(), &settings.report)?;
            Ok(())
        }
        Commands::Bck { tree, cut, sample } => {
            let ds = tree.open()?;
            report_rejection(&ds, &cut, sample.as_deref(), &settings.report)?;
            Ok(())
        }
        Commands::Draw { tree, variable, cut, plot, color, norm, no_stats, legend } => {
            let ds = tree.open()?;
            cmd_draw(settings, &ds, &variable, &cut, &plot, color, norm, !no_stats, legend)
        }
        Commands::Draw2 {
            tree,
            file2,
            tree2,
            friend_file2,
            variable,
            variable2,
            cut1,
            cut2,
            plot,
            color1,
            color2,
            norm,
            no_stats,
            legend,
            line,
        } => {
            let second = TreeArgs {
                file: file2,
                tree: tree2.unwrap_or_else(|| tree.tree.clone()),
                friend_file: friend_file2,
                ..tree.clone()
            };
            let a = tree.open()?;
            let b = second.open()?;
            let samples = Samples { a: &a, b: &b, variable2, cut1, cut2 };
            cmd_draw2(settings, samples, &variable, &plot, (color1, color2), norm, !no_stats, legend, line)
        }
    }
}

fn cmd_count(tree: &TreeArgs, cut: &str) -> Result<()> {
    let ds = tree.open()?;
    let n = count_entries(&ds, cut)?;
    tracing::info!(tree = %tree.tree, cut, entries = n, "counted");
    println!("{n}");
    Ok(())
}

fn is_2d(variable: &str) -> bool {
    split_2d(variable).is_some()
}

fn prepare_out(out: &Path) -> Result<()> {
    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_draw(
    mut settings: Settings,
    ds: &Dataset,
    variable: &str,
    cut: &str,
    plot: &PlotArgs,
    color: u16,
    norm: bool,
    stats: bool,
    legend: Option<String>,
) -> Result<()> {
    prepare_out(&plot.out)?;
    let mut canvas = Canvas::with_config("c1", settings.render.clone());

    if is_2d(variable) {
        if norm || legend.is_some() {
            bail!("--norm and --legend apply to 1D variables only");
        }
        let req = Histogram2dRequest {
            option: plot.option.clone(),
            nbins_x: plot.nbins,
            xmin: plot.xmin,
            xmax: plot.xmax,
            nbins_y: plot.nbins_y,
            ymin: plot.ymin,
            ymax: plot.ymax,
            title: plot.title.clone(),
            xlabel: plot.xlabel.clone(),
            ylabel: plot.ylabel.clone(),
            color,
            log: plot.log,
            save: Some(plot.out.clone()),
            ..Histogram2dRequest::new(variable, cut)
        };
        if !stats {
            tp_plot::set_stats_box(&mut settings.style, false);
        }
        draw_histogram_2d(&mut canvas, &settings.style, ds, &req)?;
    } else {
        let req = HistogramRequest {
            option: plot.option.clone(),
            nbins: plot.nbins,
            xmin: plot.xmin,
            xmax: plot.xmax,
            title: plot.title.clone(),
            xlabel: plot.xlabel.clone(),
            ylabel: plot.ylabel.clone(),
            color,
            log: plot.log,
            normalize: norm,
            stats,
            legend: legend.into_iter().collect(),
            save: Some(plot.out.clone()),
            ..HistogramRequest::new(variable, cut)
        };
        draw_histogram(&mut canvas, &mut settings.style, ds, &req)?;
    }
    tracing::info!(out = %plot.out.display(), "saved");
    Ok(())
}

struct Samples<'a> {
    a: &'a Dataset,
    b: &'a Dataset,
    variable2: Option<String>,
    cut1: String,
    cut2: String,
}

#[allow(clippy::too_many_arguments)]
fn cmd_draw2(
    mut settings: Settings,
    samples: Samples<'_>,
    variable: &str,
    plot: &PlotArgs,
    (color_a, color_b): (u16, u16),
    norm: bool,
    stats: bool,
    legend: Vec<String>,
    lines: Vec<LineAnnotation>,
) -> Result<()> {
    prepare_out(&plot.out)?;
    let mut canvas = Canvas::with_config("c1", settings.render.clone());

    if is_2d(variable) {
        if norm || !legend.is_empty() || !lines.is_empty() {
            bail!("--norm, --legend and --line apply to 1D variables only");
        }
        let req = Overlay2dRequest {
            variable_b: samples.variable2,
            selection_a: samples.cut1,
            selection_b: samples.cut2,
            option: plot.option.clone(),
            nbins_x: plot.nbins,
            xmin: plot.xmin,
            xmax: plot.xmax,
            nbins_y: plot.nbins_y,
            ymin: plot.ymin,
            ymax: plot.ymax,
            title: plot.title.clone(),
            xlabel: plot.xlabel.clone(),
            ylabel: plot.ylabel.clone(),
            color_a,
            color_b,
            log: plot.log,
            save: Some(plot.out.clone()),
            ..Overlay2dRequest::new(variable)
        };
        if !stats {
            tp_plot::set_stats_box(&mut settings.style, false);
        }
        draw_two_histograms_2d(&mut canvas, &settings.style, samples.a, samples.b, &req)?;
    } else {
        let req = OverlayRequest {
            variable_b: samples.variable2,
            selection_a: samples.cut1,
            selection_b: samples.cut2,
            nbins: plot.nbins,
            xmin: plot.xmin,
            xmax: plot.xmax,
            title: plot.title.clone(),
            xlabel: plot.xlabel.clone(),
            ylabel: plot.ylabel.clone(),
            color_a,
            color_b,
            log: plot.log,
            normalize: norm,
            stats,
            legend,
            lines,
            save: Some(plot.out.clone()),
            ..OverlayRequest::new(variable)
        };
        draw_two_histograms(&mut canvas, &mut settings.style, samples.a, samples.b, &req)?;
    }
    tracing::info!(out = %plot.out.display(), "saved");
    Ok(())
}

fn parse_line(s: &str) -> std::result::Result<LineAnnotation, String> {
    let values: Vec<f64> = s
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("'{v}': {e}")))
        .collect::<std::result::Result<_, _>>()?;
    match values.as_slice() {
        [x1, y1, x2, y2] => Ok(make_line(*x1, *y1, *x2, *y2)),
        _ => Err(format!("expected x1,y1,x2,y2, got '{s}'")),
    }
}

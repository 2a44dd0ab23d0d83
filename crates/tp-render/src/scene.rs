//! Serializable description of one canvas: histograms, decorations and scale.
//!
//! A [`Scene`] carries plain numbers only (bin contents, ROOT color indices,
//! NDC boxes) so that it can be rendered to SVG/PNG/JPEG or replayed as a ROOT
//! macro without access to the datasets that produced it.

use serde::{Deserialize, Serialize};

/// Uniform binning of one scene axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinAxis {
    pub nbins: usize,
    pub min: f64,
    pub max: f64,
}

impl BinAxis {
    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.nbins as f64
    }

    /// Low edge of ROOT bin `bin` (1-based).
    pub fn low_edge(&self, bin: usize) -> f64 {
        self.min + (bin as f64 - 1.0) * self.bin_width()
    }
}

/// 1D draw style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Draw1d {
    /// Step outline (`HIST`).
    #[default]
    Hist,
    /// Markers with vertical error bars (`E`).
    Errors,
}

/// 2D draw style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Draw2d {
    #[default]
    Scatter,
    Box,
    Colz,
}

impl Draw2d {
    /// Parse a ROOT draw option; unknown options fall back to scatter.
    pub fn from_option(option: &str) -> Self {
        let opt = option.to_lowercase();
        if opt.contains("colz") || opt.contains("col") {
            Self::Colz
        } else if opt.contains("box") {
            Self::Box
        } else {
            Self::Scatter
        }
    }

    pub fn as_option(&self) -> &'static str {
        match self {
            Self::Scatter => "",
            Self::Box => "box",
            Self::Colz => "colz",
        }
    }
}

/// One filled 1D histogram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series1d {
    pub name: String,
    pub title: String,
    pub axis: BinAxis,
    /// All bins in ROOT order, under/overflow included (`nbins + 2`).
    pub contents: Vec<f64>,
    /// Per-bin errors, same layout as `contents`.
    pub errors: Vec<f64>,
    pub entries: u64,
    pub mean: f64,
    pub std_dev: f64,
    /// ROOT color index.
    pub color: u16,
    pub line_width: f64,
    #[serde(default)]
    pub draw: Draw1d,
}

impl Series1d {
    /// In-range contents.
    pub fn bins(&self) -> &[f64] {
        let n = self.axis.nbins;
        self.contents.get(1..=n).unwrap_or(&[])
    }

    pub fn bin_error(&self, bin: usize) -> f64 {
        self.errors.get(bin).copied().unwrap_or(0.0)
    }

    pub fn integral(&self) -> f64 {
        self.bins().iter().sum()
    }
}

/// One filled 2D histogram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series2d {
    pub name: String,
    pub title: String,
    pub x: BinAxis,
    pub y: BinAxis,
    /// All cells in ROOT order, `(x.nbins + 2) * (y.nbins + 2)`, x fastest.
    pub contents: Vec<f64>,
    pub entries: u64,
    pub mean_x: f64,
    pub mean_y: f64,
    pub std_dev_x: f64,
    pub std_dev_y: f64,
    /// ROOT marker color index.
    pub color: u16,
    #[serde(default)]
    pub draw: Draw2d,
}

impl Series2d {
    /// Content of ROOT cell `(bx, by)`, flows included.
    pub fn cell(&self, bx: usize, by: usize) -> f64 {
        self.contents.get(by * (self.x.nbins + 2) + bx).copied().unwrap_or(0.0)
    }

    pub fn max_cell(&self) -> f64 {
        (1..=self.y.nbins)
            .flat_map(|by| (1..=self.x.nbins).map(move |bx| (bx, by)))
            .map(|(bx, by)| self.cell(bx, by))
            .fold(0.0, f64::max)
    }
}

/// Scene contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "series", rename_all = "snake_case")]
pub enum SceneBody {
    /// Nothing drawn yet (or graphics suppressed).
    #[default]
    Empty,
    Hist1d(Vec<Series1d>),
    Hist2d(Vec<Series2d>),
}

/// Legend placed in NDC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendSpec {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub header: Option<String>,
    pub entries: Vec<LegendEntrySpec>,
    pub border_size: u32,
    /// Transparent when `None`.
    pub fill_color: Option<u16>,
    pub text_font: u16,
    /// Fraction of the canvas height.
    pub text_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntrySpec {
    /// Name of the series the entry describes, when it has one.
    #[serde(default)]
    pub object: Option<String>,
    pub label: String,
    pub color: u16,
    pub line_width: f64,
    /// ROOT `AddEntry` option (`"L"`, `"P"`, `"F"`).
    pub option: String,
}

/// Straight line in data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSpec {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub color: u16,
    pub width: f64,
    /// ROOT line style: 1 solid, 2 dashed.
    pub style: u16,
}

/// Which statistics a stats box shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatFields {
    pub name: bool,
    pub entries: bool,
    pub mean: bool,
    pub rms: bool,
    pub underflow: bool,
    pub overflow: bool,
    pub integral: bool,
}

impl StatFields {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Stats boxes: the first at the given NDC box, the next ones stacked below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsSpec {
    pub fields: StatFields,
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

/// A complete canvas description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub body: SceneBody,
    pub legend: Option<LegendSpec>,
    pub lines: Vec<LineSpec>,
    pub stats: Option<StatsSpec>,
    pub log_y: bool,
}

impl Scene {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            body: SceneBody::Empty,
            legend: None,
            lines: Vec::new(),
            stats: None,
            log_y: false,
        }
    }

    /// Drop everything drawn, keeping the canvas identity.
    pub fn clear(&mut self) {
        let name = std::mem::take(&mut self.name);
        *self = Self::new(name, self.width, self.height);
    }

    pub fn series_count(&self) -> usize {
        match &self.body {
            SceneBody::Empty => 0,
            SceneBody::Hist1d(s) => s.len(),
            SceneBody::Hist2d(s) => s.len(),
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> Series1d {
        Series1d {
            name: "h1".into(),
            title: "momentum".into(),
            axis: BinAxis { nbins: 2, min: 0.0, max: 2.0 },
            contents: vec![1.0, 3.0, 4.0, 0.0],
            errors: vec![1.0, 3f64.sqrt(), 2.0, 0.0],
            entries: 8,
            mean: 1.1,
            std_dev: 0.5,
            color: 2,
            line_width: 2.0,
            draw: Draw1d::Hist,
        }
    }

    #[test]
    fn series_bins_skip_flows() {
        let s = series();
        assert_eq!(s.bins(), &[3.0, 4.0]);
        assert_eq!(s.integral(), 7.0);
        assert_eq!(s.axis.low_edge(2), 1.0);
    }

    #[test]
    fn json_keeps_body_kind() {
        let mut scene = Scene::new("c1", 700.0, 500.0);
        scene.body = SceneBody::Hist1d(vec![series()]);
        scene.log_y = true;
        let json = scene.to_json().unwrap();
        assert!(json.contains("\"kind\": \"hist1d\""));
        let back = Scene::from_json(&json).unwrap();
        assert_eq!(back.series_count(), 1);
        assert!(back.log_y);
    }

    #[test]
    fn clear_keeps_identity() {
        let mut scene = Scene::new("c1", 700.0, 500.0);
        scene.body = SceneBody::Hist1d(vec![series()]);
        scene.title = "x".into();
        scene.clear();
        assert_eq!(scene.name, "c1");
        assert_eq!(scene.series_count(), 0);
        assert!(scene.title.is_empty());
    }

    #[test]
    fn draw2d_options() {
        assert_eq!(Draw2d::from_option("COLZ"), Draw2d::Colz);
        assert_eq!(Draw2d::from_option("box"), Draw2d::Box);
        assert_eq!(Draw2d::from_option(""), Draw2d::Scatter);
    }
}

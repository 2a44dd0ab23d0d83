//! Fixed-binning 1D and 2D histograms.
//!
//! Bin numbering follows the ROOT convention: bin 0 is the underflow, bins
//! `1..=nbins` are in range and bin `nbins + 1` is the overflow.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};

/// Uniform binning along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// Number of in-range bins.
    pub nbins: usize,
    /// Lower edge of the first bin.
    pub min: f64,
    /// Upper edge of the last bin.
    pub max: f64,
    /// Axis title.
    #[serde(default)]
    pub label: String,
}

impl AxisSpec {
    /// Validate and build an axis.
    pub fn new(nbins: usize, min: f64, max: f64) -> Result<Self> {
        if nbins == 0 {
            return Err(TreeError::InvalidBinning("number of bins must be positive".into()));
        }
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(TreeError::InvalidBinning(format!(
                "axis range must satisfy min < max, got [{min}, {max}]"
            )));
        }
        Ok(Self { nbins, min, max, label: String::new() })
    }

    /// Choose `nbins` bins covering `values` (automatic binning of a raw draw).
    ///
    /// The upper edge is pushed out slightly so that the maximum lands in range.
    /// An empty or constant sample gets a unit-wide range around its value.
    pub fn covering(nbins: usize, values: &[f64]) -> Result<Self> {
        let (lo, hi) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if !lo.is_finite() {
            log::warn!("automatic binning over an empty sample, using [0, 1]");
            return Self::new(nbins, 0.0, 1.0);
        }
        if hi - lo <= f64::EPSILON * lo.abs().max(1.0) {
            return Self::new(nbins, lo - 0.5, hi + 0.5);
        }
        let pad = (hi - lo) * 0.01;
        Self::new(nbins, lo, hi + pad)
    }

    /// Attach an axis title.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Width of one bin.
    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.nbins as f64
    }

    /// ROOT bin number for `x`, or `None` for NaN.
    pub fn find_bin(&self, x: f64) -> Option<usize> {
        if x.is_nan() {
            return None;
        }
        if x < self.min {
            return Some(0);
        }
        if x >= self.max {
            return Some(self.nbins + 1);
        }
        let bin = ((x - self.min) / self.bin_width()) as usize;
        Some(bin.min(self.nbins - 1) + 1)
    }
}

/// Weighted moments of in-range fills along one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    /// Sum of weights.
    pub sumw: f64,
    /// Sum of squared weights.
    pub sumw2: f64,
    /// Sum of `w * x`.
    pub sumwx: f64,
    /// Sum of `w * x^2`.
    pub sumwx2: f64,
}

impl Moments {
    fn add(&mut self, x: f64, w: f64) {
        self.sumw += w;
        self.sumw2 += w * w;
        self.sumwx += w * x;
        self.sumwx2 += w * x * x;
    }

    fn scale(&mut self, c: f64) {
        self.sumw *= c;
        self.sumw2 *= c * c;
        self.sumwx *= c;
        self.sumwx2 *= c;
    }

    /// Weighted mean, 0 when nothing was filled.
    pub fn mean(&self) -> f64 {
        if self.sumw == 0.0 { 0.0 } else { self.sumwx / self.sumw }
    }

    /// Weighted standard deviation ("RMS" in ROOT's stats box).
    pub fn std_dev(&self) -> f64 {
        if self.sumw == 0.0 {
            return 0.0;
        }
        let m = self.mean();
        (self.sumwx2 / self.sumw - m * m).max(0.0).sqrt()
    }
}

/// A 1D histogram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hist1D {
    /// Histogram name.
    pub name: String,
    /// Histogram title.
    pub title: String,
    /// X axis binning and title.
    pub x: AxisSpec,
    /// Y axis title.
    pub y_label: String,
    contents: Vec<f64>,
    sumw2: Vec<f64>,
    entries: u64,
    moments: Moments,
}

impl Hist1D {
    /// Empty histogram over `x`.
    pub fn new(name: impl Into<String>, title: impl Into<String>, x: AxisSpec) -> Self {
        let n = x.nbins + 2;
        Self {
            name: name.into(),
            title: title.into(),
            x,
            y_label: String::new(),
            contents: vec![0.0; n],
            sumw2: vec![0.0; n],
            entries: 0,
            moments: Moments::default(),
        }
    }

    /// Set the y axis title.
    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    /// Add `w` at `x`. NaN values are ignored.
    pub fn fill(&mut self, x: f64, w: f64) {
        let Some(bin) = self.x.find_bin(x) else { return };
        self.contents[bin] += w;
        self.sumw2[bin] += w * w;
        self.entries += 1;
        if (1..=self.x.nbins).contains(&bin) {
            self.moments.add(x, w);
        }
    }

    /// Content of ROOT bin `bin` (0 = underflow, `nbins + 1` = overflow).
    pub fn bin_content(&self, bin: usize) -> f64 {
        self.contents.get(bin).copied().unwrap_or(0.0)
    }

    /// Statistical error of ROOT bin `bin`.
    pub fn bin_error(&self, bin: usize) -> f64 {
        self.sumw2.get(bin).copied().unwrap_or(0.0).sqrt()
    }

    /// All bins including under/overflow, ROOT order.
    pub fn raw_contents(&self) -> &[f64] {
        &self.contents
    }

    /// In-range bin contents.
    pub fn contents(&self) -> &[f64] {
        &self.contents[1..=self.x.nbins]
    }

    /// In-range bin errors.
    pub fn errors(&self) -> Vec<f64> {
        self.sumw2[1..=self.x.nbins].iter().map(|v| v.sqrt()).collect()
    }

    /// Underflow content.
    pub fn underflow(&self) -> f64 {
        self.contents[0]
    }

    /// Overflow content.
    pub fn overflow(&self) -> f64 {
        self.contents[self.x.nbins + 1]
    }

    /// Number of fills, including under/overflow.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Sum of in-range bin contents.
    pub fn integral(&self) -> f64 {
        self.contents().iter().sum()
    }

    /// In-range fill moments.
    pub fn moments(&self) -> &Moments {
        &self.moments
    }

    /// Multiply every bin (and the moments) by `c`.
    pub fn scale(&mut self, c: f64) {
        self.contents.iter_mut().for_each(|v| *v *= c);
        self.sumw2.iter_mut().for_each(|v| *v *= c * c);
        self.moments.scale(c);
    }
}

/// A 2D histogram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hist2D {
    /// Histogram name.
    pub name: String,
    /// Histogram title.
    pub title: String,
    /// X axis binning and title.
    pub x: AxisSpec,
    /// Y axis binning and title.
    pub y: AxisSpec,
    contents: Vec<f64>,
    entries: u64,
    moments_x: Moments,
    moments_y: Moments,
}

impl Hist2D {
    /// Empty histogram over `x` × `y`.
    pub fn new(name: impl Into<String>, title: impl Into<String>, x: AxisSpec, y: AxisSpec) -> Self {
        let n = (x.nbins + 2) * (y.nbins + 2);
        Self {
            name: name.into(),
            title: title.into(),
            x,
            y,
            contents: vec![0.0; n],
            entries: 0,
            moments_x: Moments::default(),
            moments_y: Moments::default(),
        }
    }

    fn offset(&self, bx: usize, by: usize) -> usize {
        by * (self.x.nbins + 2) + bx
    }

    /// Add `w` at `(x, y)`. NaN coordinates are ignored.
    pub fn fill(&mut self, x: f64, y: f64, w: f64) {
        let (Some(bx), Some(by)) = (self.x.find_bin(x), self.y.find_bin(y)) else { return };
        let idx = self.offset(bx, by);
        self.contents[idx] += w;
        self.entries += 1;
        if (1..=self.x.nbins).contains(&bx) && (1..=self.y.nbins).contains(&by) {
            self.moments_x.add(x, w);
            self.moments_y.add(y, w);
        }
    }

    /// Content of ROOT bin `(bx, by)`, flows included.
    pub fn bin_content(&self, bx: usize, by: usize) -> f64 {
        if bx > self.x.nbins + 1 || by > self.y.nbins + 1 {
            return 0.0;
        }
        self.contents[self.offset(bx, by)]
    }

    /// Number of fills, including flows.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Sum of in-range contents.
    pub fn integral(&self) -> f64 {
        self.cells().map(|(_, _, v)| v).sum()
    }

    /// In-range cells as `(bx, by, content)` with 1-based bin numbers.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (1..=self.y.nbins)
            .flat_map(move |by| (1..=self.x.nbins).map(move |bx| (bx, by, self.bin_content(bx, by))))
    }

    /// X moments of in-range fills.
    pub fn moments_x(&self) -> &Moments {
        &self.moments_x
    }

    /// Y moments of in-range fills.
    pub fn moments_y(&self) -> &Moments {
        &self.moments_y
    }
}

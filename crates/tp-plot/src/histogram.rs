//! Histogram construction and conversion to render series.

use tp_render::{BinAxis, Draw1d, Draw2d, Series1d, Series2d};
use tp_tree::{AxisSpec, Hist1D, Hist2D};

use crate::error::{PlotError, Result};

/// Empty labeled 1D histogram.
///
/// Fails with `InvalidBinning` when `nbins` is zero or `xmax <= xmin`.
pub fn make_histogram(
    name: &str,
    nbins: usize,
    xmin: f64,
    xmax: f64,
    title: &str,
    xlabel: &str,
    ylabel: &str,
) -> Result<Hist1D> {
    let x = AxisSpec::new(nbins, xmin, xmax)?.with_label(xlabel);
    Ok(Hist1D::new(name, title, x).with_y_label(ylabel))
}

/// Empty labeled 2D histogram.
#[allow(clippy::too_many_arguments)]
pub fn make_histogram_2d(
    name: &str,
    nbins_x: usize,
    xmin: f64,
    xmax: f64,
    nbins_y: usize,
    ymin: f64,
    ymax: f64,
    title: &str,
    xlabel: &str,
    ylabel: &str,
) -> Result<Hist2D> {
    let x = AxisSpec::new(nbins_x, xmin, xmax)?.with_label(xlabel);
    let y = AxisSpec::new(nbins_y, ymin, ymax)?.with_label(ylabel);
    Ok(Hist2D::new(name, title, x, y))
}

/// Scale `hist` to unit integral.
pub fn normalize(hist: &mut Hist1D) -> Result<()> {
    let integral = hist.integral();
    if integral == 0.0 || !integral.is_finite() {
        return Err(PlotError::EmptyIntegral { name: hist.name.clone() });
    }
    hist.scale(1.0 / integral);
    Ok(())
}

fn bin_axis(axis: &AxisSpec) -> BinAxis {
    BinAxis { nbins: axis.nbins, min: axis.min, max: axis.max }
}

pub(crate) fn series_1d(hist: &Hist1D, color: u16, line_width: f64, draw: Draw1d) -> Series1d {
    let n = hist.x.nbins;
    Series1d {
        name: hist.name.clone(),
        title: hist.title.clone(),
        axis: bin_axis(&hist.x),
        contents: hist.raw_contents().to_vec(),
        errors: (0..=n + 1).map(|bin| hist.bin_error(bin)).collect(),
        entries: hist.entries(),
        mean: hist.moments().mean(),
        std_dev: hist.moments().std_dev(),
        color,
        line_width,
        draw,
    }
}

pub(crate) fn series_2d(hist: &Hist2D, color: u16, draw: Draw2d) -> Series2d {
    let (nx, ny) = (hist.x.nbins, hist.y.nbins);
    let contents = (0..=ny + 1)
        .flat_map(|by| (0..=nx + 1).map(move |bx| (bx, by)))
        .map(|(bx, by)| hist.bin_content(bx, by))
        .collect();
    Series2d {
        name: hist.name.clone(),
        title: hist.title.clone(),
        x: bin_axis(&hist.x),
        y: bin_axis(&hist.y),
        contents,
        entries: hist.entries(),
        mean_x: hist.moments_x().mean(),
        mean_y: hist.moments_y().mean(),
        std_dev_x: hist.moments_x().std_dev(),
        std_dev_y: hist.moments_y().std_dev(),
        color,
        draw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tp_tree::TreeError;

    #[test]
    fn labels_land_on_axes() {
        let h = make_histogram("h1", 10, 0.0, 100.0, "Muon momentum", "p [MeV]", "events").unwrap();
        assert_eq!(h.name, "h1");
        assert_eq!(h.title, "Muon momentum");
        assert_eq!(h.x.label, "p [MeV]");
        assert_eq!(h.y_label, "events");
        assert_eq!(h.integral(), 0.0);
    }

    #[test]
    fn bad_binning_is_an_error() {
        for (n, lo, hi) in [(0, 0.0, 1.0), (10, 1.0, 1.0), (10, 2.0, 1.0), (10, 0.0, f64::NAN)] {
            let err = make_histogram("h", n, lo, hi, "", "", "").unwrap_err();
            assert!(matches!(err, PlotError::Tree(TreeError::InvalidBinning(_))));
        }
        assert!(make_histogram_2d("h", 10, 0.0, 1.0, 0, 0.0, 1.0, "", "", "").is_err());
    }

    #[test]
    fn normalize_to_unit_integral() {
        let mut h = make_histogram("h1", 4, 0.0, 4.0, "", "", "").unwrap();
        for x in [0.5, 1.5, 1.5, 3.5, 9.0] {
            h.fill(x, 1.0);
        }
        normalize(&mut h).unwrap();
        assert_relative_eq!(h.contents().iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(h.bin_content(2), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn normalize_empty_fails() {
        let mut h = make_histogram("h2", 4, 0.0, 4.0, "", "", "").unwrap();
        h.fill(-1.0, 1.0);
        let err = normalize(&mut h).unwrap_err();
        assert!(matches!(err, PlotError::EmptyIntegral { name } if name == "h2"));
    }

    #[test]
    fn series_carry_flows_and_errors() {
        let mut h = make_histogram("h1", 2, 0.0, 2.0, "t", "", "").unwrap();
        h.fill(-1.0, 1.0);
        h.fill(0.5, 2.0);
        h.fill(5.0, 1.0);
        let s = series_1d(&h, 2, 2.0, Draw1d::Hist);
        assert_eq!(s.contents, vec![1.0, 2.0, 0.0, 1.0]);
        assert_relative_eq!(s.errors[1], 2.0);
        assert_eq!(s.entries, 3);
        assert_eq!(s.color, 2);

        let mut h2 = make_histogram_2d("h2", 2, 0.0, 2.0, 3, 0.0, 3.0, "", "", "").unwrap();
        h2.fill(1.5, 2.5, 3.0);
        let s2 = series_2d(&h2, 4, Draw2d::Box);
        assert_eq!(s2.contents.len(), 4 * 5);
        assert_eq!(s2.cell(2, 3), 3.0);
        assert_eq!(s2.max_cell(), 3.0);
    }
}

//! Projection of tree expressions into histograms under a selection.
//!
//! The selection is evaluated per row; a row is selected when the value is
//! non-zero and that value becomes the fill weight, so `w*(x>0)` both cuts
//! and weights.

use crate::dataset::Dataset;
use crate::error::{Result, TreeError};
use crate::expr::{CompiledExpr, split_2d};
use crate::histogram::{Hist1D, Hist2D};

/// Values of a variable expression for the selected rows.
#[derive(Debug, Clone, Default)]
pub struct Selected {
    /// Variable value per selected row.
    pub values: Vec<f64>,
    /// Selection weight per selected row.
    pub weights: Vec<f64>,
}

/// `(y, x)` pairs for the selected rows of a `y:x` expression.
#[derive(Debug, Clone, Default)]
pub struct Selected2D {
    /// Vertical values.
    pub y: Vec<f64>,
    /// Horizontal values.
    pub x: Vec<f64>,
    /// Selection weight per selected row.
    pub weights: Vec<f64>,
}

/// Per-row selection weights; `None` means every row passes with weight 1.
fn selection_weights(dataset: &Dataset, selection: &str) -> Result<Option<Vec<f64>>> {
    match CompiledExpr::compile_selection(selection)? {
        Some(sel) => sel.eval_dataset(dataset).map(Some),
        None => Ok(None),
    }
}

fn passing(weights: &Option<Vec<f64>>, n: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
    (0..n).filter_map(move |i| match weights {
        Some(w) if w[i] != 0.0 => Some((i, w[i])),
        Some(_) => None,
        None => Some((i, 1.0)),
    })
}

/// Number of rows passing `selection` (all rows for a blank selection).
pub fn count_entries(dataset: &Dataset, selection: &str) -> Result<u64> {
    let weights = selection_weights(dataset, selection)?;
    let n = match weights {
        None => dataset.entries(),
        Some(ref w) => w.iter().filter(|v| **v != 0.0).count() as u64,
    };
    log::debug!("count '{}' on tree '{}': {n}", selection.trim(), dataset.name());
    Ok(n)
}

/// Evaluate `varexp` on the rows passing `selection`.
pub fn select_values(dataset: &Dataset, varexp: &str, selection: &str) -> Result<Selected> {
    let var = CompiledExpr::compile(varexp)?;
    let values = var.eval_dataset(dataset)?;
    let weights = selection_weights(dataset, selection)?;

    let mut out = Selected::default();
    for (i, w) in passing(&weights, values.len()) {
        out.values.push(values[i]);
        out.weights.push(w);
    }
    Ok(out)
}

/// Evaluate a `y:x` expression on the rows passing `selection`.
pub fn select_values_2d(dataset: &Dataset, varexp: &str, selection: &str) -> Result<Selected2D> {
    let (ys, xs) = split_2d(varexp).ok_or_else(|| {
        TreeError::Expression(format!("two-dimensional draw needs 'y:x', got '{varexp}'"))
    })?;
    let y = CompiledExpr::compile(ys)?.eval_dataset(dataset)?;
    let x = CompiledExpr::compile(xs)?.eval_dataset(dataset)?;
    let weights = selection_weights(dataset, selection)?;

    let mut out = Selected2D::default();
    for (i, w) in passing(&weights, x.len()) {
        out.y.push(y[i]);
        out.x.push(x[i]);
        out.weights.push(w);
    }
    Ok(out)
}

/// Fill `hist` with `varexp` for rows passing `selection`.
///
/// Returns the number of selected rows.
pub fn project(dataset: &Dataset, hist: &mut Hist1D, varexp: &str, selection: &str) -> Result<u64> {
    if split_2d(varexp).is_some() {
        return Err(TreeError::HistogramFill(format!(
            "'{varexp}' is two-dimensional but '{}' is a 1D histogram",
            hist.name
        )));
    }
    let sel = select_values(dataset, varexp, selection)?;
    for (&v, &w) in sel.values.iter().zip(&sel.weights) {
        hist.fill(v, w);
    }
    log::debug!(
        "filled '{}' from '{}' with {} selected rows (integral {})",
        hist.name,
        varexp,
        sel.values.len(),
        hist.integral()
    );
    Ok(sel.values.len() as u64)
}

/// Fill `hist` with a `y:x` expression for rows passing `selection`.
///
/// Returns the number of selected rows.
pub fn project_2d(
    dataset: &Dataset,
    hist: &mut Hist2D,
    varexp: &str,
    selection: &str,
) -> Result<u64> {
    let sel = select_values_2d(dataset, varexp, selection)?;
    for ((&x, &y), &w) in sel.x.iter().zip(&sel.y).zip(&sel.weights) {
        hist.fill(x, y, w);
    }
    log::debug!("filled '{}' from '{}' with {} selected rows", hist.name, varexp, sel.x.len());
    Ok(sel.x.len() as u64)
}

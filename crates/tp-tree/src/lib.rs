//! # tp-tree
//!
//! Columnar event trees for treeplot.
//!
//! Trees are read from Parquet files, chained across files and joined with
//! row-aligned friends. Selections and variables are string expressions in the
//! `TTree::Draw` dialect, compiled once and evaluated column-wise.
//!
//! ## Example
//!
//! ```no_run
//! use tp_tree::{AxisSpec, Chain, Hist1D, count_entries, project};
//!
//! let events = Chain::new("h1").add("pdk_100k.parquet").load().unwrap();
//! let in_fv = count_entries(&events, "wallv > 200").unwrap();
//!
//! let mut h = Hist1D::new("h1", "momentum", AxisSpec::new(50, 0.0, 500.0).unwrap());
//! project(&events, &mut h, "pmu", "wallv > 200 && MuGamma").unwrap();
//! println!("{in_fv} in FV, integral {}", h.integral());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod dataset;
pub mod error;
pub mod expr;
pub mod filler;
pub mod histogram;
pub mod parquet_io;

pub use chain::{Chain, open_chained_dataset};
pub use dataset::Dataset;
pub use error::{Result, TreeError};
pub use expr::{CompiledExpr, split_2d};
pub use filler::{
    Selected, Selected2D, count_entries, project, project_2d, select_values, select_values_2d,
};
pub use histogram::{AxisSpec, Hist1D, Hist2D, Moments};
pub use parquet_io::{META_KEY_TREE_NAME, read_tree_parquet, write_tree_parquet};

//! Error types for the plot helpers.

use thiserror::Error;
use tp_render::RenderError;
use tp_tree::TreeError;

/// Errors raised by drawing, saving and reporting helpers.
#[derive(Error, Debug)]
pub enum PlotError {
    /// Dataset access, expression or histogram error.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Rendering or output encoding error.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Normalisation asked for on a histogram with nothing in range.
    #[error("histogram '{name}' has zero integral and cannot be normalised")]
    EmptyIntegral {
        /// Histogram name.
        name: String,
    },

    /// A ratio denominator counted no entries.
    #[error("zero denominator: no events in {what}")]
    ZeroDenominator {
        /// What the denominator counts.
        what: String,
    },

    /// Stats option string that is neither letters nor a ROOT integer mode.
    #[error("invalid stats option: '{0}'")]
    InvalidStatOption(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for plot helpers.
pub type Result<T> = std::result::Result<T, PlotError>;

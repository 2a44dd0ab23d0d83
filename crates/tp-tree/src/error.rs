//! Error types for tree access and histogram filling.

use thiserror::Error;

/// Errors that can occur reading trees or filling histograms.
#[derive(Error, Debug)]
pub enum TreeError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parquet decoding or encoding failure.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow array conversion failure.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// The file does not hold the requested tree.
    #[error("tree not found: '{requested}' (file holds '{found}')")]
    TreeNotFound {
        /// Tree name asked for.
        requested: String,
        /// Tree name recorded in the file.
        found: String,
    },

    /// Files added to one chain disagree on their columns.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A friend tree does not line up row-for-row with its primary tree.
    #[error("friend tree '{friend}' has {friend_entries} entries, primary has {entries}")]
    FriendMismatch {
        /// Friend tree name.
        friend: String,
        /// Primary tree entries.
        entries: u64,
        /// Friend tree entries.
        friend_entries: u64,
    },

    /// Column referenced by an expression is not in the dataset.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// Expression parse error.
    #[error("expression error: {0}")]
    Expression(String),

    /// Histogram binning precondition violated.
    #[error("invalid binning: {0}")]
    InvalidBinning(String),

    /// Histogram filling error.
    #[error("histogram fill error: {0}")]
    HistogramFill(String),
}

/// Result alias for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

//! Error types for table transforms.
//!
//! Only structural contract breaches are errors. Missing descriptors,
//! unknown pivot keys and odd scalar types all degrade to raw values.

/// Result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Error type for table transforms.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// A metric or display column requested by the widget is absent.
    #[error("Result table is missing column '{column}'")]
    MissingColumn { column: String },

    /// A row carries a different number of cells than the column index.
    #[error("Row {row} has {actual} values, expected {expected}")]
    RowShape {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// An index entry carries a different number of values than the index has levels.
    #[error("Index entry has {actual} values, expected {expected} levels")]
    IndexShape { expected: usize, actual: usize },

    /// The widget was configured without any metric.
    #[error("At least one metric is required")]
    NoMetrics,

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

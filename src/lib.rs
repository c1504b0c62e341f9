//! # Pivotgrid
//!
//! Reshapes dimensional query results into hierarchical grid tables.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  ResultTable (model)                     │
//! │  (row index of dimension values, metric/ref columns)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [normalize]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Formatted dates, totals sentinel, metrics level      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [pivot]
//! ┌─────────────────────────────────────────────────────────┐
//! │       Reshaped table (pivoted and/or transposed)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [headers + rows]
//! ┌─────────────────────────────────────────────────────────┐
//! │   { columns: header tree, data: nested row records }     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Dimensions and filters can be wrapped in [`modifier`] types such as
//! [`Rollup`](modifier::Rollup) without losing any of their behavior.

pub mod config;
pub mod error;
pub mod model;
pub mod modifier;
pub mod transform;

pub use error::{TransformError, TransformResult};
pub use transform::{ReactTable, ReactTableOutput};

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{ReactTableSettings, Settings};
    pub use crate::error::{TransformError, TransformResult};
    pub use crate::model::{
        Definition, Dimension, DimensionLike, Filter, FilterLike, Index, Interval, Level, Metric,
        Reference, ReferenceDelta, ResultTable, Scalar, TOTALS_VALUE,
    };
    pub use crate::modifier::{Modifier, OmitFromRollup, Rollup};
    pub use crate::transform::{CellValue, ColumnHeader, ReactTable, ReactTableOutput, RowRecord};
}

//! Inputs to the transform: result tables and the descriptors of the
//! dimensions, metrics, references and filters that produced them.

pub mod dimension;
pub mod filter;
pub mod index;
pub mod metric;
pub mod scalar;
pub mod table;

pub use dimension::{Definition, Dimension, DimensionLike, Interval};
pub use filter::{filters_for_rollup, Filter, FilterLike};
pub use index::{Index, IndexGroup, Level, METRICS_KEY};
pub use metric::{ItemDescriptor, Metric, Reference, ReferenceDelta};
pub use scalar::{Scalar, TOTALS_VALUE};
pub use table::{ResultTable, ResultTableBuilder, ResultTableDocument, RowDocument};

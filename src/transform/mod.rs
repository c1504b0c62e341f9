//! Result table reshaping for the grid widget.
//!
//! ```text
//! ResultTable
//!     │ select columns, extract display values, substitute NaN/Inf
//!     ▼
//! normalize ──► pivot / transpose ──► truncate / collapse
//!                                          │
//!                        ┌─────────────────┴─────────────────┐
//!                        ▼                                   ▼
//!                 header tree (headers)              row records (rows)
//! ```

pub mod display;
pub mod format;
pub mod headers;
pub mod items;
pub mod normalize;
pub mod path;
pub mod pivot;
pub mod react_table;
pub mod rows;

pub use display::{extract_display_values, DisplayValues};
pub use format::{format_item, format_value};
pub use headers::{dimension_headers, ColumnHeader, HeaderBody, HeaderBuilder};
pub use items::{ItemMap, MemberLabels};
pub use normalize::{format_date_value, normalize_index, normalize_table};
pub use path::{get_in, set_in, AccessorPath, CellValue, RowEntry, RowRecord, PATH_DELIMITER};
pub use pivot::{collapse_single_metric, pivot_table};
pub use react_table::{ReactTable, ReactTableOutput};
pub use rows::RowBuilder;

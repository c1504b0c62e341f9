//! Accessor paths and the nested row records they address.
//!
//! A leaf column is identified by the values along its branch of the column
//! index, e.g. `["2024-01", "sales"]`. Headers render the path as a dotted
//! accessor (`2024-01.sales`); rows store the cell under the same nesting.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::Scalar;

/// Separator between accessor path components.
pub const PATH_DELIMITER: &str = ".";

/// A cell: the raw value plus an optional rendered form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellValue {
    pub raw: Scalar,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl CellValue {
    pub fn new(raw: Scalar) -> Self {
        Self { raw, display: None }
    }

    /// A cell with a display value, dropped when it renders the same as raw.
    pub fn with_display(raw: Scalar, display: Option<String>) -> Self {
        let display = display.filter(|d| *d != raw.to_string());
        Self { raw, display }
    }
}

/// One row of output data, keyed by accessor path component.
pub type RowRecord = IndexMap<String, RowEntry>;

/// Either a cell or a nested level of the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowEntry {
    Cell(CellValue),
    Nested(RowRecord),
}

/// Path from the top of the column index to one column.
///
/// Components are joined with `.` as-is. A member containing `.` (a float
/// such as `1.5`, or a dotted label) gives an accessor that parses back into
/// more components than the path has, so such columns cannot be addressed
/// from their accessor string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AccessorPath(Vec<String>);

impl AccessorPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a dotted accessor into components.
    pub fn parse(accessor: &str) -> Self {
        Self(accessor.split(PATH_DELIMITER).map(str::to_string).collect())
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }

    pub fn push(&mut self, component: impl Into<String>) {
        self.0.push(component.into());
    }

    /// A copy of this path extended by one component.
    pub fn child(&self, component: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.push(component);
        path
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Dotted accessor string.
    pub fn to_accessor(&self) -> String {
        self.0.join(PATH_DELIMITER)
    }
}

impl<S: Into<String>> FromIterator<S> for AccessorPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Store `cell` at `path`, creating intermediate levels as needed.
///
/// A cell sitting where an intermediate level is needed is replaced by it.
pub fn set_in(record: &mut RowRecord, path: &AccessorPath, cell: CellValue) {
    let Some((last, parents)) = path.components().split_last() else {
        return;
    };

    let mut current = record;
    for component in parents {
        let entry = current
            .entry(component.clone())
            .or_insert_with(|| RowEntry::Nested(RowRecord::new()));
        if matches!(*entry, RowEntry::Cell(_)) {
            *entry = RowEntry::Nested(RowRecord::new());
        }
        current = match entry {
            RowEntry::Nested(nested) => nested,
            RowEntry::Cell(_) => unreachable!("replaced above"),
        };
    }
    current.insert(last.clone(), RowEntry::Cell(cell));
}

/// The cell at `path`, if there is one.
pub fn get_in<'a>(record: &'a RowRecord, path: &AccessorPath) -> Option<&'a CellValue> {
    let (last, parents) = path.components().split_last()?;

    let mut current = record;
    for component in parents {
        match current.get(component)? {
            RowEntry::Nested(nested) => current = nested,
            RowEntry::Cell(_) => return None,
        }
    }
    match current.get(last)? {
        RowEntry::Cell(cell) => Some(cell),
        RowEntry::Nested(_) => None,
    }
}

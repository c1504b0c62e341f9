//! Display values for dimension members.

use indexmap::IndexMap;

use crate::model::{DimensionLike, ResultTable, Scalar};

/// Per-dimension tables mapping a raw member (in its string form) to the
/// value shown to users.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayValues {
    levels: IndexMap<String, IndexMap<String, String>>,
}

impl DisplayValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dimension_key: impl Into<String>, values: IndexMap<String, String>) {
        self.levels.insert(dimension_key.into(), values);
    }

    /// Display value for `value` of dimension `dimension_key`.
    pub fn lookup(&self, dimension_key: &str, value: &Scalar) -> Option<&str> {
        self.levels
            .get(dimension_key)?
            .get(&value.to_string())
            .map(String::as_str)
    }

    pub fn contains(&self, dimension_key: &str) -> bool {
        self.levels.contains_key(dimension_key)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Collect display values for `dimensions` and remove their display columns
/// from `table`.
///
/// A display-field column maps each member to the first display value seen
/// for it; missing display values become `missing_display`. A static table
/// on the dimension replaces whatever the column provided.
pub fn extract_display_values(
    table: &mut ResultTable,
    dimensions: &[&dyn DimensionLike],
    missing_display: &str,
) -> DisplayValues {
    let mut display_values = DisplayValues::new();

    for dimension in dimensions {
        let key = dimension.key();

        if let Some(field) = dimension.display_field() {
            let level = table.index().position_of(&key);
            let members: Vec<Scalar> = match level {
                Some(pos) => table.index().entries().iter().map(|e| e[pos].clone()).collect(),
                None => Vec::new(),
            };

            if let Some(shown) = table.remove_column(&field) {
                let mut mapping = IndexMap::new();
                for (member, display) in members.iter().zip(shown) {
                    mapping.entry(member.to_string()).or_insert_with(|| {
                        if display.is_missing() {
                            missing_display.to_string()
                        } else {
                            display.to_string()
                        }
                    });
                }
                if level.is_some() {
                    display_values.insert(key.clone(), mapping);
                }
            }
        }

        if let Some(values) = dimension.display_values() {
            display_values.insert(key, values);
        }
    }

    display_values
}

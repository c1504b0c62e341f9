//! Row records.
//!
//! Each table row becomes one record: index members keyed by level, then one
//! cell per column stored under the column's accessor path.

use super::format::format_item;
use super::items::MemberLabels;
use super::path::{set_in, AccessorPath, CellValue, RowEntry, RowRecord};
use crate::model::{ItemDescriptor, Level, ResultTable, Scalar};

/// Builds row records for a reshaped table.
#[derive(Debug, Clone, Copy)]
pub struct RowBuilder<'a> {
    labels: MemberLabels<'a>,
    collapsed_metric: Option<&'a str>,
}

impl<'a> RowBuilder<'a> {
    pub fn new(labels: MemberLabels<'a>) -> Self {
        Self {
            labels,
            collapsed_metric: None,
        }
    }

    /// Append `metric` to every column path, matching the header accessors.
    pub fn with_collapsed_metric(mut self, metric: Option<&'a str>) -> Self {
        self.collapsed_metric = metric;
        self
    }

    /// One record per row, in table order.
    pub fn build(&self, table: &ResultTable) -> Vec<RowRecord> {
        let index_levels = table.index().levels();
        let paths: Vec<AccessorPath> = table
            .columns()
            .entries()
            .iter()
            .map(|entry| self.column_path(entry))
            .collect();

        table
            .iter_rows()
            .map(|(index, values)| {
                let mut record = RowRecord::new();

                for (level, value) in index_levels.iter().zip(index) {
                    let Some(key) = level.key() else {
                        continue;
                    };
                    let display = self.labels.display(level, value).map(str::to_string);
                    record.insert(
                        key.to_string(),
                        RowEntry::Cell(CellValue::with_display(value.clone(), display)),
                    );
                }

                let row_item = self.row_item(index_levels, index);
                for ((entry, path), value) in table.columns().entries().iter().zip(&paths).zip(values) {
                    let item = self.column_item(entry).or(row_item);
                    let display = item.map(|item| format_item(value, item));
                    set_in(&mut record, path, CellValue::with_display(value.clone(), display));
                }

                record
            })
            .collect()
    }

    fn column_path(&self, entry: &[Scalar]) -> AccessorPath {
        let mut path: AccessorPath = entry.iter().map(|v| v.to_string()).collect();
        if let Some(metric) = self.collapsed_metric {
            path.push(metric);
        }
        path
    }

    /// Descriptor keyed by the first component of a column's path.
    ///
    /// Pivoted columns start with a dimension member, so their cells carry
    /// the raw value only.
    fn column_item(&self, entry: &[Scalar]) -> Option<&'a ItemDescriptor> {
        entry.first().and_then(|value| self.labels.items.get_value(value))
    }

    /// Descriptor carried by the row itself, once metrics sit on the row axis.
    fn row_item(&self, levels: &[Level], index: &[Scalar]) -> Option<&'a ItemDescriptor> {
        let pos = levels.iter().position(Level::is_metrics)?;
        self.labels.items.get_value(&index[pos])
    }
}

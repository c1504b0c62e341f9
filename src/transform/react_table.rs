//! The react table widget: a result table in, header tree and row records out.

use serde::Serialize;
use std::fmt;
use tracing::{debug, instrument};

use super::display::extract_display_values;
use super::headers::{dimension_headers, ColumnHeader, HeaderBuilder};
use super::items::{ItemMap, MemberLabels};
use super::normalize::normalize_table;
use super::path::RowRecord;
use super::pivot::{collapse_single_metric, pivot_table};
use super::rows::RowBuilder;
use crate::config::{ReactTableSettings, DEFAULT_SETTINGS};
use crate::error::{TransformError, TransformResult};
use crate::model::{DimensionLike, Metric, Reference, ResultTable, Scalar};

/// Output consumed by the grid: `columns` then `data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactTableOutput {
    pub columns: Vec<ColumnHeader>,
    pub data: Vec<RowRecord>,
}

impl ReactTableOutput {
    /// Accessors of every leaf header, left to right.
    pub fn leaf_accessors(&self) -> Vec<&str> {
        self.columns.iter().flat_map(ColumnHeader::leaf_accessors).collect()
    }
}

/// Widget configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactTable {
    pub metrics: Vec<Metric>,
    pub pivot: Vec<String>,
    pub transpose: bool,
    pub max_columns: Option<usize>,
    pub settings: ReactTableSettings,
}

impl ReactTable {
    pub fn new(metrics: impl IntoIterator<Item = Metric>) -> Self {
        Self {
            metrics: metrics.into_iter().collect(),
            pivot: Vec::new(),
            transpose: false,
            max_columns: None,
            settings: DEFAULT_SETTINGS.react_table.clone(),
        }
    }

    pub fn pivot<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pivot = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn transpose(mut self, transpose: bool) -> Self {
        self.transpose = transpose;
        self
    }

    pub fn max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = Some(max_columns);
        self
    }

    pub fn with_settings(mut self, settings: ReactTableSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Reshape `table` into grid headers and rows.
    ///
    /// Works on a copy; `table` is left untouched. The only hard failures
    /// are a configuration without metrics and a table lacking one of the
    /// columns the configuration reads.
    #[instrument(skip_all, fields(widget = %self))]
    pub fn transform(
        &self,
        table: &ResultTable,
        dimensions: &[&dyn DimensionLike],
        references: &[Reference],
    ) -> TransformResult<ReactTableOutput> {
        if self.metrics.is_empty() {
            return Err(TransformError::NoMetrics);
        }
        let settings = &self.settings;

        let items = ItemMap::build(&self.metrics, references, &settings.totals_label);
        let selected: Vec<String> = dimensions
            .iter()
            .filter_map(|d| d.display_field())
            .chain(items.column_keys().map(str::to_string))
            .collect();

        let mut working = table.select_columns(&selected[..])?;
        let display_values =
            extract_display_values(&mut working, dimensions, &settings.missing_display_value);
        working.replace_missing(
            &Scalar::from(settings.missing_value.as_str()),
            &Scalar::from(settings.infinite_value.as_str()),
        );
        normalize_table(&mut working, dimensions, &settings.date_formats);

        let mut pivoted = pivot_table(&working, &self.pivot, self.transpose)?;
        if let Some(max_columns) = self.max_columns.or(settings.max_columns) {
            pivoted.truncate_columns(max_columns);
        }
        let collapsed = if settings.collapse_single_metric {
            collapse_single_metric(&mut pivoted)
        } else {
            None
        };
        debug!(
            rows = pivoted.row_count(),
            columns = pivoted.column_count(),
            collapsed = ?collapsed,
            "reshaped result table"
        );

        let labels = MemberLabels::new(&items, &display_values);
        let mut columns = dimension_headers(pivoted.index(), dimensions);
        columns.extend(
            HeaderBuilder::new(labels, &settings.totals_class_name)
                .with_collapsed_metric(collapsed.as_deref())
                .build(pivoted.columns()),
        );
        let data = RowBuilder::new(labels)
            .with_collapsed_metric(collapsed.as_deref())
            .build(&pivoted);

        Ok(ReactTableOutput { columns, data })
    }
}

impl fmt::Display for ReactTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.metrics.iter().map(|m| m.key.as_str()).collect();
        write!(f, "ReactTable({})", keys.join(","))
    }
}

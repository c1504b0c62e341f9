//! Column header trees.
//!
//! Dimension headers describe the row index; metric headers mirror the column
//! index, one group per distinct outer value with a leaf per column. A leaf's
//! accessor is the dotted path rows use to store that column's cell.

use serde::Serialize;

use super::items::MemberLabels;
use super::path::AccessorPath;
use crate::model::{DimensionLike, Index, Level, METRICS_KEY};

/// A node of the header tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnHeader {
    #[serde(rename = "Header")]
    pub header: String,
    #[serde(flatten)]
    pub body: HeaderBody,
    #[serde(rename = "className", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HeaderBody {
    Leaf { accessor: String },
    Group { columns: Vec<ColumnHeader> },
}

impl ColumnHeader {
    pub fn leaf(header: impl Into<String>, accessor: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            body: HeaderBody::Leaf {
                accessor: accessor.into(),
            },
            class_name: None,
        }
    }

    pub fn group(header: impl Into<String>, columns: Vec<ColumnHeader>) -> Self {
        Self {
            header: header.into(),
            body: HeaderBody::Group { columns },
            class_name: None,
        }
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn is_totals(&self) -> bool {
        self.class_name.is_some()
    }

    pub fn accessor(&self) -> Option<&str> {
        match &self.body {
            HeaderBody::Leaf { accessor } => Some(accessor),
            HeaderBody::Group { .. } => None,
        }
    }

    pub fn children(&self) -> &[ColumnHeader] {
        match &self.body {
            HeaderBody::Leaf { .. } => &[],
            HeaderBody::Group { columns } => columns,
        }
    }

    /// Accessors of every leaf under this node, left to right.
    pub fn leaf_accessors(&self) -> Vec<&str> {
        match &self.body {
            HeaderBody::Leaf { accessor } => vec![accessor.as_str()],
            HeaderBody::Group { columns } => {
                columns.iter().flat_map(ColumnHeader::leaf_accessors).collect()
            }
        }
    }
}

/// Headers for the row index levels, outermost first.
///
/// A default (unnamed) row index produces none.
pub fn dimension_headers(index: &Index, dimensions: &[&dyn DimensionLike]) -> Vec<ColumnHeader> {
    index
        .levels()
        .iter()
        .filter_map(|level| match level {
            Level::Unnamed => None,
            Level::Metrics => Some(ColumnHeader::leaf("", METRICS_KEY)),
            Level::Dimension(key) => {
                let header = dimensions
                    .iter()
                    .find(|d| d.key() == *key)
                    .map(|d| d.header())
                    .unwrap_or_else(|| key.clone());
                Some(ColumnHeader::leaf(header, key.clone()))
            }
        })
        .collect()
}

/// Builds the header tree for a column index.
#[derive(Debug, Clone, Copy)]
pub struct HeaderBuilder<'a> {
    labels: MemberLabels<'a>,
    collapsed_metric: Option<&'a str>,
    totals_class_name: &'a str,
}

impl<'a> HeaderBuilder<'a> {
    pub fn new(labels: MemberLabels<'a>, totals_class_name: &'a str) -> Self {
        Self {
            labels,
            collapsed_metric: None,
            totals_class_name,
        }
    }

    /// Append `metric` to every leaf accessor, for a column index whose
    /// metrics level was dropped.
    pub fn with_collapsed_metric(mut self, metric: Option<&'a str>) -> Self {
        self.collapsed_metric = metric;
        self
    }

    pub fn build(&self, columns: &Index) -> Vec<ColumnHeader> {
        if columns.is_empty() {
            return Vec::new();
        }
        self.build_level(columns, &AccessorPath::new())
    }

    fn build_level(&self, columns: &Index, path: &AccessorPath) -> Vec<ColumnHeader> {
        let level = &columns.levels()[0];

        columns
            .group_outer()
            .into_iter()
            .map(|group| {
                let header = self.labels.header(level, &group.value);
                let path = path.child(group.value.to_string());

                let node = match group.rest {
                    Some(rest) => ColumnHeader::group(header, self.build_level(&rest, &path)),
                    None => {
                        let path = match self.collapsed_metric {
                            Some(metric) => path.child(metric),
                            None => path,
                        };
                        ColumnHeader::leaf(header, path.to_accessor())
                    }
                };

                if group.value.is_totals() {
                    node.with_class_name(self.totals_class_name)
                } else {
                    node
                }
            })
            .collect()
    }
}

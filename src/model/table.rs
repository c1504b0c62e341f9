// src/model/table.rs
use serde::Deserialize;

use super::index::{Index, Level};
use super::scalar::Scalar;
use crate::error::{TransformError, TransformResult};

/// A two-dimensional query result: row index, column index and cells.
///
/// Tables are treated as read-only inputs. Every reshaping operation returns
/// a new table (or works on a copy owned by the caller).
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    index: Index,
    columns: Index,
    rows: Vec<Vec<Scalar>>,
}

impl ResultTable {
    pub fn new(index: Index, columns: Index, rows: Vec<Vec<Scalar>>) -> TransformResult<Self> {
        if index.len() != rows.len() {
            return Err(TransformError::RowShape {
                row: index.len().min(rows.len()),
                expected: index.len(),
                actual: rows.len(),
            });
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TransformError::RowShape {
                    row: i,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Self {
            index,
            columns,
            rows,
        })
    }

    pub fn builder() -> ResultTableBuilder {
        ResultTableBuilder::default()
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut Index {
        &mut self.index
    }

    pub fn columns(&self) -> &Index {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut Index {
        &mut self.columns
    }

    pub fn rows(&self) -> &[Vec<Scalar>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate `(index entry, row values)` pairs in table order.
    pub fn iter_rows(&self) -> impl Iterator<Item = (&[Scalar], &[Scalar])> {
        self.index
            .entries()
            .iter()
            .zip(&self.rows)
            .map(|(idx, row)| (idx.as_slice(), row.as_slice()))
    }

    /// Position of the column whose outermost value renders as `key`.
    pub fn column_position(&self, key: &str) -> Option<usize> {
        self.columns
            .entries()
            .iter()
            .position(|entry| entry.first().map(|v| v.to_string()).as_deref() == Some(key))
    }

    /// Values of one column, in row order.
    pub fn column_values(&self, key: &str) -> Option<Vec<&Scalar>> {
        let pos = self.column_position(key)?;
        Some(self.rows.iter().map(|row| &row[pos]).collect())
    }

    /// New table holding only the named columns, in the order given.
    pub fn select_columns<S: AsRef<str>>(&self, keys: &[S]) -> TransformResult<ResultTable> {
        let positions = keys
            .iter()
            .map(|key| {
                self.column_position(key.as_ref())
                    .ok_or_else(|| TransformError::MissingColumn {
                        column: key.as_ref().to_string(),
                    })
            })
            .collect::<TransformResult<Vec<_>>>()?;

        let entries = positions
            .iter()
            .map(|&p| self.columns.entries()[p].clone())
            .collect();
        let columns = Index::new(self.columns.levels().to_vec(), entries)?;
        let rows = self
            .rows
            .iter()
            .map(|row| positions.iter().map(|&p| row[p].clone()).collect())
            .collect();

        Ok(ResultTable {
            index: self.index.clone(),
            columns,
            rows,
        })
    }

    /// Remove a column, returning its values.
    pub fn remove_column(&mut self, key: &str) -> Option<Vec<Scalar>> {
        let pos = self.column_position(key)?;
        let remaining: Vec<usize> = (0..self.columns.len()).filter(|&p| p != pos).collect();
        let entries = remaining
            .iter()
            .map(|&p| self.columns.entries()[p].clone())
            .collect();
        self.columns = Index::new(self.columns.levels().to_vec(), entries).ok()?;
        Some(self.rows.iter_mut().map(|row| row.remove(pos)).collect())
    }

    /// Substitute missing cells and positive/negative infinities.
    pub fn replace_missing(&mut self, missing: &Scalar, infinite: &Scalar) {
        for cell in self.rows.iter_mut().flatten() {
            if cell.is_missing() {
                *cell = missing.clone();
            } else if cell.is_infinite() {
                *cell = infinite.clone();
            }
        }
    }

    /// Keep only the first `n` columns.
    pub fn truncate_columns(&mut self, n: usize) {
        if n >= self.columns.len() {
            return;
        }
        self.columns.truncate(n);
        for row in &mut self.rows {
            row.truncate(n);
        }
    }

    /// Swap the row and column axes.
    pub fn transpose(&self) -> ResultTable {
        let rows = (0..self.columns.len())
            .map(|c| self.rows.iter().map(|row| row[c].clone()).collect())
            .collect();
        ResultTable {
            index: self.columns.clone(),
            columns: self.index.clone(),
            rows,
        }
    }
}

/// Incremental construction of a [`ResultTable`] with one flat column level.
#[derive(Debug, Default)]
pub struct ResultTableBuilder {
    levels: Vec<Level>,
    columns: Vec<String>,
    rows: Vec<(Vec<Scalar>, Vec<Scalar>)>,
}

impl ResultTableBuilder {
    /// Name the row index levels after dimension keys.
    pub fn dimensions<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.levels = keys.into_iter().map(|k| Level::Dimension(k.into())).collect();
        self
    }

    pub fn columns<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Add a row. With no dimensions the index value is ignored.
    pub fn row(mut self, index: Vec<Scalar>, values: Vec<Scalar>) -> Self {
        self.rows.push((index, values));
        self
    }

    pub fn build(self) -> TransformResult<ResultTable> {
        let columns = Index::flat(Level::Unnamed, self.columns.into_iter().map(Scalar::Str));
        let (index_entries, rows): (Vec<_>, Vec<_>) = self.rows.into_iter().unzip();
        let index = if self.levels.is_empty() {
            Index::range(rows.len())
        } else {
            Index::new(self.levels, index_entries)?
        };
        ResultTable::new(index, columns, rows)
    }
}

/// JSON form of a result table.
///
/// ```json
/// {
///   "index": ["region", "month"],
///   "columns": ["sales", "sales_dod"],
///   "rows": [{"index": ["EU", "2024-01-01"], "values": [120, 100]}]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ResultTableDocument {
    #[serde(default)]
    pub index: Vec<String>,
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<RowDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RowDocument {
    #[serde(default)]
    pub index: Vec<Scalar>,
    pub values: Vec<Scalar>,
}

impl ResultTableDocument {
    pub fn into_table(self) -> TransformResult<ResultTable> {
        self.rows
            .into_iter()
            .fold(
                ResultTable::builder()
                    .dimensions(self.index)
                    .columns(self.columns),
                |builder, row| builder.row(row.index, row.values),
            )
            .build()
    }
}

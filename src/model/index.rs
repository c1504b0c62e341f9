//! Hierarchical (multi-level) row and column indexes.
//!
//! A flat index is simply an index with one level, so every operation here
//! works the same regardless of depth. The header builder relies on this to
//! recurse with a single code path.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::scalar::Scalar;
use crate::error::{TransformError, TransformResult};

/// Key of the pseudo-dimension holding metric and reference keys.
pub const METRICS_KEY: &str = "metrics";

/// What an index level holds.
///
/// The metrics level is flagged explicitly rather than recognised by name,
/// so a dimension whose key happens to be `metrics` is still looked up as a
/// dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Values of the dimension with this key.
    Dimension(String),
    /// Metric, reference and totals keys.
    Metrics,
    /// Positional level with no name (a default row index).
    Unnamed,
}

impl Level {
    pub fn dimension(key: impl Into<String>) -> Self {
        Level::Dimension(key.into())
    }

    /// Key used for the level in accessors and display-value lookups.
    pub fn key(&self) -> Option<&str> {
        match self {
            Level::Dimension(key) => Some(key),
            Level::Metrics => Some(METRICS_KEY),
            Level::Unnamed => None,
        }
    }

    pub fn is_metrics(&self) -> bool {
        matches!(self, Level::Metrics)
    }
}

/// One group produced by [`Index::group_outer`].
#[derive(Debug, Clone, PartialEq)]
pub struct IndexGroup {
    /// Value of the outermost level shared by the group.
    pub value: Scalar,
    /// Remaining levels for the group's entries, `None` when the outer level
    /// was the last one.
    pub rest: Option<Index>,
}

/// An ordered index of tuples, one value per level.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    levels: Vec<Level>,
    entries: Vec<Vec<Scalar>>,
}

impl Index {
    /// Build an index, checking every entry has one value per level.
    pub fn new(levels: Vec<Level>, entries: Vec<Vec<Scalar>>) -> TransformResult<Self> {
        if let Some(bad) = entries.iter().find(|e| e.len() != levels.len()) {
            return Err(TransformError::IndexShape {
                expected: levels.len(),
                actual: bad.len(),
            });
        }
        Ok(Self { levels, entries })
    }

    /// A single-level index.
    pub fn flat(level: Level, values: impl IntoIterator<Item = Scalar>) -> Self {
        Self {
            levels: vec![level],
            entries: values.into_iter().map(|v| vec![v]).collect(),
        }
    }

    /// An unnamed positional index `0..len`.
    pub fn range(len: usize) -> Self {
        Self::flat(Level::Unnamed, (0..len).map(|i| Scalar::Int(i as i64)))
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn entries(&self) -> &[Vec<Scalar>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn nlevels(&self) -> usize {
        self.levels.len()
    }

    pub fn is_multi(&self) -> bool {
        self.levels.len() > 1
    }

    /// True when no level carries a name.
    pub fn is_default(&self) -> bool {
        self.levels.iter().all(|l| matches!(l, Level::Unnamed))
    }

    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.levels
            .iter()
            .position(|l| matches!(l, Level::Dimension(k) if k == key))
    }

    pub fn metrics_position(&self) -> Option<usize> {
        self.levels.iter().position(Level::is_metrics)
    }

    pub fn set_level(&mut self, pos: usize, level: Level) {
        if let Some(slot) = self.levels.get_mut(pos) {
            *slot = level;
        }
    }

    /// Distinct values of one level, in order of first appearance.
    pub fn unique_values(&self, pos: usize) -> Vec<Scalar> {
        let mut seen: IndexMap<&Scalar, ()> = IndexMap::new();
        for entry in &self.entries {
            seen.entry(&entry[pos]).or_insert(());
        }
        seen.into_keys().cloned().collect()
    }

    /// Map every value of one level. Does nothing on an empty index.
    pub fn map_level(&mut self, pos: usize, mut f: impl FnMut(&Scalar) -> Scalar) {
        if self.entries.is_empty() || pos >= self.levels.len() {
            return;
        }
        for entry in &mut self.entries {
            entry[pos] = f(&entry[pos]);
        }
    }

    /// Replace missing values at every level with `value`.
    pub fn fill_missing(&mut self, value: &Scalar) {
        for entry in &mut self.entries {
            for v in entry.iter_mut().filter(|v| v.is_missing()) {
                *v = value.clone();
            }
        }
    }

    /// Copy of the index without the level at `pos`.
    pub fn drop_level(&self, pos: usize) -> Index {
        let mut levels = self.levels.clone();
        levels.remove(pos);
        let entries = self
            .entries
            .iter()
            .map(|e| {
                let mut e = e.clone();
                e.remove(pos);
                e
            })
            .collect();
        Index { levels, entries }
    }

    /// Keep only the first `n` entries.
    pub fn truncate(&mut self, n: usize) {
        self.entries.truncate(n);
    }

    /// Group entries by the outermost level, preserving first-appearance order.
    ///
    /// On a flat index every entry is its own group with no remainder; on a
    /// multi-level index entries sharing an outer value are grouped and the
    /// remainder holds their inner levels.
    pub fn group_outer(&self) -> Vec<IndexGroup> {
        if !self.is_multi() {
            return self
                .entries
                .iter()
                .map(|e| IndexGroup {
                    value: e[0].clone(),
                    rest: None,
                })
                .collect();
        }

        let mut groups: IndexMap<&Scalar, Vec<Vec<Scalar>>> = IndexMap::new();
        for entry in &self.entries {
            groups
                .entry(&entry[0])
                .or_default()
                .push(entry[1..].to_vec());
        }

        let inner_levels = self.levels[1..].to_vec();
        groups
            .into_iter()
            .map(|(value, entries)| IndexGroup {
                value: value.clone(),
                rest: Some(Index {
                    levels: inner_levels.clone(),
                    entries,
                }),
            })
            .collect()
    }
}

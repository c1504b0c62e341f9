//! Lookups from index members to labels and formatting.

use indexmap::IndexMap;

use super::display::DisplayValues;
use crate::model::{ItemDescriptor, Level, Metric, Reference, Scalar, TOTALS_VALUE};

/// Descriptors for every key that can appear on the metrics level: each
/// metric, each metric under each reference, and the totals sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemMap {
    items: IndexMap<String, ItemDescriptor>,
}

impl ItemMap {
    /// Metric-major: every metric followed by its references.
    pub fn build(metrics: &[Metric], references: &[Reference], totals_label: &str) -> Self {
        let mut items = IndexMap::new();
        for metric in metrics {
            let plain = std::iter::once(None);
            for reference in plain.chain(references.iter().map(Some)) {
                let item = ItemDescriptor::new(metric, reference);
                items.insert(item.key.clone(), item);
            }
        }
        items.insert(
            TOTALS_VALUE.to_string(),
            ItemDescriptor::totals(TOTALS_VALUE, totals_label),
        );
        Self { items }
    }

    pub fn get(&self, key: &str) -> Option<&ItemDescriptor> {
        self.items.get(key)
    }

    /// Descriptor for a member value (string keys and the totals sentinel).
    pub fn get_value(&self, value: &Scalar) -> Option<&ItemDescriptor> {
        value.as_str().and_then(|key| self.items.get(key))
    }

    /// Result columns the widget reads, in order. Excludes the totals entry.
    pub fn column_keys(&self) -> impl Iterator<Item = &str> {
        self.items
            .keys()
            .map(String::as_str)
            .filter(|k| *k != TOTALS_VALUE)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Resolves what to show for one index member.
#[derive(Debug, Clone, Copy)]
pub struct MemberLabels<'a> {
    pub items: &'a ItemMap,
    pub display_values: &'a DisplayValues,
}

impl<'a> MemberLabels<'a> {
    pub fn new(items: &'a ItemMap, display_values: &'a DisplayValues) -> Self {
        Self {
            items,
            display_values,
        }
    }

    /// Label of a member, if it has one.
    ///
    /// Members of the metrics level and the totals sentinel use their
    /// descriptor label; dimension members use the display-value table.
    pub fn display(&self, level: &Level, value: &Scalar) -> Option<&'a str> {
        if level.is_metrics() || value.is_totals() {
            return self.items.get_value(value).map(|item| item.label.as_str());
        }
        match level {
            Level::Dimension(key) => self.display_values.lookup(key, value),
            _ => None,
        }
    }

    /// Label of a member, falling back to its raw form.
    pub fn header(&self, level: &Level, value: &Scalar) -> String {
        self.display(level, value)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string())
    }
}

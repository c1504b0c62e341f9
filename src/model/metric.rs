// src/model/metric.rs
use serde::{Deserialize, Serialize};

/// A metric descriptor with its display formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
    /// Digits after the decimal point for float values.
    #[serde(default)]
    pub precision: Option<usize>,
}

impl Metric {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: None,
            prefix: None,
            suffix: None,
            precision: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Label, falling back to the key.
    pub fn header(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }
}

/// How a reference is compared with the base metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceDelta {
    /// The metric's value for the reference period.
    #[default]
    None,
    /// Difference from the reference period.
    Absolute,
    /// Percentage change from the reference period.
    Percent,
}

/// A comparison against an alternate period, e.g. day-over-day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub delta: ReferenceDelta,
}

impl Reference {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            delta: ReferenceDelta::None,
        }
    }

    pub fn with_delta(mut self, delta: ReferenceDelta) -> Self {
        self.delta = delta;
        self
    }

    /// Result column key for `metric` under this reference.
    pub fn key_for(&self, metric: &Metric) -> String {
        let suffix = match self.delta {
            ReferenceDelta::None => "",
            ReferenceDelta::Absolute => "_delta",
            ReferenceDelta::Percent => "_delta_percent",
        };
        format!("{}_{}{}", metric.key, self.key, suffix)
    }

    /// Header label for `metric` under this reference.
    pub fn label_for(&self, metric: &Metric) -> String {
        let suffix = match self.delta {
            ReferenceDelta::None => "",
            ReferenceDelta::Absolute => " Δ",
            ReferenceDelta::Percent => " Δ%",
        };
        format!("{} ({}){}", metric.header(), self.label, suffix)
    }
}

/// Label and formatting for one key of the metrics level.
///
/// Built from a metric alone, a metric under a reference, or the totals
/// sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDescriptor {
    pub key: String,
    pub label: String,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub precision: Option<usize>,
}

impl ItemDescriptor {
    pub fn new(metric: &Metric, reference: Option<&Reference>) -> Self {
        let (key, label) = match reference {
            Some(reference) => (reference.key_for(metric), reference.label_for(metric)),
            None => (metric.key.clone(), metric.header().to_string()),
        };
        Self {
            key,
            label,
            prefix: metric.prefix.clone(),
            suffix: metric.suffix.clone(),
            precision: metric.precision,
        }
    }

    /// Descriptor for the totals sentinel: a label and no formatting.
    pub fn totals(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            prefix: None,
            suffix: None,
            precision: None,
        }
    }
}

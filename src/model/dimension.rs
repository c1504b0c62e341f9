// src/model/dimension.rs
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::modifier::{AttrValue, Attributes};

/// How a dimension or filter resolves in the generated query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Definition {
    /// A physical column, e.g. `customers.region`.
    Column(String),
    /// A SQL expression.
    Expr(String),
    /// SQL `NULL`. Grouping on it produces a single aggregated row.
    Null,
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Column(c) => f.write_str(c),
            Definition::Expr(e) => f.write_str(e),
            Definition::Null => f.write_str("NULL"),
        }
    }
}

/// Time grain of a datetime dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annually,
    /// Any grain without its own date format; rendered as daily.
    #[serde(other)]
    Other,
}

/// Capabilities of a dimension consumed by the transform.
///
/// Implemented by [`Dimension`] and by modifiers wrapping a dimension, so
/// the transform accepts either.
pub trait DimensionLike: fmt::Debug {
    fn key(&self) -> String;

    fn label(&self) -> Option<String>;

    fn definition(&self) -> Definition;

    /// Key of the result column carrying display values, if any.
    fn display_field(&self) -> Option<String>;

    /// Set for datetime dimensions.
    fn interval(&self) -> Option<Interval>;

    /// Static raw → display table (categorical dimensions).
    fn display_values(&self) -> Option<IndexMap<String, String>>;

    /// Whether the query adds a totals row for this dimension.
    fn is_rollup(&self) -> bool {
        false
    }

    /// Label, falling back to the key.
    fn header(&self) -> String {
        self.label().unwrap_or_else(|| self.key())
    }
}

/// A dimension descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Defaults to the column named after the key.
    #[serde(default)]
    pub definition: Option<Definition>,
    #[serde(default)]
    pub display_field: Option<String>,
    #[serde(default)]
    pub interval: Option<Interval>,
    #[serde(default)]
    pub display_values: Option<IndexMap<String, String>>,
}

impl Dimension {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            definition: None,
            label: None,
            display_field: None,
            interval: None,
            display_values: None,
        }
    }

    /// A datetime dimension truncated to `interval`.
    pub fn datetime(key: impl Into<String>, interval: Interval) -> Self {
        Self::new(key).with_interval(interval)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_definition(mut self, definition: Definition) -> Self {
        self.definition = Some(definition);
        self
    }

    pub fn with_display_field(mut self, field: impl Into<String>) -> Self {
        self.display_field = Some(field.into());
        self
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn with_display_values<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.display_values = Some(
            values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }
}

impl DimensionLike for Dimension {
    fn key(&self) -> String {
        self.key.clone()
    }

    fn label(&self) -> Option<String> {
        self.label.clone()
    }

    fn definition(&self) -> Definition {
        self.definition
            .clone()
            .unwrap_or_else(|| Definition::Column(self.key.clone()))
    }

    fn display_field(&self) -> Option<String> {
        self.display_field.clone()
    }

    fn interval(&self) -> Option<Interval> {
        self.interval
    }

    fn display_values(&self) -> Option<IndexMap<String, String>> {
        self.display_values.clone()
    }
}

fn opt_string(value: &Option<String>) -> AttrValue {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

fn to_opt_string(value: AttrValue) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

impl Attributes for Dimension {
    fn get_attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "key" => Some(Value::String(self.key.clone())),
            "label" => Some(opt_string(&self.label)),
            "definition" => serde_json::to_value(DimensionLike::definition(self)).ok(),
            "display_field" => Some(opt_string(&self.display_field)),
            "interval" => Some(
                self.interval
                    .and_then(|i| serde_json::to_value(i).ok())
                    .unwrap_or(Value::Null),
            ),
            "display_values" => serde_json::to_value(&self.display_values).ok(),
            _ => None,
        }
    }

    fn set_attr(&mut self, name: &str, value: AttrValue) -> Result<(), AttrValue> {
        match name {
            "key" => self.key = to_opt_string(value).unwrap_or_default(),
            "label" => self.label = to_opt_string(value),
            "display_field" => self.display_field = to_opt_string(value),
            "definition" => {
                self.definition = match serde_json::from_value(value.clone()) {
                    Ok(definition) => Some(definition),
                    Err(_) => return Err(value),
                }
            }
            "interval" => {
                self.interval = match serde_json::from_value(value.clone()) {
                    Ok(interval) => interval,
                    Err(_) => return Err(value),
                }
            }
            "display_values" => {
                self.display_values = match serde_json::from_value(value.clone()) {
                    Ok(values) => values,
                    Err(_) => return Err(value),
                }
            }
            _ => return Err(value),
        }
        Ok(())
    }
}

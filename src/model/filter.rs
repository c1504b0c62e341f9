// src/model/filter.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::dimension::Definition;
use crate::modifier::{AttrValue, Attributes};

/// Capabilities of a query filter.
pub trait FilterLike: fmt::Debug {
    fn key(&self) -> String;

    fn definition(&self) -> Definition;

    /// Whether the auxiliary rollup query should leave this filter out.
    fn is_excluded_from_rollup(&self) -> bool {
        false
    }
}

/// A filter on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub key: String,
    pub definition: Definition,
}

impl Filter {
    pub fn new(key: impl Into<String>, definition: Definition) -> Self {
        Self {
            key: key.into(),
            definition,
        }
    }
}

impl FilterLike for Filter {
    fn key(&self) -> String {
        self.key.clone()
    }

    fn definition(&self) -> Definition {
        self.definition.clone()
    }
}

impl Attributes for Filter {
    fn get_attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            "key" => Some(Value::String(self.key.clone())),
            "definition" => serde_json::to_value(&self.definition).ok(),
            _ => None,
        }
    }

    fn set_attr(&mut self, name: &str, value: AttrValue) -> Result<(), AttrValue> {
        match name {
            "key" => match value {
                Value::String(s) => self.key = s,
                other => return Err(other),
            },
            "definition" => match serde_json::from_value(value.clone()) {
                Ok(definition) => self.definition = definition,
                Err(_) => return Err(value),
            },
            _ => return Err(value),
        }
        Ok(())
    }
}

/// Filters that still apply to the auxiliary rollup query.
pub fn filters_for_rollup<'a>(filters: &[&'a dyn FilterLike]) -> Vec<&'a dyn FilterLike> {
    filters
        .iter()
        .copied()
        .filter(|f| !f.is_excluded_from_rollup())
        .collect()
}

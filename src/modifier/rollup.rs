// src/modifier/rollup.rs
use super::{AttrValue, Modifier, ModifierKind};
use crate::model::Definition;

/// Marks a dimension for a totals row.
pub struct RollupKind;

impl ModifierKind for RollupKind {
    const NAME: &'static str = "Rollup";
    const WRAPPED_KEY: &'static str = "dimension";

    fn attr_override(name: &str) -> Option<AttrValue> {
        match name {
            "definition" => serde_json::to_value(Definition::Null).ok(),
            _ => None,
        }
    }

    // Grouping on NULL collapses every row of the dimension into one.
    fn definition(_wrapped: Definition) -> Definition {
        Definition::Null
    }

    fn is_rollup(_wrapped: bool) -> bool {
        true
    }
}

/// Tags a filter to be left out of the auxiliary rollup query.
pub struct OmitFromRollupKind;

impl ModifierKind for OmitFromRollupKind {
    const NAME: &'static str = "OmitFromRollup";
    const WRAPPED_KEY: &'static str = "filter";

    fn is_excluded_from_rollup(_wrapped: bool) -> bool {
        true
    }
}

/// A dimension whose query definition resolves to `NULL`.
pub type Rollup<D> = Modifier<RollupKind, D>;

/// A filter excluded from the rollup query.
pub type OmitFromRollup<F> = Modifier<OmitFromRollupKind, F>;

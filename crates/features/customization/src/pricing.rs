//! # Pricing Aggregator
//!
//! `total = base price + Σ modifiers` of the options chosen in currently visible groups,
//! floored at zero. Visibility is recomputed here and never taken from the mutator, so a
//! hand-built state holding stale answers still prices correctly.

use crate::schema::Schema;
use crate::selection::{SelectionState, SelectionValue};
use crate::visibility::resolve_visibility;
use bindery_kernel::domain::catalog::GroupKind;
use bindery_kernel::domain::money::Money;
use serde::{Deserialize, Serialize};

/// One priced option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLine {
    pub group: String,
    pub option: String,
    pub modifier: Money,
}

/// How a total was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base: Money,
    /// Contributing options in product order (options in name order within a group).
    pub lines: Vec<PriceLine>,
    /// Base plus every modifier, possibly negative.
    pub subtotal: Money,
    /// The subtotal floored at zero.
    pub total: Money,
}

/// Total price of the product under `selections`.
#[must_use]
pub fn compute_total(schema: &Schema, selections: &SelectionState) -> Money {
    price_breakdown(schema, selections).total
}

/// Itemized price of the product under `selections`.
#[must_use]
pub fn price_breakdown(schema: &Schema, selections: &SelectionState) -> PriceBreakdown {
    let product = schema.product();
    let visibility = resolve_visibility(schema.graph(), selections);

    let mut lines = Vec::new();
    for index in visibility.indices() {
        let group = schema.group_at(index);
        let chosen: Vec<&str> = match (&group.kind, selections.get(&group.name)) {
            (GroupKind::SingleSelect { .. }, SelectionValue::SingleChoice(name)) => vec![name.as_str()],
            (GroupKind::MultiSelect { .. }, SelectionValue::MultiChoice(names)) => {
                names.iter().map(String::as_str).collect()
            },
            // A value of the wrong shape (only possible in a hand-built state) prices nothing.
            (GroupKind::SingleSelect { .. } | GroupKind::MultiSelect { .. }, _)
            | (GroupKind::FreeText { .. }, _) => continue,
        };

        lines.extend(chosen.into_iter().filter_map(|name| group.option(name)).map(|option| {
            PriceLine {
                group: group.name.clone(),
                option: option.name.clone(),
                modifier: option.price_modifier,
            }
        }));
    }

    let subtotal = product.base_price + lines.iter().map(|line| line.modifier).sum::<Money>();

    PriceBreakdown { base: product.base_price, lines, subtotal, total: subtotal.floor_zero() }
}

//! # Checkout Validator
//!
//! Before a configuration can become a cart line, every visible select group needs an
//! answer, and so does every visible free-text group flagged `required` (unless its default
//! text already answers it). A configuration that passes is frozen into a value that no
//! later catalog edit can alter.

use crate::error::CheckoutError;
use crate::pricing::{PriceBreakdown, price_breakdown};
use crate::schema::Schema;
use crate::selection::{SelectionState, SelectionValue};
use crate::visibility::resolve_visibility;
use bindery_kernel::domain::catalog::{Group, GroupKind, Product};
use bindery_kernel::domain::money::Money;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

/// Confirms every visible group that requires an answer has one.
///
/// # Errors
/// Every unanswered group, in topological order.
pub fn validate_for_checkout(
    schema: &Schema,
    selections: &SelectionState,
) -> Result<(), Vec<CheckoutError>> {
    let visibility = resolve_visibility(schema.graph(), selections);

    let missing: Vec<CheckoutError> = schema
        .graph()
        .order()
        .iter()
        .filter(|&&index| visibility.is_visible_at(index))
        .map(|&index| schema.group_at(index))
        .filter(|group| !is_answered(group, selections.get(&group.name)))
        .map(|group| CheckoutError::MissingSelection {
            group: group.name.clone(),
            kind: group.kind_tag(),
        })
        .collect();

    if missing.is_empty() { Ok(()) } else { Err(missing) }
}

fn is_answered(group: &Group, value: &SelectionValue) -> bool {
    match &group.kind {
        GroupKind::SingleSelect { .. } => matches!(value, SelectionValue::SingleChoice(_)),
        GroupKind::MultiSelect { .. } => {
            matches!(value, SelectionValue::MultiChoice(chosen) if !chosen.is_empty())
        },
        GroupKind::FreeText { required: false, .. } => true,
        GroupKind::FreeText { required: true, default_text } => match value {
            SelectionValue::Text(text) => !text.trim().is_empty(),
            _ => !default_text.trim().is_empty(),
        },
    }
}

/// An immutable, checkout-valid configuration.
///
/// Holds its own copy of the product definition, so re-pricing or re-rendering a placed
/// order never depends on the live catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrozenConfiguration {
    product: Arc<Product>,
    selections: SelectionState,
    price: PriceBreakdown,
}

impl FrozenConfiguration {
    #[must_use]
    pub fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub const fn selections(&self) -> &SelectionState {
        &self.selections
    }

    #[must_use]
    pub const fn price(&self) -> &PriceBreakdown {
        &self.price
    }

    /// Unit price of the configured product.
    #[must_use]
    pub const fn total(&self) -> Money {
        self.price.total
    }
}

/// Validates `selections` and freezes them into a [`FrozenConfiguration`].
///
/// Required free-text groups answered only by their default text get that text recorded
/// explicitly, so the snapshot reads the same after the default is edited. Answers held by
/// hidden groups are not carried into the snapshot.
///
/// # Errors
/// The same list [`validate_for_checkout`] reports.
pub fn freeze(
    schema: &Schema,
    selections: &SelectionState,
) -> Result<FrozenConfiguration, Vec<CheckoutError>> {
    validate_for_checkout(schema, selections)?;

    // Only visible groups are carried over; stale answers in a hand-built state stay behind.
    let visibility = resolve_visibility(schema.graph(), selections);
    let frozen: SelectionState = visibility
        .indices()
        .map(|index| schema.group_at(index))
        .map(|group| {
            let value = match (&group.kind, selections.get(&group.name)) {
                (GroupKind::FreeText { required: true, default_text }, SelectionValue::Empty) => {
                    SelectionValue::text(default_text.clone())
                },
                (_, value) => value.clone(),
            };
            (group.name.as_str(), value)
        })
        .collect();

    let price = price_breakdown(schema, &frozen);
    debug!(answers = frozen.len(), total = %price.total, "Configuration frozen");

    Ok(FrozenConfiguration { product: schema.product_arc(), selections: frozen, price })
}

/// A frozen configuration placed in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub configuration: FrozenConfiguration,
    pub quantity: NonZeroU32,
}

impl CartLine {
    #[must_use]
    pub const fn new(configuration: FrozenConfiguration, quantity: NonZeroU32) -> Self {
        Self { configuration, quantity }
    }

    #[must_use]
    pub const fn unit_price(&self) -> Money {
        self.configuration.total()
    }

    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price().saturating_mul(i64::from(self.quantity.get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate_schema;
    use bindery_kernel::domain::catalog::{Dependency, GroupId, KindTag, OptionId, ProductOption};

    fn schema(default_text: &str) -> Schema {
        let options = ["Dotted", "Lined"]
            .iter()
            .map(|o| ProductOption::new(OptionId::new(*o), *o, Money::new(25)))
            .collect();
        let paper = Group::new(GroupId::new("g1"), "Paper", GroupKind::SingleSelect { options });
        let mut dedication = Group::new(
            GroupId::new("g2"),
            "Dedication",
            GroupKind::FreeText { default_text: default_text.to_owned(), required: true },
        );
        dedication.depends_on = Some(Dependency::new("Paper", "Lined"));
        let note = Group::new(
            GroupId::new("g3"),
            "Note",
            GroupKind::FreeText { default_text: String::new(), required: false },
        );

        validate_schema(Product { base_price: Money::new(500), groups: vec![paper, dedication, note] })
            .expect("valid")
    }

    #[test]
    fn unanswered_select_is_missing_and_optional_text_is_not() {
        let errors = validate_for_checkout(&schema(""), &SelectionState::new()).expect_err("missing");
        assert_eq!(
            errors,
            [CheckoutError::MissingSelection { group: "Paper".into(), kind: KindTag::SingleSelect }]
        );
    }

    #[test]
    fn required_text_needs_a_non_blank_answer() {
        let schema = schema("");
        let state = SelectionState::new()
            .with("Paper", SelectionValue::single("Lined"))
            .with("Dedication", SelectionValue::text("   "));

        let errors = validate_for_checkout(&schema, &state).expect_err("blank");
        assert_eq!(errors[0].group(), "Dedication");

        let state = state.with("Dedication", SelectionValue::text("For Ada"));
        assert!(validate_for_checkout(&schema, &state).is_ok());
    }

    #[test]
    fn default_text_answers_required_text_and_is_frozen() {
        let schema = schema("Happy birthday");
        let state = SelectionState::new().with("Paper", SelectionValue::single("Lined"));

        let frozen = freeze(&schema, &state).expect("valid");
        assert_eq!(frozen.selections().get("Dedication"), &SelectionValue::text("Happy birthday"));
        assert_eq!(frozen.total(), Money::new(525));
    }

    #[test]
    fn cart_line_multiplies_unit_price() {
        let schema = schema("");
        let state = SelectionState::new().with("Paper", SelectionValue::single("Dotted"));
        let frozen = freeze(&schema, &state).expect("valid");
        let line = CartLine::new(frozen, NonZeroU32::new(3).expect("non-zero"));

        assert_eq!(line.unit_price(), Money::new(525));
        assert_eq!(line.line_total(), Money::new(1575));
    }

    #[test]
    fn frozen_configuration_survives_json() {
        let schema = schema("");
        let state = SelectionState::new().with("Paper", SelectionValue::single("Dotted"));
        let frozen = freeze(&schema, &state).expect("valid");

        let json = serde_json::to_string(&frozen).expect("serialize");
        let back: FrozenConfiguration = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, frozen);
    }

    #[test]
    fn hidden_answers_stay_out_of_the_snapshot() {
        let schema = schema("Happy birthday");
        let state = SelectionState::new()
            .with("Paper", SelectionValue::single("Dotted"))
            .with("Dedication", SelectionValue::text("left over"))
            .with("Cover", SelectionValue::single("Hard"));

        let frozen = freeze(&schema, &state).expect("valid");
        assert!(frozen.selections().get("Dedication").is_empty());
        assert!(frozen.selections().get("Cover").is_empty());
        assert_eq!(frozen.selections().len(), 1);
        assert_eq!(frozen.total(), Money::new(525));
    }

    #[test]
    fn a_value_of_the_wrong_shape_does_not_answer_a_select() {
        let state = SelectionState::new().with("Paper", SelectionValue::multi(["Dotted"]));
        let errors = validate_for_checkout(&schema(""), &state).expect_err("wrong shape");
        assert_eq!(errors[0].group(), "Paper");
    }
}

//! # Selection Mutator
//!
//! A [`SelectionState`] is an immutable snapshot of a shopper's answers. Applying a choice
//! never edits a snapshot in place; it produces a new one in which:
//!
//! 1. the value fits the kind of its group,
//! 2. every other group of the same exclusivity family has been cleared, and
//! 3. every group that is no longer visible has been cleared, cascading through
//!    grandchildren in the same topological pass.
//!
//! A rejected choice leaves the prior snapshot untouched.

use crate::error::SelectionError;
use crate::schema::Schema;
use crate::visibility::resolve_visibility;
use bindery_kernel::domain::catalog::{Group, GroupKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// A shopper's answer to one group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionValue {
    SingleChoice(String),
    MultiChoice(BTreeSet<String>),
    Text(String),
    #[default]
    Empty,
}

static EMPTY: SelectionValue = SelectionValue::Empty;

impl SelectionValue {
    #[must_use]
    pub fn single(option: impl Into<String>) -> Self {
        Self::SingleChoice(option.into())
    }

    #[must_use]
    pub fn multi<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MultiChoice(options.into_iter().map(Into::into).collect()).normalized()
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into()).normalized()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// False for `Empty` and for the shapes that normalize to it.
    #[must_use]
    pub fn has_answer(&self) -> bool {
        match self {
            Self::SingleChoice(_) => true,
            Self::MultiChoice(chosen) => !chosen.is_empty(),
            Self::Text(text) => !text.is_empty(),
            Self::Empty => false,
        }
    }

    /// True when this value is, or contains, the named option.
    #[must_use]
    pub fn contains_option(&self, option: &str) -> bool {
        match self {
            Self::SingleChoice(chosen) => chosen == option,
            Self::MultiChoice(chosen) => chosen.contains(option),
            Self::Text(_) | Self::Empty => false,
        }
    }

    /// Chosen option names; empty for text.
    pub fn options(&self) -> impl Iterator<Item = &str> {
        let (single, multi) = match self {
            Self::SingleChoice(chosen) => (Some(chosen.as_str()), None),
            Self::MultiChoice(chosen) => (None, Some(chosen.iter().map(String::as_str))),
            Self::Text(_) | Self::Empty => (None, None),
        };
        single.into_iter().chain(multi.into_iter().flatten())
    }

    /// Short name of the value's shape, used in error reports.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::SingleChoice(_) => "single-choice",
            Self::MultiChoice(_) => "multi-choice",
            Self::Text(_) => "text",
            Self::Empty => "empty",
        }
    }

    /// Empty sets and empty strings carry no answer.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::MultiChoice(ref chosen) if chosen.is_empty() => Self::Empty,
            Self::Text(ref text) if text.is_empty() => Self::Empty,
            other => other,
        }
    }
}

/// Immutable mapping from group name to [`SelectionValue`].
///
/// `Empty` values are never stored, so two states holding the same answers are equal no
/// matter how they were reached. Clones share the underlying map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, SelectionValue>", into = "BTreeMap<String, SelectionValue>")]
pub struct SelectionState {
    values: Arc<BTreeMap<String, SelectionValue>>,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `group`, [`SelectionValue::Empty`] when unanswered.
    #[must_use]
    pub fn get(&self, group: &str) -> &SelectionValue {
        self.values.get(group).unwrap_or(&EMPTY)
    }

    /// Returns a new state with `group` set to `value`, without any validation or cascade.
    ///
    /// Meant for building fixtures and restoring snapshots; shopper input goes through
    /// [`set_selection`].
    #[must_use]
    pub fn with(&self, group: impl Into<String>, value: SelectionValue) -> Self {
        let mut values = (*self.values).clone();
        let group = group.into();
        match value.normalized() {
            SelectionValue::Empty => values.remove(&group),
            value => values.insert(group, value),
        };
        Self { values: Arc::new(values) }
    }

    /// Answered groups in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SelectionValue)> {
        self.values.iter().map(|(group, value)| (group.as_str(), value))
    }

    /// Number of answered groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<BTreeMap<String, SelectionValue>> for SelectionState {
    fn from(mut values: BTreeMap<String, SelectionValue>) -> Self {
        values.retain(|_, value| value.has_answer());
        Self { values: Arc::new(values) }
    }
}

impl From<SelectionState> for BTreeMap<String, SelectionValue> {
    fn from(state: SelectionState) -> Self {
        Arc::unwrap_or_clone(state.values)
    }
}

impl<K: Into<String>> FromIterator<(K, SelectionValue)> for SelectionState {
    fn from_iter<T: IntoIterator<Item = (K, SelectionValue)>>(iter: T) -> Self {
        iter.into_iter().map(|(group, value)| (group.into(), value)).collect::<BTreeMap<_, _>>().into()
    }
}

/// The result of an accepted choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub state: SelectionState,
    /// Groups that lost their answer as a side effect, in topological order.
    pub cleared: Vec<String>,
}

/// Applies one shopper choice and returns the resulting snapshot.
///
/// # Errors
/// * [`SelectionError::UnknownGroup`] if `group` is not part of the product.
/// * [`SelectionError::KindMismatch`] if the value's shape does not fit the group kind.
/// * [`SelectionError::UnknownOption`] if a chosen option does not exist in the group.
/// * [`SelectionError::HiddenGroup`] if the group is not visible in `state`.
pub fn set_selection(
    schema: &Schema,
    state: &SelectionState,
    group: &str,
    value: SelectionValue,
) -> Result<SelectionState, SelectionError> {
    apply_selection(schema, state, group, value).map(|change| change.state)
}

/// Like [`set_selection`], also reporting which groups were cleared as a consequence.
///
/// # Errors
/// See [`set_selection`].
pub fn apply_selection(
    schema: &Schema,
    state: &SelectionState,
    group: &str,
    value: SelectionValue,
) -> Result<SelectionChange, SelectionError> {
    let Some((target, definition)) = schema.group(group) else {
        return Err(SelectionError::UnknownGroup { group: group.to_owned() });
    };
    let value = value.normalized();
    check_value(definition, &value)?;

    let graph = schema.graph();
    if !resolve_visibility(graph, state).is_visible_at(target) {
        return Err(SelectionError::HiddenGroup { group: group.to_owned() });
    }

    let mut values = (*state.values).clone();
    let mut cleared = Vec::new();
    let answered = !value.is_empty();

    match value {
        SelectionValue::Empty => values.remove(group),
        value => values.insert(group.to_owned(), value),
    };

    // Siblings go first so their dependents are swept up by the visibility pass below.
    if let Some(family) = definition.family().filter(|_| answered) {
        for &index in graph.order() {
            let sibling = schema.group_at(index);
            if index != target
                && sibling.family() == Some(family)
                && values.remove(&sibling.name).is_some()
            {
                cleared.push(sibling.name.clone());
            }
        }
    }

    let tentative = SelectionState { values: Arc::new(values) };
    let visibility = resolve_visibility(graph, &tentative);
    let hidden: Vec<&str> = graph
        .order()
        .iter()
        .filter(|&&index| !visibility.is_visible_at(index))
        .map(|&index| graph.name(index))
        .filter(|name| !tentative.get(name).is_empty())
        .collect();

    let state = if hidden.is_empty() {
        tentative
    } else {
        let mut values = (*tentative.values).clone();
        for name in hidden {
            values.remove(name);
            cleared.push(name.to_owned());
        }
        SelectionState { values: Arc::new(values) }
    };

    debug!(group, cleared = cleared.len(), "Selection applied");

    Ok(SelectionChange { state, cleared })
}

fn check_value(group: &Group, value: &SelectionValue) -> Result<(), SelectionError> {
    let fits = match (&group.kind, value) {
        (_, SelectionValue::Empty)
        | (GroupKind::SingleSelect { .. }, SelectionValue::SingleChoice(_))
        | (GroupKind::MultiSelect { .. }, SelectionValue::MultiChoice(_))
        | (GroupKind::FreeText { .. }, SelectionValue::Text(_)) => true,
        _ => false,
    };
    if !fits {
        return Err(SelectionError::KindMismatch {
            group: group.name.clone(),
            expected: group.kind_tag(),
            found: value.shape(),
        });
    }

    match value.options().find(|option| group.option(option).is_none()) {
        Some(option) => Err(SelectionError::UnknownOption {
            group: group.name.clone(),
            option: option.to_owned(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate_schema;
    use bindery_kernel::domain::catalog::{
        Dependency, GroupId, OptionId, Product, ProductOption,
    };
    use bindery_kernel::domain::money::Money;

    fn options(names: &[&str]) -> Vec<ProductOption> {
        names.iter().map(|o| ProductOption::new(OptionId::new(*o), *o, Money::ZERO)).collect()
    }

    fn schema() -> Schema {
        let cover =
            Group::new(GroupId::new("g1"), "Cover", GroupKind::SingleSelect { options: options(&["Hard", "Soft"]) });
        let mut texture =
            Group::new(GroupId::new("g2"), "Texture", GroupKind::SingleSelect { options: options(&["Matte", "Gloss"]) });
        texture.depends_on = Some(Dependency::new("Cover", "Hard"));
        let mut finish =
            Group::new(GroupId::new("g3"), "Finish", GroupKind::MultiSelect { options: options(&["Foil", "Emboss"]) });
        finish.depends_on = Some(Dependency::new("Texture", "Gloss"));
        let mut engraving = Group::new(
            GroupId::new("g4"),
            "Engraving",
            GroupKind::FreeText { default_text: String::new(), required: false },
        );
        engraving.exclusivity_family = Some("personalization".into());
        let mut stamp =
            Group::new(GroupId::new("g5"), "Stamp", GroupKind::SingleSelect { options: options(&["Gold"]) });
        stamp.exclusivity_family = Some("personalization".into());

        validate_schema(Product {
            base_price: Money::new(1000),
            groups: vec![cover, texture, finish, engraving, stamp],
        })
        .expect("valid schema")
    }

    #[test]
    fn empty_values_normalize() {
        assert_eq!(SelectionValue::multi(Vec::<String>::new()), SelectionValue::Empty);
        assert_eq!(SelectionValue::text(""), SelectionValue::Empty);
        assert_eq!(SelectionState::new().with("a", SelectionValue::text("")), SelectionState::new());
    }

    #[test]
    fn wrong_shapes_are_rejected() {
        let schema = schema();
        let state = SelectionState::new();

        let err = set_selection(&schema, &state, "Cover", SelectionValue::text("Hard")).expect_err("mismatch");
        assert_eq!(err.code(), "kind_mismatch");

        let err = set_selection(&schema, &state, "Cover", SelectionValue::single("Spiral")).expect_err("unknown");
        assert_eq!(err, SelectionError::UnknownOption { group: "Cover".into(), option: "Spiral".into() });

        let err = set_selection(&schema, &state, "Nope", SelectionValue::Empty).expect_err("unknown group");
        assert_eq!(err.group(), "Nope");
    }

    #[test]
    fn hidden_groups_cannot_be_answered() {
        let schema = schema();
        let err = set_selection(&schema, &SelectionState::new(), "Texture", SelectionValue::single("Matte"))
            .expect_err("hidden");
        assert_eq!(err, SelectionError::HiddenGroup { group: "Texture".into() });
    }

    #[test]
    fn clearing_a_root_cascades_through_grandchildren() {
        let schema = schema();
        let mut state = SelectionState::new();
        for (group, value) in [
            ("Cover", SelectionValue::single("Hard")),
            ("Texture", SelectionValue::single("Gloss")),
            ("Finish", SelectionValue::multi(["Foil"])),
        ] {
            state = set_selection(&schema, &state, group, value).expect("accepted");
        }
        assert_eq!(state.len(), 3);

        let change = apply_selection(&schema, &state, "Cover", SelectionValue::single("Soft")).expect("accepted");
        assert_eq!(change.cleared, ["Texture", "Finish"]);
        assert_eq!(change.state.get("Texture"), &SelectionValue::Empty);
        assert_eq!(change.state.get("Finish"), &SelectionValue::Empty);
        assert_eq!(state.len(), 3, "prior snapshot is untouched");
    }

    #[test]
    fn answering_one_family_member_clears_the_other() {
        let schema = schema();
        let state = set_selection(&schema, &SelectionState::new(), "Engraving", SelectionValue::text("Ada"))
            .expect("accepted");
        let change = apply_selection(&schema, &state, "Stamp", SelectionValue::single("Gold")).expect("accepted");

        assert_eq!(change.cleared, ["Engraving"]);
        assert!(change.state.get("Engraving").is_empty());

        // Clearing a family member leaves the others alone.
        let state = set_selection(&schema, &change.state, "Engraving", SelectionValue::Empty).expect("accepted");
        assert_eq!(state.get("Stamp"), &SelectionValue::single("Gold"));
    }

    #[test]
    fn state_round_trips_through_json_without_empty_entries() {
        let raw = serde_json::json!({
            "Cover": { "singleChoice": "Hard" },
            "Finish": { "multiChoice": [] },
            "Engraving": "empty"
        });
        let state: SelectionState = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(state.len(), 1);
        assert_eq!(state.get("Cover"), &SelectionValue::single("Hard"));
    }
}

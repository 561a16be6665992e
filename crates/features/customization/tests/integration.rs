mod fixtures;

use bindery_customization::prelude::*;
use bindery_customization::{CheckoutError, apply_selection};
use bindery_kernel::domain::catalog::{KindTag, Product};
use bindery_kernel::domain::money::Money;
use std::num::NonZeroU32;

fn visible(schema: &Schema, state: &SelectionState) -> Vec<String> {
    resolve_visibility(schema.graph(), state).to_names()
}

#[test]
fn cover_change_cascades_and_reprices() {
    let schema = fixtures::notebook();
    let state = SelectionState::new();
    assert_eq!(visible(&schema, &state), ["Tipo de Tapa"]);
    assert_eq!(compute_total(&schema, &state), Money::new(1000));

    let state = set_selection(&schema, &state, "Tipo de Tapa", SelectionValue::single("Tapa Dura"))
        .expect("hard cover");
    assert_eq!(visible(&schema, &state), ["Tipo de Tapa", "Textura"]);
    assert_eq!(compute_total(&schema, &state), Money::new(1000));
    assert_eq!(
        validate_for_checkout(&schema, &state),
        Err(vec![CheckoutError::MissingSelection {
            group: "Textura".into(),
            kind: KindTag::SingleSelect
        }])
    );

    let state = set_selection(&schema, &state, "Textura", SelectionValue::single("Brillo"))
        .expect("gloss");
    assert_eq!(compute_total(&schema, &state), Money::new(1020));
    assert!(validate_for_checkout(&schema, &state).is_ok());

    let change =
        apply_selection(&schema, &state, "Tipo de Tapa", SelectionValue::single("Tapa Flexible"))
            .expect("soft cover");
    assert_eq!(change.cleared, ["Textura"]);
    assert_eq!(visible(&schema, &change.state), ["Tipo de Tapa"]);
    assert!(change.state.get("Textura").is_empty());
    assert_eq!(compute_total(&schema, &change.state), Money::new(950));
    assert!(validate_for_checkout(&schema, &change.state).is_ok());
}

#[test]
fn catalog_json_feeds_the_whole_pipeline() {
    let product: Product = serde_json::from_str(include_str!("fixtures/planner.json"))
        .expect("planner json");
    let schema = validate_schema(product).expect("valid planner");

    let mut session = Configurator::new(schema);
    session.select("Size", SelectionValue::single("A4")).expect("size");
    session.select("Cover", SelectionValue::single("Leather")).expect("cover");
    session.select("Strap", SelectionValue::single("Tan")).expect("strap");
    assert_eq!(
        session.validate().expect_err("monogram and extras unanswered").len(),
        2,
        "spine label is answered by its default text"
    );

    session.select("Monogram", SelectionValue::single("Serif")).expect("monogram");
    session.select("Extras", SelectionValue::multi(["Pocket"])).expect("extras");

    let breakdown = session.breakdown();
    assert_eq!(breakdown.total, Money::new(1000 + 300 + 400 + 15 + 60 + 150));
    assert_eq!(
        breakdown.lines.iter().map(|l| l.option.as_str()).collect::<Vec<_>>(),
        ["A4", "Leather", "Tan", "Serif", "Pocket"]
    );

    let frozen = session.freeze().expect("checkout passes");
    assert_eq!(frozen.selections().get("Spine label"), &SelectionValue::text("Planner"));
    let line = CartLine::new(frozen, NonZeroU32::new(2).expect("non-zero"));
    assert_eq!(line.line_total(), Money::new(3850));
}

#[test]
fn frozen_line_ignores_later_catalog_edits() {
    let schema = fixtures::notebook();
    let mut session = Configurator::new(schema.clone());
    session.select("Tipo de Tapa", SelectionValue::single("Tapa Flexible")).expect("soft");
    let frozen = session.freeze().expect("valid");

    let draft = ProductDraft::from(schema.product().clone());
    let cover = &schema.product().groups[0];
    let repriced = draft
        .set_price(&cover.id, &cover.options()[1].id, Money::new(-500))
        .expect("reprice")
        .finish()
        .expect("still valid");

    assert_eq!(compute_total(&repriced, session.state()), Money::new(500));
    assert_eq!(frozen.total(), Money::new(950));
    assert_eq!(frozen.product().groups[0].options()[1].price_modifier, Money::new(-50));
}

#[test]
fn session_undo_walks_back_through_effective_choices() {
    let mut session = Configurator::new(fixtures::notebook());
    session.select("Tipo de Tapa", SelectionValue::single("Tapa Dura")).expect("hard");
    session.select("Textura", SelectionValue::single("Mate")).expect("matte");
    // Repeating a choice is not a new step.
    session.select("Textura", SelectionValue::single("Mate")).expect("matte again");
    // Rejected choices leave history alone.
    session.select("Textura", SelectionValue::single("Chrome")).expect_err("unknown option");

    assert!(session.undo());
    assert_eq!(session.state().get("Textura"), &SelectionValue::Empty);
    assert!(session.undo());
    assert!(session.state().is_empty());
    assert!(!session.undo());
}

#[test]
fn session_reset_is_undoable() {
    let mut session = Configurator::new(fixtures::notebook());
    session.select("Tipo de Tapa", SelectionValue::single("Tapa Dura")).expect("hard");
    session.reset();
    assert!(session.state().is_empty());
    assert_eq!(session.total(), Money::new(1000));

    assert!(session.undo());
    assert_eq!(session.state().get("Tipo de Tapa"), &SelectionValue::single("Tapa Dura"));
}

#[test]
fn family_clear_cascades_into_dependents_of_the_cleared_member() {
    use fixtures::{depends, family, single};

    let schema = validate_schema(Product {
        base_price: Money::new(100),
        groups: vec![
            family(single("Sticker", &[("Star", 10)]), "decoration"),
            depends(single("Sticker color", &[("Red", 5)]), "Sticker", "Star"),
            family(single("Stamp", &[("Seal", 30)]), "decoration"),
        ],
    })
    .expect("valid");

    let mut state = SelectionState::new();
    for (group, value) in [("Sticker", "Star"), ("Sticker color", "Red"), ("Stamp", "Seal")] {
        state = set_selection(&schema, &state, group, SelectionValue::single(value)).expect(group);
    }

    assert_eq!(state.iter().map(|(g, _)| g).collect::<Vec<_>>(), ["Stamp"]);
    assert_eq!(compute_total(&schema, &state), Money::new(130));
}

#[test]
fn schema_is_shareable_across_threads() {
    let schema = fixtures::planner();
    let handles: Vec<_> = ["A5", "A4"]
        .into_iter()
        .map(|size| {
            let schema = schema.clone();
            std::thread::spawn(move || {
                let state = set_selection(&schema, &SelectionState::new(), "Size", SelectionValue::single(size))
                    .expect("size");
                compute_total(&schema, &state)
            })
        })
        .collect();

    let totals: Vec<Money> = handles.into_iter().map(|h| h.join().expect("thread")).collect();
    assert_eq!(totals, [Money::new(1000), Money::new(1300)]);
}

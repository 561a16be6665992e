#![allow(dead_code)]

use bindery_customization::{Schema, validate_schema};
use bindery_kernel::domain::catalog::{
    Dependency, Group, GroupId, GroupKind, OptionId, Product, ProductOption,
};
use bindery_kernel::domain::money::Money;

pub fn options(priced: &[(&str, i64)]) -> Vec<ProductOption> {
    priced
        .iter()
        .map(|&(name, delta)| ProductOption::new(OptionId::new(name), name, Money::new(delta)))
        .collect()
}

pub fn single(name: &str, priced: &[(&str, i64)]) -> Group {
    Group::new(GroupId::new(name), name, GroupKind::SingleSelect { options: options(priced) })
}

pub fn multi(name: &str, priced: &[(&str, i64)]) -> Group {
    Group::new(GroupId::new(name), name, GroupKind::MultiSelect { options: options(priced) })
}

pub fn text(name: &str, default_text: &str, required: bool) -> Group {
    Group::new(
        GroupId::new(name),
        name,
        GroupKind::FreeText { default_text: default_text.to_owned(), required },
    )
}

pub fn depends(mut group: Group, parent: &str, option: &str) -> Group {
    group.depends_on = Some(Dependency::new(parent, option));
    group
}

pub fn family(mut group: Group, tag: &str) -> Group {
    group.exclusivity_family = Some(tag.to_owned());
    group
}

/// Cover type with a texture that only applies to hard covers.
pub fn notebook_product() -> Product {
    Product {
        base_price: Money::new(1000),
        groups: vec![
            single("Tipo de Tapa", &[("Tapa Dura", 0), ("Tapa Flexible", -50)]),
            depends(single("Textura", &[("Mate", 0), ("Brillo", 20)]), "Tipo de Tapa", "Tapa Dura"),
        ],
    }
}

/// # Panics
/// If the fixture product is invalid.
#[must_use]
pub fn notebook() -> Schema {
    validate_schema(notebook_product()).expect("notebook fixture is valid")
}

/// A planner exercising every group kind, three-level chains, a dependency on a
/// multi-select group and an exclusivity family.
pub fn planner_product() -> Product {
    Product {
        base_price: Money::new(1000),
        groups: vec![
            single("Size", &[("A5", 0), ("A4", 300)]),
            single("Cover", &[("Hard", 0), ("Soft", -50), ("Leather", 400)]),
            depends(single("Texture", &[("Matte", 0), ("Gloss", 20)]), "Cover", "Hard"),
            depends(multi("Foil", &[("Gold", 120), ("Silver", 100), ("Copper", 90)]), "Texture", "Gloss"),
            depends(single("Strap", &[("Black", 0), ("Tan", 15)]), "Cover", "Leather"),
            family(text("Engraving", "", false), "personalization"),
            family(single("Monogram", &[("Serif", 60), ("Script", 80)]), "personalization"),
            multi("Extras", &[("Pocket", 150), ("Ribbon", 50), ("Elastic", 40)]),
            depends(single("Elastic color", &[("Red", 0), ("Blue", 0)]), "Extras", "Elastic"),
            depends(text("Gift note", "", false), "Extras", "Ribbon"),
            text("Spine label", "Planner", true),
        ],
    }
}

/// # Panics
/// If the fixture product is invalid.
#[must_use]
pub fn planner() -> Schema {
    validate_schema(planner_product()).expect("planner fixture is valid")
}

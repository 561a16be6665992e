//! Catalog shape of a configurable product.
//!
//! These types mirror what the catalog collaborator publishes: a base price and an
//! ordered list of option groups. Dependencies reference groups and options by their
//! display *name*; the stable [`GroupId`]/[`OptionId`] identifiers exist so authoring
//! tools can edit a definition without relying on array positions or labels.

use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id! {
    /// Stable identifier of a [`Group`], assigned once at creation and never reused.
    GroupId
}

opaque_id! {
    /// Stable identifier of a [`ProductOption`], unique within its group.
    OptionId
}

/// A configurable product: a base price plus ordered customization groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Product {
    pub base_price: Money,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Product {
    #[must_use]
    pub const fn new(base_price: Money) -> Self {
        Self { base_price, groups: Vec::new() }
    }

    /// Looks a group up by its display name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    #[must_use]
    pub fn group_by_id(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| &g.id == id)
    }
}

/// A named customization facet (cover type, texture, engraving text, ...).
///
/// On the wire the kind is flattened into the group object. Reading goes through
/// a flat raw form so unknown keys, and keys that do not belong to the group's kind, are
/// rejected instead of dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawGroup")]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(flatten)]
    pub kind: GroupKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Dependency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusivity_family: Option<String>,
}

impl Group {
    #[must_use]
    pub fn new(id: GroupId, name: impl Into<String>, kind: GroupKind) -> Self {
        Self { id, name: name.into(), kind, depends_on: None, exclusivity_family: None }
    }

    /// Options of a select group; always empty for free text.
    #[must_use]
    pub fn options(&self) -> &[ProductOption] {
        self.kind.options()
    }

    #[must_use]
    pub fn option(&self, name: &str) -> Option<&ProductOption> {
        self.options().iter().find(|o| o.name == name)
    }

    #[must_use]
    pub const fn kind_tag(&self) -> KindTag {
        self.kind.tag()
    }

    /// The exclusivity family, ignoring blank tags.
    #[must_use]
    pub fn family(&self) -> Option<&str> {
        self.exclusivity_family.as_deref().filter(|f| !f.trim().is_empty())
    }
}

/// Flat wire form of a [`Group`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawGroup {
    id: GroupId,
    name: String,
    kind: KindTag,
    options: Option<Vec<ProductOption>>,
    default_text: Option<String>,
    required: Option<bool>,
    depends_on: Option<Dependency>,
    exclusivity_family: Option<String>,
}

/// A group object whose keys do not fit its `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupShapeError {
    pub group: String,
    pub kind: KindTag,
    pub field: &'static str,
}

impl fmt::Display for GroupShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group '{}': `{}` is not allowed on a {} group", self.group, self.field, self.kind)
    }
}

impl std::error::Error for GroupShapeError {}

impl TryFrom<RawGroup> for Group {
    type Error = GroupShapeError;

    fn try_from(raw: RawGroup) -> Result<Self, Self::Error> {
        let misplaced = |field| GroupShapeError { group: raw.name.clone(), kind: raw.kind, field };

        let kind = match raw.kind {
            KindTag::SingleSelect | KindTag::MultiSelect => {
                if raw.default_text.is_some() {
                    return Err(misplaced("defaultText"));
                }
                if raw.required.is_some() {
                    return Err(misplaced("required"));
                }
                let options = raw.options.unwrap_or_default();
                if raw.kind == KindTag::SingleSelect {
                    GroupKind::SingleSelect { options }
                } else {
                    GroupKind::MultiSelect { options }
                }
            },
            KindTag::FreeText => {
                if raw.options.is_some() {
                    return Err(misplaced("options"));
                }
                GroupKind::FreeText {
                    default_text: raw.default_text.unwrap_or_default(),
                    required: raw.required.unwrap_or_default(),
                }
            },
        };

        Ok(Self {
            id: raw.id,
            name: raw.name,
            kind,
            depends_on: raw.depends_on,
            exclusivity_family: raw.exclusivity_family,
        })
    }
}

/// Shape-varying part of a [`Group`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GroupKind {
    /// Exactly one option may be chosen.
    SingleSelect { options: Vec<ProductOption> },
    /// Any subset of options may be chosen.
    MultiSelect { options: Vec<ProductOption> },
    /// Shopper-entered text; never priced.
    FreeText {
        #[serde(default)]
        default_text: String,
        #[serde(default)]
        required: bool,
    },
}

impl GroupKind {
    #[must_use]
    pub fn options(&self) -> &[ProductOption] {
        match self {
            Self::SingleSelect { options } | Self::MultiSelect { options } => options,
            Self::FreeText { .. } => &[],
        }
    }

    /// Mutable access to the option list; `None` for free text.
    pub const fn options_mut(&mut self) -> Option<&mut Vec<ProductOption>> {
        match self {
            Self::SingleSelect { options } | Self::MultiSelect { options } => Some(options),
            Self::FreeText { .. } => None,
        }
    }

    #[must_use]
    pub const fn tag(&self) -> KindTag {
        match self {
            Self::SingleSelect { .. } => KindTag::SingleSelect,
            Self::MultiSelect { .. } => KindTag::MultiSelect,
            Self::FreeText { .. } => KindTag::FreeText,
        }
    }
}

/// Field-less discriminant of [`GroupKind`], used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KindTag {
    SingleSelect,
    MultiSelect,
    FreeText,
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SingleSelect => "single-select",
            Self::MultiSelect => "multi-select",
            Self::FreeText => "free-text",
        })
    }
}

/// One concrete choice within a select group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductOption {
    pub id: OptionId,
    pub name: String,
    #[serde(default)]
    pub price_modifier: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductOption {
    #[must_use]
    pub fn new(id: OptionId, name: impl Into<String>, price_modifier: Money) -> Self {
        Self { id, name: name.into(), price_modifier, image: None }
    }
}

/// Makes a group visible only while `parent_group` has `required_option` selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
    #[serde(rename = "parentGroupName")]
    pub parent_group: String,
    #[serde(rename = "requiredOptionName")]
    pub required_option: String,
}

impl Dependency {
    #[must_use]
    pub fn new(parent_group: impl Into<String>, required_option: impl Into<String>) -> Self {
        Self { parent_group: parent_group.into(), required_option: required_option.into() }
    }
}

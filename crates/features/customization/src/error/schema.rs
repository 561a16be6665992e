use bindery_kernel::domain::money::Money;

/// Structural defect in a product definition. Blocks saving and using the product.
#[bindery_derive::bindery_error]
#[derive(Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Group name '{group}' is used more than once")]
    DuplicateGroupName { group: String },

    #[error("Option '{option}' appears more than once in group '{group}'")]
    DuplicateOptionName { group: String, option: String },

    #[error("Group id '{id}' is used more than once")]
    DuplicateGroupId { id: String },

    #[error("Option id '{id}' is used more than once in group '{group}'")]
    DuplicateOptionId { group: String, id: String },

    #[error("Group '{group}' depends on unknown group '{parent}'")]
    UnknownDependencyTarget { group: String, parent: String },

    #[error("Group '{group}' depends on option '{option}' which group '{parent}' does not offer")]
    UnknownDependencyOption { group: String, parent: String, option: String },

    #[error("Group '{group}' depends on free-text group '{parent}'")]
    DependencyOnFreeTextGroup { group: String, parent: String },

    #[error("Cyclic dependency: {}", .path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    #[error("Base price {amount} is negative")]
    NegativeBasePrice { amount: Money },

    #[error("Select group '{group}' offers no options")]
    NoOptions { group: String },

    #[error("Group '{group}' depends on '{ancestor}' from its own exclusivity family '{family}'")]
    FamilyDependencyConflict { group: String, ancestor: String, family: String },
}

impl SchemaError {
    /// The group an operator should look at to fix this error.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        match self {
            Self::DuplicateGroupName { group }
            | Self::DuplicateOptionName { group, .. }
            | Self::DuplicateOptionId { group, .. }
            | Self::UnknownDependencyTarget { group, .. }
            | Self::UnknownDependencyOption { group, .. }
            | Self::DependencyOnFreeTextGroup { group, .. }
            | Self::NoOptions { group }
            | Self::FamilyDependencyConflict { group, .. } => Some(group),
            Self::CyclicDependency { path } => path.first().map(String::as_str),
            Self::DuplicateGroupId { .. } | Self::NegativeBasePrice { .. } => None,
        }
    }
}

use super::SchemaError;
use bindery_kernel::domain::catalog::{GroupId, OptionId};

/// Rejected edit of a product draft.
#[bindery_derive::bindery_error]
#[derive(Clone, PartialEq, Eq)]
pub enum AuthoringError {
    #[error("No group with id '{id}'")]
    UnknownGroup { id: GroupId },

    #[error("Group '{group}' has no option with id '{id}'")]
    UnknownOption { group: GroupId, id: OptionId },

    #[error("Group '{group}' is free text and has no options")]
    NotSelectable { group: String },

    #[error("'{target}' is still required by {}", .dependents.join(", "))]
    StillReferenced { target: String, dependents: Vec<String> },

    #[error("Draft has {} schema violation(s): {}", .errors.len(), summarize(.errors))]
    InvalidSchema { errors: Vec<SchemaError> },
}

fn summarize(errors: &[SchemaError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

use bindery_kernel::domain::catalog::KindTag;

/// A visible group still waiting for an answer. Reported all at once, never fail-fast.
#[bindery_derive::bindery_error]
#[derive(Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Group '{group}' ({kind}) requires a selection")]
    MissingSelection { group: String, kind: KindTag },
}

impl CheckoutError {
    #[must_use]
    pub fn group(&self) -> &str {
        match self {
            Self::MissingSelection { group, .. } => group,
        }
    }
}

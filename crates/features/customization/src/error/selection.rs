use bindery_kernel::domain::catalog::KindTag;

/// A shopper choice that cannot be applied. The prior selection state stays in force.
#[bindery_derive::bindery_error]
#[derive(Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Group '{group}' does not exist")]
    UnknownGroup { group: String },

    #[error("Group '{group}' is {expected}, a {found} value does not fit")]
    KindMismatch { group: String, expected: KindTag, found: &'static str },

    #[error("Group '{group}' has no option '{option}'")]
    UnknownOption { group: String, option: String },

    #[error("Group '{group}' is not visible with the current selections")]
    HiddenGroup { group: String },
}

impl SelectionError {
    #[must_use]
    pub fn group(&self) -> &str {
        match self {
            Self::UnknownGroup { group }
            | Self::KindMismatch { group, .. }
            | Self::UnknownOption { group, .. }
            | Self::HiddenGroup { group } => group,
        }
    }
}

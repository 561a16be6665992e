use bindery_derive::bindery_error;

#[bindery_error]
#[derive(Clone, PartialEq, Eq)]
pub enum DemoError {
    #[error("Nothing selected")]
    NothingSelected,

    #[error("Option '{option}' is not offered")]
    UnknownOption { option: String },
}

fn main() {
    assert_eq!(DemoError::NothingSelected.code(), "nothing_selected");
    assert_eq!(DemoError::UnknownOption { option: "x".into() }.code(), "unknown_option");
    assert_eq!(DemoError::NothingSelected, DemoError::NothingSelected.clone());
}

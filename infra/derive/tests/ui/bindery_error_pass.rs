use bindery_derive::bindery_error;
use std::borrow::Cow;

#[bindery_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Unknown group '{group}'")]
    UnknownGroup { group: String },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<String, DemoError> {
    std::fs::read_to_string("/definitely/not/here").context("Reading demo file")
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.code(), "io");
    assert!(err.to_string().contains("(Reading demo file)"));

    let internal: DemoError = "boom".into();
    assert_eq!(internal.code(), "internal");

    let unknown = DemoError::UnknownGroup { group: "Textura".into() };
    assert_eq!(unknown.code(), "unknown_group");
}

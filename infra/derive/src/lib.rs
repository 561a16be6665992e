#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate of the workspace.
//! Today this is the error attribute macro; each feature slice declares its error
//! enums with it so that all errors render, chain and classify the same way.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! bindery-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// A high-level attribute macro for defining domain-specific error enums.
///
/// This macro reduces boilerplate by transforming a standard enum into a fully-featured
/// error type integrated with the workspace conventions.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Stable Codes**: Generates `fn code(&self) -> &'static str` returning the `snake_case`
///   variant name, so presentation layers can map errors to field-level messages
///   without parsing `Display` output.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field,
///   enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` implementations
///   if an `Internal` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping external errors must include a `source: T` field or a field marked
///    with `#[source]`/`#[from]`, and a `context` field.
/// 4. Tuple variants are rejected to keep error wiring explicit; unit variants are allowed.
/// 5. One annotated enum per module: the generated `format_context` helper is module-scoped.
///
/// # Example
///
/// ```rust,ignore
/// use bindery_derive::bindery_error;
/// use std::borrow::Cow;
///
/// #[bindery_error]
/// pub enum CatalogError {
///     #[error("Catalog read failed{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Group '{group}' is unknown")]
///     UnknownGroup { group: String },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &str) -> Result<String, CatalogError> {
///     std::fs::read_to_string(path).context("Reading product definition")
/// }
///
/// assert_eq!(CatalogError::UnknownGroup { group: "x".into() }.code(), "unknown_group");
/// ```
#[proc_macro_attribute]
pub fn bindery_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

//! Error types of the customization slice.
//!
//! One enum per phase of a product's life: authoring ([`SchemaError`], [`AuthoringError`]),
//! shopping ([`SelectionError`]) and checkout ([`CheckoutError`]). None of them is fatal to
//! the process; each has a recovery path owned by the caller.

mod authoring;
mod checkout;
mod schema;
mod selection;

pub use authoring::{AuthoringError, AuthoringErrorExt};
pub use checkout::{CheckoutError, CheckoutErrorExt};
pub use schema::{SchemaError, SchemaErrorExt};
pub use selection::{SelectionError, SelectionErrorExt};

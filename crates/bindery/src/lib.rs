//! Facade crate for Bindery features and shared modules.
//! Re-exports domain/kernel primitives and the customization slice, and reads catalog files.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `bindery` (the `customization` feature is on by default).
//! - Load a product with [`catalog::load_product`], then hand it to
//!   `bindery::customization::validate_schema`.

pub use bindery_domain as domain;
pub use bindery_kernel as kernel;

#[cfg(feature = "customization")]
pub use bindery_customization as customization;

pub mod catalog;

/// Feature registry for runtime introspection.
pub mod features {
    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "customization")]
        "customization",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

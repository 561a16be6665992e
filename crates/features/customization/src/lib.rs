//! # Customization Resolver
//!
//! Dependency-and-pricing engine for configurable goods. Given a product definition and a
//! shopper's in-progress answers it decides which option groups are visible, what happens to
//! answers when a visibility-changing choice is made, and what the configuration costs.
//!
//! ## Architecture
//!
//! Leaves first:
//!
//! 1.  **Schema validation ([`schema`]):** structural checks an authored product must pass
//!     before it becomes a [`Schema`].
//! 2.  **Dependency graph ([`graph`]):** `dependsOn` edges, cycle detection and a topological
//!     order in which parents precede dependents.
//! 3.  **Visibility ([`visibility`]):** which groups are shown for a selection snapshot.
//! 4.  **Selection ([`selection`]):** applies one choice, clearing exclusivity siblings and every
//!     group that became hidden.
//! 5.  **Pricing ([`pricing`]):** base price plus the modifiers of visible chosen options.
//! 6.  **Checkout ([`checkout`]):** every visible group that needs an answer has one; the result
//!     can be frozen into a cart line.
//!
//! [`authoring`] edits product drafts by stable identifier and [`session`] wraps the shopper
//! side into a [`Configurator`] with undo.
//!
//! Everything here is synchronous and pure: no I/O and no shared mutable state.
//!
//! ## Example
//!
//! ```rust
//! use bindery_customization::prelude::*;
//! use bindery_kernel::domain::catalog::Product;
//!
//! let product: Product = serde_json::from_str(r#"{
//!     "basePrice": 1000,
//!     "groups": [
//!         { "id": "g1", "name": "Cover", "kind": "singleSelect",
//!           "options": [{ "id": "o1", "name": "Hard" }, { "id": "o2", "name": "Soft", "priceModifier": -50 }] }
//!     ]
//! }"#).unwrap();
//!
//! let schema = validate_schema(product).unwrap();
//! let state = set_selection(&schema, &SelectionState::new(), "Cover", SelectionValue::single("Soft")).unwrap();
//! assert_eq!(compute_total(&schema, &state).minor_units(), 950);
//! assert!(validate_for_checkout(&schema, &state).is_ok());
//! ```

pub mod authoring;
pub mod checkout;
mod error;
pub mod graph;
pub mod pricing;
pub mod schema;
pub mod selection;
pub mod session;
pub mod visibility;

pub use crate::authoring::ProductDraft;
pub use crate::checkout::{CartLine, FrozenConfiguration, freeze, validate_for_checkout};
pub use crate::error::{
    AuthoringError, AuthoringErrorExt, CheckoutError, CheckoutErrorExt, SchemaError,
    SchemaErrorExt, SelectionError, SelectionErrorExt,
};
pub use crate::graph::{DependencyGraph, build_dependency_graph};
pub use crate::pricing::{PriceBreakdown, PriceLine, compute_total, price_breakdown};
pub use crate::schema::{Schema, validate_schema};
pub use crate::selection::{
    SelectionChange, SelectionState, SelectionValue, apply_selection, set_selection,
};
pub use crate::session::Configurator;
pub use crate::visibility::{Visibility, resolve_visibility};

pub mod prelude {
    pub use crate::{
        CartLine, CheckoutError, Configurator, FrozenConfiguration, ProductDraft, Schema,
        SchemaError, SelectionError, SelectionState, SelectionValue, compute_total, freeze,
        price_breakdown, resolve_visibility, set_selection, validate_for_checkout,
        validate_schema,
    };
}

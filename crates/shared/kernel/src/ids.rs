//! Minting of stable catalog identifiers.
//!
//! Identifiers are assigned once when a group or option is created and survive
//! renames and reordering, unlike display names or array positions.

use crate::domain::catalog::{GroupId, OptionId};
use crate::safe_nanoid;

#[must_use]
pub fn new_group_id() -> GroupId {
    GroupId::new(safe_nanoid!())
}

#[must_use]
pub fn new_option_id() -> OptionId {
    OptionId::new(safe_nanoid!())
}

//! A shopper's configurator session: one validated schema, the current selections and the
//! snapshots that came before them.

use crate::checkout::{FrozenConfiguration, freeze, validate_for_checkout};
use crate::error::{CheckoutError, SelectionError};
use crate::pricing::{PriceBreakdown, compute_total, price_breakdown};
use crate::schema::Schema;
use crate::selection::{SelectionChange, SelectionState, SelectionValue, apply_selection};
use crate::visibility::{Visibility, resolve_visibility};
use bindery_kernel::domain::money::Money;
use tracing::debug;

/// Interactive state of one configurable product for one shopper.
#[derive(Debug, Clone)]
pub struct Configurator {
    schema: Schema,
    state: SelectionState,
    history: Vec<SelectionState>,
}

impl Configurator {
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self::resume(schema, SelectionState::new())
    }

    /// Continues from a previously saved state. Nothing is undoable yet.
    #[must_use]
    pub const fn resume(schema: Schema, state: SelectionState) -> Self {
        Self { schema, state, history: Vec::new() }
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Applies a choice and returns the groups it cleared as a side effect. On rejection
    /// the current state and the undo history are unchanged.
    ///
    /// # Errors
    /// See [`crate::set_selection`].
    pub fn select(
        &mut self,
        group: &str,
        value: SelectionValue,
    ) -> Result<Vec<String>, SelectionError> {
        let SelectionChange { state, cleared } =
            apply_selection(&self.schema, &self.state, group, value)?;
        if state != self.state {
            let previous = std::mem::replace(&mut self.state, state);
            self.history.push(previous);
        }
        Ok(cleared)
    }

    /// Restores the snapshot before the last effective choice. Returns `false` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.pop() else { return false };
        debug!(depth = self.history.len(), "Selection undone");
        self.state = previous;
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Starts over with no answers. Undoable.
    pub fn reset(&mut self) {
        if !self.state.is_empty() {
            let previous = std::mem::take(&mut self.state);
            self.history.push(previous);
        }
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility<'_> {
        resolve_visibility(self.schema.graph(), &self.state)
    }

    #[must_use]
    pub fn total(&self) -> Money {
        compute_total(&self.schema, &self.state)
    }

    #[must_use]
    pub fn breakdown(&self) -> PriceBreakdown {
        price_breakdown(&self.schema, &self.state)
    }

    /// # Errors
    /// Every visible group still waiting for an answer.
    pub fn validate(&self) -> Result<(), Vec<CheckoutError>> {
        validate_for_checkout(&self.schema, &self.state)
    }

    /// # Errors
    /// Every visible group still waiting for an answer.
    pub fn freeze(&self) -> Result<FrozenConfiguration, Vec<CheckoutError>> {
        freeze(&self.schema, &self.state)
    }
}

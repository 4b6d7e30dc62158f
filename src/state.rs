//! Snapshot Stack
//!
//! Per-instance LIFO save/restore of the stored value mapping. Providers are
//! saved by reference, so a pop restores the same provider object; whatever
//! the provider produced in between is not rewound.

use crate::error::ParamError;
use crate::instance::Parameterized;
use tracing::trace;

impl Parameterized {
    /// Save the current value mapping
    pub fn state_push(&self) {
        let mut state = self.state_mut();
        let saved = state.values.clone();
        state.saved.push(saved);
        trace!(depth = state.saved.len(), "Pushed instance state");
    }

    /// Restore the most recently pushed mapping.
    ///
    /// Fails with [`ParamError::StackUnderflow`] when nothing was pushed,
    /// leaving the instance untouched.
    pub fn state_pop(&self) -> Result<(), ParamError> {
        let mut state = self.state_mut();
        let saved = state.saved.pop().ok_or_else(|| {
            ParamError::StackUnderflow(format!(
                "no saved state on {} instance",
                self.class().name()
            ))
        })?;
        state.values = saved;
        trace!(depth = state.saved.len(), "Popped instance state");
        Ok(())
    }

    /// Number of saved mappings
    pub fn state_depth(&self) -> usize {
        self.state().saved.len()
    }
}

//! Servo enable lifecycle
//!
//! Outputs are attached only while the host's enable register is set.
//! The state machine is edge-triggered: the controller acts once per
//! transition, not on every pass where the register holds a value.
//!
//! ```text
//! Disabled --(enable = 1)--> Enabled
//! Enabled  --(enable = 0)--> Disabled
//! ```

/// Output enable state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EnableState {
    /// Outputs detached (startup state)
    #[default]
    Disabled,
    /// Outputs attached and driven
    Enabled,
}

/// Edge produced by [`EnableState::apply`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// Outputs must be attached
    Attach,
    /// Outputs must be detached
    Detach,
}

impl EnableState {
    /// Check if outputs are attached
    pub fn is_enabled(&self) -> bool {
        matches!(self, EnableState::Enabled)
    }

    /// Move toward the requested state
    ///
    /// Returns the transition to perform, or `None` if the state already
    /// matches the request.
    pub fn apply(&mut self, requested: bool) -> Option<Transition> {
        match (*self, requested) {
            (EnableState::Disabled, true) => {
                *self = EnableState::Enabled;
                Some(Transition::Attach)
            }
            (EnableState::Enabled, false) => {
                *self = EnableState::Disabled;
                Some(Transition::Detach)
            }
            _ => None,
        }
    }
}

//! Operator feedback trait
//!
//! Audible or visual confirmation of controller events (buzzer chirp,
//! LED blink). Feedback never influences control flow.

use armlink_protocol::Preset;

/// Event worth confirming to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cue {
    /// Servo outputs attached
    Enabled,
    /// Servo outputs detached
    Disabled,
    /// A preset pose was applied
    PresetApplied(Preset),
}

/// Fire-and-forget feedback sink
pub trait Feedback {
    /// Announce an event
    fn cue(&mut self, cue: Cue);
}

/// Feedback sink that discards every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Feedback for Silent {
    fn cue(&mut self, _cue: Cue) {}
}

//! Servo output trait
//!
//! A servo output drives one positional actuator with a pulse width.
//! Detaching stops the pulse train so the actuator goes limp; attaching
//! resumes it at a given pulse width so the actuator does not jump.

/// Pulse-width driven positional output
///
/// Writes are fire-and-forget: the controller has no recovery path for a
/// failed register write, so implementations track their own faults.
pub trait ServoOutput {
    /// Start driving the output at `pulse_us`
    fn attach(&mut self, pulse_us: u16);

    /// Stop driving the output
    fn detach(&mut self);

    /// Check if the output is currently driven
    fn is_attached(&self) -> bool;

    /// Drive a new pulse width
    ///
    /// Has no effect while detached.
    fn write_pulse_us(&mut self, pulse_us: u16);
}

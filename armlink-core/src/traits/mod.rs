//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod feedback;
pub mod servo;

pub use feedback::{Cue, Feedback, Silent};
pub use servo::ServoOutput;

//! Per-actuator motion pipeline
//!
//! Each joint has an [`ActuatorChannel`] holding its positions, and the
//! [`MotionFilter`] moves the channel's filtered position toward its target
//! and decides when the physical output is rewritten.

pub mod channel;
pub mod filter;

pub use channel::ActuatorChannel;
pub use filter::{Advance, MotionFilter};

//! Board-agnostic core logic for the armlink servo controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (servo output, feedback)
//! - Actuator channels and the motion filter
//! - Preset resolution
//! - Enable/disable lifecycle
//! - Cycle scheduling
//! - The controller tying them together around the shared-state exchange
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod motion;
pub mod preset;
pub mod scheduler;
pub mod state;
pub mod traits;

pub use controller::{CycleReport, ServoController};
pub use armlink_protocol::{Commands, Joint, Preset, Status};

//! Cycle scheduling

pub mod cycle;

pub use cycle::{CommandSnapshot, CycleScheduler, Pass};

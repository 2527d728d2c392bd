//! Embassy async tasks
//!
//! Each task runs independently and communicates via the shared register bank.

pub mod bus;
pub mod control;

pub use bus::bus_task;
pub use control::{control_task, ArmController, Panel};

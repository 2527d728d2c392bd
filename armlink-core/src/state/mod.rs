//! Controller state machines

pub mod enable;

pub use enable::{EnableState, Transition};

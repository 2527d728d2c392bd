//! Operator feedback drivers

pub mod blink;

pub use blink::{BlinkConfig, BlinkFeedback};

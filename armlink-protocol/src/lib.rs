//! Shared-state register protocol
//!
//! This crate defines the fixed-layout record exchanged between the host
//! (single-board computer) and the servo controller over I2C. The host
//! writes command fields and reads status fields; the controller does the
//! opposite. Both sides agree on the byte layout at build time.
//!
//! # Buffer Overview
//!
//! ```text
//! 0      3         6        10        12       24     39         43       44       45       51
//! ┌──────┬─────────┬────────┬─────────┬────────┬──────┬──────────┬────────┬────────┬────────┐
//! │ LEDS │ BUTTONS │ MOTORS │ BATTERY │ ANALOG │ TONE │ ENCODERS │ PRESET │ ENABLE │ SERVOS │
//! └──────┴─────────┴────────┴─────────┴────────┴──────┴──────────┴────────┴────────┴────────┘
//! ```
//!
//! The controller side never touches the raw bytes directly: it calls
//! [`Exchange::ingest`] at the top of a cycle to get a [`Commands`] snapshot
//! and [`Exchange::publish`] at the bottom to commit a [`Status`].

#![no_std]
#![deny(unsafe_code)]

pub mod bank;
pub mod host;
pub mod layout;
pub mod message;
pub mod transport;

pub use bank::RegisterBank;
pub use layout::{Owner, SHARED_STATE_SIZE};
pub use message::{Commands, Joint, Preset, ServoEcho, Status, ToneSequence, JOINT_COUNT};
pub use transport::Exchange;

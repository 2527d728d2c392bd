//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in armlink-core on top of `embedded-hal`:
//!
//! - Servo outputs (PWM pulse-width)
//! - Operator feedback (blinking indicator)

#![no_std]
#![deny(unsafe_code)]

pub mod feedback;
pub mod servo;

//! Servo output drivers

pub mod pwm;

pub use pwm::{PwmServo, PwmServoConfig};

//! PWM hobby-servo driver
//!
//! Maps a pulse width in microseconds onto the duty cycle of a PWM channel
//! running at the servo frame rate (20 ms by default).
//!
//! # Usage
//!
//! ```ignore
//! let mut servo = PwmServo::new(pwm_channel, PwmServoConfig::default());
//! servo.attach(1450);
//! servo.write_pulse_us(1500);
//! servo.detach(); // output held low, actuator goes limp
//! ```
//!
//! The PWM peripheral must already be configured for the frame period.
//! On RP2040 with a 125 MHz system clock, divider 125 and top 19999 give a
//! 20 ms frame with 1 µs per count.

use armlink_core::traits::ServoOutput;
use embedded_hal::pwm::SetDutyCycle;

/// PWM servo configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmServoConfig {
    /// PWM frame period in µs
    pub period_us: u32,
}

impl Default for PwmServoConfig {
    fn default() -> Self {
        Self { period_us: 20_000 }
    }
}

/// Servo driven by one PWM channel
pub struct PwmServo<P> {
    pwm: P,
    config: PwmServoConfig,
    attached: bool,
    /// Last commanded pulse width (µs)
    pulse_us: u16,
    /// Failed duty-cycle writes
    faults: u32,
}

impl<P: SetDutyCycle> PwmServo<P> {
    /// Create a detached servo output
    ///
    /// The channel is driven fully off until [`attach`](ServoOutput::attach).
    pub fn new(pwm: P, config: PwmServoConfig) -> Self {
        let mut servo = Self {
            pwm,
            config,
            attached: false,
            pulse_us: 0,
            faults: 0,
        };
        servo.off();
        servo
    }

    /// Duty cycle for a pulse width
    pub fn duty_for(&self, pulse_us: u16) -> u16 {
        let max = u32::from(self.pwm.max_duty_cycle());
        let period = self.config.period_us.max(1);
        let duty = u32::from(pulse_us) * max / period;
        duty.min(max) as u16
    }

    /// Last commanded pulse width
    pub fn pulse_us(&self) -> u16 {
        self.pulse_us
    }

    /// Number of failed writes to the PWM channel
    pub fn faults(&self) -> u32 {
        self.faults
    }

    /// Release the PWM channel
    pub fn release(self) -> P {
        self.pwm
    }

    fn drive(&mut self, pulse_us: u16) {
        self.pulse_us = pulse_us;
        let duty = self.duty_for(pulse_us);
        if self.pwm.set_duty_cycle(duty).is_err() {
            self.faults = self.faults.saturating_add(1);
        }
    }

    fn off(&mut self) {
        if self.pwm.set_duty_cycle_fully_off().is_err() {
            self.faults = self.faults.saturating_add(1);
        }
    }
}

impl<P: SetDutyCycle> ServoOutput for PwmServo<P> {
    fn attach(&mut self, pulse_us: u16) {
        self.attached = true;
        self.drive(pulse_us);
    }

    fn detach(&mut self) {
        self.attached = false;
        self.off();
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn write_pulse_us(&mut self, pulse_us: u16) {
        if self.attached {
            self.drive(pulse_us);
        }
    }
}

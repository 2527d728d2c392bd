//! armlink - Servo Arm Controller Firmware
//!
//! Main firmware binary for RP2040-based boards. The board is an I2C target
//! at address 20 exposing the shared register record; a host writes servo
//! targets, presets and the enable flag, and reads back status.
//!
//! Pin assignments:
//! - I2C0: SDA GPIO4, SCL GPIO5
//! - Servos: lift GPIO6, tilt GPIO8, gripper GPIO10 (PWM slices 3-5, channel A)
//! - Indicator LEDs: GPIO13-15 (yellow, green, red)
//! - Buttons A-C: GPIO16-18 (active low)
//! - Feedback LED: GPIO25

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::InterruptHandler as I2cInterruptHandler;
use embassy_rp::i2c_slave::{Config as I2cSlaveConfig, I2cSlave};
use embassy_rp::peripherals::I2C0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm, PwmOutput};
use {defmt_rtt as _, panic_probe as _};

use armlink_core::ServoController;
use armlink_drivers::feedback::{BlinkConfig, BlinkFeedback};
use armlink_drivers::servo::{PwmServo, PwmServoConfig};
use armlink_protocol::host::ARMLINK_I2C_ADDRESS;

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});

/// 125 MHz / 125 = 1 MHz PWM clock, 1 µs per count
const SERVO_PWM_DIVIDER: u8 = 125;

/// 20 000 counts per frame = 50 Hz servo frame
const SERVO_PWM_TOP: u16 = 19_999;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("armlink firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();

    // I2C target for the host
    let mut bus_config = I2cSlaveConfig::default();
    bus_config.addr = ARMLINK_I2C_ADDRESS as u16;
    let device = I2cSlave::new(p.I2C0, p.PIN_5, p.PIN_4, Irqs, bus_config);
    info!("I2C target listening at address {}", ARMLINK_I2C_ADDRESS);

    // Servo PWM outputs start fully off; the controller attaches them on enable
    let servos = [
        servo_output(Pwm::new_output_a(p.PWM_SLICE3, p.PIN_6, servo_pwm_config())),
        servo_output(Pwm::new_output_a(p.PWM_SLICE4, p.PIN_8, servo_pwm_config())),
        servo_output(Pwm::new_output_a(p.PWM_SLICE5, p.PIN_10, servo_pwm_config())),
    ];
    info!("Servo PWM initialized");

    let feedback = BlinkFeedback::new(Output::new(p.PIN_25, Level::Low), BlinkConfig::default());

    let panel = tasks::Panel::new(
        [
            Output::new(p.PIN_13, Level::Low),
            Output::new(p.PIN_14, Level::Low),
            Output::new(p.PIN_15, Level::Low),
        ],
        [
            Input::new(p.PIN_16, Pull::Up),
            Input::new(p.PIN_17, Pull::Up),
            Input::new(p.PIN_18, Pull::Up),
        ],
    );

    let controller: tasks::ArmController = unwrap!(ServoController::new(&config, servos, feedback));
    info!("Controller ready, servos detached");

    spawner.spawn(tasks::bus_task(device)).unwrap();
    spawner.spawn(tasks::control_task(controller, panel)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

fn servo_pwm_config() -> PwmConfig {
    let mut config = PwmConfig::default();
    config.divider = SERVO_PWM_DIVIDER.into();
    config.top = SERVO_PWM_TOP;
    config.compare_a = 0;
    config
}

fn servo_output(pwm: Pwm<'static>) -> PwmServo<PwmOutput<'static>> {
    let (channel_a, _) = pwm.split();
    PwmServo::new(unwrap!(channel_a), PwmServoConfig::default())
}

//! Servo control task
//!
//! Runs one exchange cycle per tick: ingest host commands, step the
//! controller, publish status. Indicator outputs and buttons are serviced
//! on the same cycle.

use defmt::*;
use embassy_rp::gpio::{Input, Level, Output};
use embassy_rp::pwm::PwmOutput;
use embassy_time::{Duration, Instant, Ticker};

use armlink_core::state::Transition;
use armlink_core::{CycleReport, Joint, ServoController};
use armlink_drivers::feedback::BlinkFeedback;
use armlink_drivers::servo::PwmServo;
use armlink_protocol::layout::{BUTTON_COUNT, LED_COUNT};
use armlink_protocol::{Commands, Exchange, Status, JOINT_COUNT};

use crate::channels::with_bank;

/// Exchange tick; the controller's own scheduler sets the filter rate
pub const CONTROL_TICK_MS: u64 = 5;

/// Controller wired to the board's PWM servos and status LED
pub type ArmController =
    ServoController<PwmServo<PwmOutput<'static>>, BlinkFeedback<Output<'static>>>;

/// Indicator outputs and buttons
pub struct Panel {
    leds: [Output<'static>; LED_COUNT],
    buttons: [Input<'static>; BUTTON_COUNT],
}

impl Panel {
    /// Buttons are active low
    pub fn new(leds: [Output<'static>; LED_COUNT], buttons: [Input<'static>; BUTTON_COUNT]) -> Self {
        Self { leds, buttons }
    }

    fn apply(&mut self, commands: &Commands) {
        for (led, &on) in self.leds.iter_mut().zip(commands.leds.iter()) {
            led.set_level(if on { Level::High } else { Level::Low });
        }
    }

    fn buttons(&self) -> [bool; BUTTON_COUNT] {
        [
            self.buttons[0].is_low(),
            self.buttons[1].is_low(),
            self.buttons[2].is_low(),
        ]
    }
}

/// Register bank exchange that also drives the indicator outputs
struct PanelExchange<'a> {
    panel: &'a mut Panel,
}

impl Exchange for PanelExchange<'_> {
    fn ingest(&mut self) -> Commands {
        let commands = with_bank(|bank| bank.ingest());
        self.panel.apply(&commands);
        commands
    }

    fn publish(&mut self, status: &Status) {
        with_bank(|bank| bank.publish(status));
    }
}

/// Servo control task
#[embassy_executor::task]
pub async fn control_task(mut controller: ArmController, mut panel: Panel) {
    info!("Control task started");

    let start = Instant::now();
    let mut ticker = Ticker::every(Duration::from_millis(CONTROL_TICK_MS));
    let mut faults = [0u32; JOINT_COUNT];

    loop {
        ticker.next().await;
        let now_ms = start.elapsed().as_millis() as u32;

        let mut status = Status {
            buttons: panel.buttons(),
            ..Default::default()
        };
        let report = controller.run_cycle(
            &mut PanelExchange { panel: &mut panel },
            now_ms,
            &mut status,
        );
        log_report(&controller, &report);

        controller.feedback_mut().update(now_ms);

        for joint in Joint::ALL {
            let count = controller.servo(joint).faults();
            if count != faults[joint.index()] {
                warn!("{:?} servo PWM faults: {}", joint, count);
                faults[joint.index()] = count;
            }
        }
    }
}

fn log_report(controller: &ArmController, report: &CycleReport) {
    match report.transition {
        Some(Transition::Attach) => info!("Servos enabled"),
        Some(Transition::Detach) => info!("Servos disabled"),
        None => {}
    }

    if let Some(preset) = report.preset_applied {
        info!("Preset {:?} applied", preset);
    }

    for joint in Joint::ALL {
        if report.raw_accepted[joint.index()] {
            debug!(
                "{:?} target -> {} us",
                joint,
                controller.channel(joint).target()
            );
        }
    }
}

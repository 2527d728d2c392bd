//! Servo controller
//!
//! Ties the pipeline together for one exchange cycle:
//!
//! 1. Ingest host commands from the shared state
//! 2. Apply enable/disable edges (attach or detach outputs)
//! 3. If the scheduler allows a pass: resolve presets, accept raw
//!    targets, advance the motion filter on every channel
//! 4. Publish status and, when commands were processed, the servo echo
//!
//! A raw target that moves a channel by more than the deadzone always wins
//! over the preset register and clears the active preset.

use armlink_protocol::{Commands, Exchange, Joint, Preset, ServoEcho, Status, JOINT_COUNT};

use crate::config::{ConfigError, ControllerConfig};
use crate::motion::{ActuatorChannel, MotionFilter};
use crate::preset::PresetResolver;
use crate::scheduler::{CommandSnapshot, CycleScheduler, Pass};
use crate::state::{EnableState, Transition};
use crate::traits::{Cue, Feedback, ServoOutput};

/// What happened during one controller step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Enable edge handled this step
    pub transition: Option<Transition>,
    /// Scheduler decision (`None` while disabled)
    pub pass: Option<Pass>,
    /// Preset whose pose was applied
    pub preset_applied: Option<Preset>,
    /// Joints retargeted from raw host positions
    pub raw_accepted: [bool; JOINT_COUNT],
}

impl CycleReport {
    /// Check if the servo echo should be published
    pub fn processed(&self) -> bool {
        self.transition.is_some() || self.pass == Some(Pass::Run)
    }
}

/// Three-channel servo controller
pub struct ServoController<S: ServoOutput, F: Feedback> {
    channels: [ActuatorChannel; JOINT_COUNT],
    servos: [S; JOINT_COUNT],
    feedback: F,
    enable: EnableState,
    presets: PresetResolver,
    scheduler: CycleScheduler,
    filter: MotionFilter,
}

impl<S: ServoOutput, F: Feedback> ServoController<S, F> {
    /// Create a controller with outputs detached and every channel at mid
    ///
    /// `servos` are ordered lift, tilt, gripper.
    pub fn new(
        config: &ControllerConfig,
        servos: [S; JOINT_COUNT],
        feedback: F,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            channels: Joint::ALL.map(|joint| ActuatorChannel::new(joint, config.limits(joint))),
            servos,
            feedback,
            enable: EnableState::Disabled,
            presets: PresetResolver::new(config.presets),
            scheduler: CycleScheduler::new(config.cycle_interval_ms),
            filter: MotionFilter::new(config.filter),
        })
    }

    /// Run one full exchange cycle: ingest, step, publish
    ///
    /// `status` carries the device-owned fields (buttons, battery, ...)
    /// filled in by the caller; the servo fields are set here.
    pub fn run_cycle<E: Exchange + ?Sized>(
        &mut self,
        exchange: &mut E,
        now_ms: u32,
        status: &mut Status,
    ) -> CycleReport {
        let commands = exchange.ingest();
        let report = self.step(now_ms, &commands, status);
        exchange.publish(status);
        report
    }

    /// Process one set of ingested commands
    pub fn step(&mut self, now_ms: u32, commands: &Commands, status: &mut Status) -> CycleReport {
        let mut report = CycleReport {
            transition: self.enable.apply(commands.servo_enable),
            ..Default::default()
        };

        match report.transition {
            Some(Transition::Attach) => self.attach(),
            Some(Transition::Detach) => self.detach(),
            None => {}
        }

        if self.enable.is_enabled() {
            let all_static = self.channels.iter().all(ActuatorChannel::is_static);
            let pass = self
                .scheduler
                .poll(now_ms, CommandSnapshot::from(commands), all_static);
            if pass == Pass::Run {
                self.run_pass(now_ms, commands, &mut report);
            }
            report.pass = Some(pass);
        }

        status.servo_enabled = self.enable.is_enabled();
        status.servo = report.processed().then(|| self.echo());
        report
    }

    fn run_pass(&mut self, now_ms: u32, commands: &Commands, report: &mut CycleReport) {
        // Freshness is judged against the targets before any preset moves them
        let fresh = Joint::ALL.map(|joint| {
            let raw_us = commands.position(joint);
            self.filter
                .accepts(&self.channels[joint.index()], raw_us)
                .then_some(raw_us)
        });

        if let Some(pose) = self.presets.select(commands.preset) {
            for channel in self.channels.iter_mut() {
                if let Some(pulse_us) = pose.get(channel.joint()) {
                    channel.retarget(pulse_us, now_ms);
                }
            }
            let preset = self.presets.active();
            self.feedback.cue(Cue::PresetApplied(preset));
            report.preset_applied = Some(preset);
        }

        for (channel, raw_us) in self.channels.iter_mut().zip(fresh) {
            if let Some(pulse_us) = raw_us {
                channel.retarget(pulse_us, now_ms);
                self.presets.clear();
                report.raw_accepted[channel.joint().index()] = true;
            }
        }

        for (channel, servo) in self.channels.iter_mut().zip(self.servos.iter_mut()) {
            self.filter.advance(channel, servo, now_ms);
        }
    }

    fn attach(&mut self) {
        // Targets survive a disable; the output resumes from where it stopped
        for (channel, servo) in self.channels.iter().zip(self.servos.iter_mut()) {
            servo.attach(channel.current());
        }
        self.presets.clear();
        self.scheduler.reset();
        self.feedback.cue(Cue::Enabled);
    }

    fn detach(&mut self) {
        // Channels keep their targets; outputs just stop being driven
        for servo in self.servos.iter_mut() {
            servo.detach();
        }
        self.presets.clear();
        self.feedback.cue(Cue::Disabled);
    }

    fn echo(&self) -> ServoEcho {
        ServoEcho {
            preset: self.presets.active(),
            positions: self.channels.each_ref().map(ActuatorChannel::target),
        }
    }

    /// Channel state for one joint
    pub fn channel(&self, joint: Joint) -> &ActuatorChannel {
        &self.channels[joint.index()]
    }

    /// Output for one joint
    pub fn servo(&self, joint: Joint) -> &S {
        &self.servos[joint.index()]
    }

    pub fn enable_state(&self) -> EnableState {
        self.enable
    }

    pub fn active_preset(&self) -> Preset {
        self.presets.active()
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }

    /// Check if every channel is locked at its target
    pub fn is_settled(&self) -> bool {
        self.channels.iter().all(ActuatorChannel::is_static)
    }
}

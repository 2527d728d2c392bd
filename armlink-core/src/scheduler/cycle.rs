//! Filter/preset pass scheduler
//!
//! The exchange runs on every controller tick, but the filter and preset
//! pass only runs at a fixed interval, and is skipped entirely while every
//! channel is locked and the host's servo commands have not changed.

use armlink_protocol::{Commands, Preset, JOINT_COUNT};

/// The servo-related part of the host commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandSnapshot {
    pub positions: [u16; JOINT_COUNT],
    pub preset: Preset,
    pub enable: bool,
}

impl From<&Commands> for CommandSnapshot {
    fn from(commands: &Commands) -> Self {
        Self {
            positions: commands.positions,
            preset: commands.preset,
            enable: commands.servo_enable,
        }
    }
}

/// What the controller should do this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pass {
    /// Interval not yet elapsed
    Wait,
    /// Nothing to do: all channels locked, commands unchanged
    Idle,
    /// Run the filter and preset pass
    Run,
}

/// Decides when the filter/preset pass runs
#[derive(Debug, Clone)]
pub struct CycleScheduler {
    interval_ms: u32,
    last_run_ms: Option<u32>,
    last_seen: Option<CommandSnapshot>,
}

impl CycleScheduler {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_run_ms: None,
            last_seen: None,
        }
    }

    /// Pass interval (ms)
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Decide whether to run a pass at `now_ms`
    pub fn poll(&mut self, now_ms: u32, snapshot: CommandSnapshot, all_static: bool) -> Pass {
        if let Some(last) = self.last_run_ms {
            if now_ms.wrapping_sub(last) < self.interval_ms {
                return Pass::Wait;
            }
        }

        if all_static && self.last_seen == Some(snapshot) {
            return Pass::Idle;
        }

        self.last_run_ms = Some(now_ms);
        self.last_seen = Some(snapshot);
        Pass::Run
    }

    /// Force the next poll to run a pass
    pub fn reset(&mut self) {
        self.last_run_ms = None;
        self.last_seen = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(lift: u16) -> CommandSnapshot {
        CommandSnapshot {
            positions: [lift, 1550, 1400],
            preset: Preset::None,
            enable: true,
        }
    }

    #[test]
    fn test_first_poll_runs() {
        let mut scheduler = CycleScheduler::new(20);
        assert_eq!(scheduler.poll(0, snapshot(1450), true), Pass::Run);
    }

    #[test]
    fn test_waits_for_interval() {
        let mut scheduler = CycleScheduler::new(20);
        scheduler.poll(100, snapshot(1450), false);
        assert_eq!(scheduler.poll(105, snapshot(1450), false), Pass::Wait);
        assert_eq!(scheduler.poll(119, snapshot(1500), false), Pass::Wait);
        assert_eq!(scheduler.poll(120, snapshot(1450), false), Pass::Run);
    }

    #[test]
    fn test_idle_when_static_and_unchanged() {
        let mut scheduler = CycleScheduler::new(20);
        scheduler.poll(0, snapshot(1450), true);
        assert_eq!(scheduler.poll(20, snapshot(1450), true), Pass::Idle);
        assert_eq!(scheduler.poll(40, snapshot(1450), false), Pass::Run);
    }

    #[test]
    fn test_command_change_wakes_pass() {
        let mut scheduler = CycleScheduler::new(20);
        scheduler.poll(0, snapshot(1450), true);
        assert_eq!(scheduler.poll(20, snapshot(1600), true), Pass::Run);
        assert_eq!(scheduler.poll(40, snapshot(1600), true), Pass::Idle);
    }

    #[test]
    fn test_reset_forces_run() {
        let mut scheduler = CycleScheduler::new(20);
        scheduler.poll(0, snapshot(1450), true);
        scheduler.reset();
        assert_eq!(scheduler.poll(1, snapshot(1450), true), Pass::Run);
    }

    #[test]
    fn test_interval_across_timer_wrap() {
        let mut scheduler = CycleScheduler::new(20);
        scheduler.poll(u32::MAX - 4, snapshot(1450), false);
        assert_eq!(scheduler.poll(10, snapshot(1450), false), Pass::Wait);
        assert_eq!(scheduler.poll(15, snapshot(1450), false), Pass::Run);
    }
}

//! Actuator channel state
//!
//! Tracks the three positions of one joint:
//! - `target`: where the joint should come to rest
//! - `filtered`: the smoothed intermediate the filter is producing
//! - `current`: the last pulse width actually written to the output

use armlink_protocol::Joint;

use crate::config::ChannelLimits;

/// State of one servo channel
///
/// `filtered` and `target` always lie within the channel limits.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorChannel {
    joint: Joint,
    limits: ChannelLimits,
    /// Last pulse width written to the output (µs)
    current_us: u16,
    /// Desired resting pulse width (µs)
    target_us: u16,
    /// Smoothed pulse width (µs)
    filtered_us: u16,
    /// Settled at target; no filtering or writes until retargeted
    is_static: bool,
    /// Time the target last changed (ms)
    last_change_ms: u32,
    /// Time of the last physical write (ms)
    last_write_ms: Option<u32>,
}

impl ActuatorChannel {
    /// Create a channel resting at its mid position
    pub fn new(joint: Joint, limits: ChannelLimits) -> Self {
        Self {
            joint,
            limits,
            current_us: limits.mid_us,
            target_us: limits.mid_us,
            filtered_us: limits.mid_us,
            is_static: true,
            last_change_ms: 0,
            last_write_ms: None,
        }
    }

    /// Joint this channel drives
    pub fn joint(&self) -> Joint {
        self.joint
    }

    /// Channel bounds
    pub fn limits(&self) -> &ChannelLimits {
        &self.limits
    }

    /// Last pulse width written to the output
    pub fn current(&self) -> u16 {
        self.current_us
    }

    /// Desired resting pulse width
    pub fn target(&self) -> u16 {
        self.target_us
    }

    /// Smoothed pulse width
    pub fn filtered(&self) -> u16 {
        self.filtered_us
    }

    /// Check if the channel is locked at its target
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Time the target last changed
    pub fn last_change_ms(&self) -> u32 {
        self.last_change_ms
    }

    /// Set a new target
    ///
    /// Unlocks the channel and restarts the static timeout. Setting the
    /// current target again is a no-op. Returns true if the target changed.
    pub fn retarget(&mut self, pulse_us: u16, now_ms: u32) -> bool {
        let pulse_us = self.limits.clamp(pulse_us);
        if pulse_us == self.target_us {
            return false;
        }
        self.target_us = pulse_us;
        self.is_static = false;
        self.last_change_ms = now_ms;
        true
    }

    /// Check if a physical write is allowed at `now_ms`
    pub fn write_due(&self, now_ms: u32, min_interval_ms: u32) -> bool {
        match self.last_write_ms {
            None => true,
            Some(last) => now_ms.wrapping_sub(last) >= min_interval_ms,
        }
    }

    pub(crate) fn set_filtered(&mut self, pulse_us: u16) {
        self.filtered_us = self.limits.clamp(pulse_us);
    }

    pub(crate) fn lock(&mut self) {
        self.filtered_us = self.target_us;
        self.is_static = true;
    }

    pub(crate) fn record_write(&mut self, pulse_us: u16, now_ms: u32) {
        self.current_us = pulse_us;
        self.last_write_ms = Some(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GRIPPER_LIMITS;

    fn gripper() -> ActuatorChannel {
        ActuatorChannel::new(Joint::Gripper, GRIPPER_LIMITS)
    }

    #[test]
    fn test_new_channel_rests_at_mid() {
        let channel = gripper();
        assert_eq!(channel.current(), 1400);
        assert_eq!(channel.target(), 1400);
        assert_eq!(channel.filtered(), 1400);
        assert!(channel.is_static());
    }

    #[test]
    fn test_retarget_unlocks() {
        let mut channel = gripper();
        assert!(channel.retarget(2000, 1234));
        assert_eq!(channel.target(), 2000);
        assert!(!channel.is_static());
        assert_eq!(channel.last_change_ms(), 1234);
    }

    #[test]
    fn test_retarget_same_value_is_noop() {
        let mut channel = gripper();
        channel.retarget(2000, 10);
        channel.lock();
        assert!(!channel.retarget(2000, 99));
        assert!(channel.is_static());
        assert_eq!(channel.last_change_ms(), 10);
    }

    #[test]
    fn test_retarget_stays_in_bounds() {
        let mut channel = gripper();
        channel.retarget(9000, 0);
        assert_eq!(channel.target(), 2330);
    }

    #[test]
    fn test_write_due() {
        let mut channel = gripper();
        assert!(channel.write_due(0, 20));
        channel.record_write(1500, 100);
        assert!(!channel.write_due(119, 20));
        assert!(channel.write_due(120, 20));
    }

    #[test]
    fn test_write_due_across_timer_wrap() {
        let mut channel = gripper();
        channel.record_write(1500, u32::MAX - 5);
        assert!(!channel.write_due(10, 20));
        assert!(channel.write_due(14, 20));
    }
}

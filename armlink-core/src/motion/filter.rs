//! Exponential motion filter with deadzone and static lock
//!
//! Each pass moves a channel's filtered position a fraction `1/k` of the
//! way toward its target. The physical output is only rewritten when the
//! filtered position has drifted more than the deadzone from what was last
//! written, and never faster than the minimum write interval.
//!
//! Once the filtered position is within the static threshold of the target
//! and the target has been stable for the static timeout, the channel locks:
//! the target is written exactly once, as soon as the write interval allows,
//! and the channel is skipped until it is retargeted.

use crate::config::FilterConfig;
use crate::motion::ActuatorChannel;
use crate::traits::ServoOutput;

/// Outcome of one filter pass on a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Advance {
    /// Channel already locked; nothing done
    Holding,
    /// Filtered position moved, output left alone
    Tracking,
    /// Output rewritten with this pulse width
    Moved(u16),
    /// Channel locked at its target this pass
    Locked,
}

/// Motion filter shared by all channels
#[derive(Debug, Clone, Copy)]
pub struct MotionFilter {
    config: FilterConfig,
}

impl MotionFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Check if a raw host position should retarget `channel`
    ///
    /// Out-of-range values and changes inside the deadzone are ignored.
    pub fn accepts(&self, channel: &ActuatorChannel, raw_us: u16) -> bool {
        channel.limits().contains(raw_us)
            && raw_us.abs_diff(channel.target()) > self.config.deadzone_us
    }

    /// One smoothing step from `filtered` toward `target`
    ///
    /// Integer form of `((k - 1) * filtered + target) / k`, rounded toward
    /// the target so the sequence always reaches it.
    pub fn smooth(&self, filtered: u16, target: u16) -> u16 {
        let k = u32::from(self.config.smoothing.max(1));
        let sum = (k - 1) * u32::from(filtered) + u32::from(target);
        let next = if target > filtered {
            sum.div_ceil(k)
        } else {
            sum / k
        };
        // Always between filtered and target, so it fits
        next as u16
    }

    /// Run one filter pass on `channel`, writing to `servo` as needed
    pub fn advance<S: ServoOutput + ?Sized>(
        &self,
        channel: &mut ActuatorChannel,
        servo: &mut S,
        now_ms: u32,
    ) -> Advance {
        if channel.is_static() {
            return Advance::Holding;
        }

        let target = channel.target();
        let next = self.smooth(channel.filtered(), target);
        channel.set_filtered(next);

        let near = next.abs_diff(target) <= self.config.static_threshold_us;
        let stable =
            now_ms.wrapping_sub(channel.last_change_ms()) > self.config.static_timeout_ms;
        if near && stable {
            if channel.current() == target {
                channel.lock();
                return Advance::Locked;
            }
            // The final write is rate limited like any other
            if channel.write_due(now_ms, self.config.min_write_interval_ms) {
                servo.write_pulse_us(target);
                channel.record_write(target, now_ms);
                channel.lock();
                return Advance::Locked;
            }
            return Advance::Tracking;
        }

        if next.abs_diff(channel.current()) > self.config.deadzone_us
            && channel.write_due(now_ms, self.config.min_write_interval_ms)
        {
            servo.write_pulse_us(next);
            channel.record_write(next, now_ms);
            return Advance::Moved(next);
        }

        Advance::Tracking
    }
}

//! Blinking indicator feedback
//!
//! Confirms controller events on a single indicator output:
//!
//! | Cue | Blinks |
//! |-----|--------|
//! | Disabled | 1 |
//! | Enabled | 2 |
//! | PresetApplied(p) | preset code (1-5) |
//!
//! `cue()` only queues the pattern; `update()` advances it without
//! blocking and must be called periodically (every few ms).

use armlink_core::traits::{Cue, Feedback};
use embedded_hal::digital::OutputPin;

/// Blink timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkConfig {
    /// Time the indicator stays lit per blink (ms)
    pub on_ms: u32,
    /// Gap between blinks (ms)
    pub off_ms: u32,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            on_ms: 80,
            off_ms: 120,
        }
    }
}

/// Feedback sink blinking an output pin
pub struct BlinkFeedback<P> {
    pin: P,
    config: BlinkConfig,
    lit: bool,
    /// Pin edges left in the current pattern
    edges_left: u8,
    /// Time of the last edge, `None` when the next edge is due immediately
    last_edge_ms: Option<u32>,
    /// Failed pin writes
    faults: u32,
}

impl<P: OutputPin> BlinkFeedback<P> {
    /// Create the feedback sink with the indicator off
    pub fn new(pin: P, config: BlinkConfig) -> Self {
        let mut feedback = Self {
            pin,
            config,
            lit: true,
            edges_left: 0,
            last_edge_ms: None,
            faults: 0,
        };
        feedback.set_lit(false);
        feedback
    }

    /// Number of blinks used to announce a cue
    pub fn blinks_for(cue: Cue) -> u8 {
        match cue {
            Cue::Disabled => 1,
            Cue::Enabled => 2,
            Cue::PresetApplied(preset) => preset.code(),
        }
    }

    /// Check if a pattern is still playing
    pub fn is_busy(&self) -> bool {
        self.edges_left > 0
    }

    /// Number of failed pin writes
    pub fn faults(&self) -> u32 {
        self.faults
    }

    /// Advance the current pattern
    pub fn update(&mut self, now_ms: u32) {
        if self.edges_left == 0 {
            return;
        }

        if let Some(last) = self.last_edge_ms {
            let hold = if self.lit {
                self.config.on_ms
            } else {
                self.config.off_ms
            };
            if now_ms.wrapping_sub(last) < hold {
                return;
            }
        }

        self.set_lit(!self.lit);
        self.edges_left -= 1;
        self.last_edge_ms = Some(now_ms);
    }

    fn set_lit(&mut self, lit: bool) {
        if lit == self.lit {
            return;
        }
        let result = if lit {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if result.is_err() {
            self.faults = self.faults.saturating_add(1);
        }
        self.lit = lit;
    }
}

impl<P: OutputPin> Feedback for BlinkFeedback<P> {
    /// Start the pattern for `cue`, replacing any pattern in progress
    fn cue(&mut self, cue: Cue) {
        let blinks = Self::blinks_for(cue);
        if self.lit {
            // Keep last_edge_ms so the gap before the new pattern is honoured
            self.set_lit(false);
        } else if self.edges_left == 0 {
            self.last_edge_ms = None;
        }
        self.edges_left = blinks.saturating_mul(2);
    }
}

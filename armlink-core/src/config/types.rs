//! Configuration type definitions
//!
//! Every timing constant, bound and preset pose is deployment-tunable.
//! Defaults match the reference arm (lift/tilt/gripper hobby servos).

use armlink_protocol::{Joint, Preset};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default lift bounds (µs)
pub const LIFT_LIMITS: ChannelLimits = ChannelLimits::new(960, 1900, 1450);

/// Default tilt bounds (µs)
pub const TILT_LIMITS: ChannelLimits = ChannelLimits::new(1210, 1890, 1550);

/// Default gripper bounds (µs)
pub const GRIPPER_LIMITS: ChannelLimits = ChannelLimits::new(500, 2330, 1400);

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Channel bounds inverted or mid position outside them
    InvalidLimits(Joint),
    /// Preset pose outside a channel's bounds
    PresetOutOfRange { preset: Preset, joint: Joint },
    /// Smoothing factor must be at least 1
    InvalidSmoothing,
    /// Stored configuration could not be decoded
    Decode,
    /// Configuration does not fit the output buffer
    Encode,
}

/// Legal pulse-width range for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelLimits {
    /// Minimum pulse width (µs)
    pub min_us: u16,
    /// Maximum pulse width (µs)
    pub max_us: u16,
    /// Resting position at startup (µs)
    pub mid_us: u16,
}

impl ChannelLimits {
    /// Create channel limits
    pub const fn new(min_us: u16, max_us: u16, mid_us: u16) -> Self {
        Self {
            min_us,
            max_us,
            mid_us,
        }
    }

    /// Check if a pulse width is within bounds (inclusive)
    pub fn contains(&self, pulse_us: u16) -> bool {
        pulse_us >= self.min_us && pulse_us <= self.max_us
    }

    /// Clamp a pulse width to bounds
    pub fn clamp(&self, pulse_us: u16) -> u16 {
        pulse_us.clamp(self.min_us, self.max_us)
    }

    fn is_valid(&self) -> bool {
        self.min_us <= self.max_us && self.contains(self.mid_us)
    }
}

/// Motion filter tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterConfig {
    /// Exponential smoothing factor `k` (1 = no smoothing)
    pub smoothing: u16,
    /// Minimum change before a command or output write counts (µs)
    pub deadzone_us: u16,
    /// Distance from target at which a channel may lock (µs)
    pub static_threshold_us: u16,
    /// Time after a target change before a channel may lock (ms)
    pub static_timeout_ms: u32,
    /// Minimum time between physical writes on one channel (ms)
    pub min_write_interval_ms: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            smoothing: 4,
            deadzone_us: 10,
            static_threshold_us: 3,
            static_timeout_ms: 500,
            min_write_interval_ms: 20,
        }
    }
}

/// Per-joint pose for one preset
///
/// A `None` entry leaves that joint's target unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PresetPosition {
    pub lift: Option<u16>,
    pub tilt: Option<u16>,
    pub gripper: Option<u16>,
}

impl PresetPosition {
    /// Pose with every joint specified
    pub const fn new(lift: u16, tilt: u16, gripper: u16) -> Self {
        Self {
            lift: Some(lift),
            tilt: Some(tilt),
            gripper: Some(gripper),
        }
    }

    /// Target for one joint, if specified
    pub fn get(&self, joint: Joint) -> Option<u16> {
        match joint {
            Joint::Lift => self.lift,
            Joint::Tilt => self.tilt,
            Joint::Gripper => self.gripper,
        }
    }
}

/// Poses for every named preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PresetTable {
    pub home: PresetPosition,
    pub hold: PresetPosition,
    pub lift: PresetPosition,
    pub grip: PresetPosition,
    pub capture: PresetPosition,
}

impl Default for PresetTable {
    fn default() -> Self {
        Self {
            home: PresetPosition::new(1450, 1550, 500),
            hold: PresetPosition::new(1450, 1550, 2300),
            lift: PresetPosition::new(1000, 1890, 2300),
            grip: PresetPosition::new(1900, 1210, 2300),
            capture: PresetPosition::new(1900, 1210, 500),
        }
    }
}

impl PresetTable {
    /// Pose for a preset; `Preset::None` has no pose
    pub fn position(&self, preset: Preset) -> Option<&PresetPosition> {
        match preset {
            Preset::None => None,
            Preset::Home => Some(&self.home),
            Preset::Hold => Some(&self.hold),
            Preset::Lift => Some(&self.lift),
            Preset::Grip => Some(&self.grip),
            Preset::Capture => Some(&self.capture),
        }
    }
}

/// Complete controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControllerConfig {
    /// Minimum time between filter/preset passes (ms)
    pub cycle_interval_ms: u32,
    /// Motion filter tuning
    pub filter: FilterConfig,
    /// Lift channel bounds
    pub lift: ChannelLimits,
    /// Tilt channel bounds
    pub tilt: ChannelLimits,
    /// Gripper channel bounds
    pub gripper: ChannelLimits,
    /// Preset poses
    pub presets: PresetTable,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            cycle_interval_ms: 20,
            filter: FilterConfig::default(),
            lift: LIFT_LIMITS,
            tilt: TILT_LIMITS,
            gripper: GRIPPER_LIMITS,
            presets: PresetTable::default(),
        }
    }
}

impl ControllerConfig {
    /// Bounds for one joint
    pub fn limits(&self, joint: Joint) -> ChannelLimits {
        match joint {
            Joint::Lift => self.lift,
            Joint::Tilt => self.tilt,
            Joint::Gripper => self.gripper,
        }
    }

    /// Check the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.filter.smoothing == 0 {
            return Err(ConfigError::InvalidSmoothing);
        }

        for joint in Joint::ALL {
            if !self.limits(joint).is_valid() {
                return Err(ConfigError::InvalidLimits(joint));
            }
        }

        const NAMED: [Preset; 5] = [
            Preset::Home,
            Preset::Hold,
            Preset::Lift,
            Preset::Grip,
            Preset::Capture,
        ];
        for preset in NAMED {
            let Some(position) = self.presets.position(preset) else {
                continue;
            };
            for joint in Joint::ALL {
                if let Some(pulse_us) = position.get(joint) {
                    if !self.limits(joint).contains(pulse_us) {
                        return Err(ConfigError::PresetOutOfRange { preset, joint });
                    }
                }
            }
        }

        Ok(())
    }
}

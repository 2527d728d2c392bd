//! Message types carried by the shared-state record
//!
//! The record is split into two views:
//! - [`Commands`]: everything the host writes (decoded at ingest)
//! - [`Status`]: everything the controller writes (encoded at publish)

use heapless::String;

use crate::layout::{
    self, read_i16, read_u16, write_i16, write_u16, ANALOG_COUNT, BUTTON_COUNT, LED_COUNT,
    NOTES_LEN, SHARED_STATE_SIZE,
};

/// Number of servo channels
pub const JOINT_COUNT: usize = 3;

/// Servo channel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Joint {
    /// Arm lift (vertical)
    Lift,
    /// Wrist tilt
    Tilt,
    /// Gripper jaws
    Gripper,
}

impl Joint {
    /// All joints in register order
    pub const ALL: [Joint; JOINT_COUNT] = [Joint::Lift, Joint::Tilt, Joint::Gripper];

    /// Index of this joint in per-joint arrays
    pub const fn index(self) -> usize {
        match self {
            Joint::Lift => 0,
            Joint::Tilt => 1,
            Joint::Gripper => 2,
        }
    }

    /// Offset of this joint's pulse-width register
    pub const fn register(self) -> usize {
        layout::SERVO_POSITIONS + self.index() * 2
    }
}

/// Named arm pose selected by a small integer code
///
/// Code 0 is reserved for "no preset" and never resolves to a motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Preset {
    /// No preset active
    #[default]
    None,
    /// Lift mid, tilt flat, gripper open
    Home,
    /// Lift mid, tilt flat, gripper closed
    Hold,
    /// Lift up, tilt up, gripper closed
    Lift,
    /// Lift down, tilt down, gripper closed
    Grip,
    /// Lift down, tilt down, gripper open
    Capture,
}

impl Preset {
    /// Decode a preset code
    ///
    /// Unknown codes decode as [`Preset::None`].
    pub const fn from_code(code: u8) -> Self {
        match code {
            1 => Preset::Home,
            2 => Preset::Hold,
            3 => Preset::Lift,
            4 => Preset::Grip,
            5 => Preset::Capture,
            _ => Preset::None,
        }
    }

    /// Wire code for this preset
    pub const fn code(self) -> u8 {
        match self {
            Preset::None => 0,
            Preset::Home => 1,
            Preset::Hold => 2,
            Preset::Lift => 3,
            Preset::Grip => 4,
            Preset::Capture => 5,
        }
    }

    /// Check if this is the "no preset" code
    pub const fn is_none(self) -> bool {
        matches!(self, Preset::None)
    }
}

/// Tone string requested by the host
///
/// Stored as ASCII up to the first NUL. Non-UTF-8 content decodes as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToneSequence {
    notes: String<NOTES_LEN>,
}

impl ToneSequence {
    /// Build from the raw register bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let bytes = &bytes[..bytes.len().min(NOTES_LEN)];
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        let mut notes = String::new();
        if let Ok(text) = core::str::from_utf8(&bytes[..end]) {
            // Cannot overflow, length is bounded above
            let _ = notes.push_str(text);
        }
        Self { notes }
    }

    /// Tone string as text
    pub fn as_str(&self) -> &str {
        self.notes.as_str()
    }

    /// Check if no notes were given
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Command fields written by the host
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Commands {
    /// Indicator outputs (yellow, green, red)
    pub leds: [bool; LED_COUNT],
    /// Left drive motor speed
    pub left_motor: i16,
    /// Right drive motor speed
    pub right_motor: i16,
    /// Tone playback requested
    pub play_notes: bool,
    /// Tone string to play
    pub notes: ToneSequence,
    /// Requested preset
    pub preset: Preset,
    /// Servo outputs requested live
    pub servo_enable: bool,
    /// Raw pulse-width targets (lift, tilt, gripper)
    pub positions: [u16; JOINT_COUNT],
}

impl Commands {
    /// Decode the command view of a record image
    pub fn decode(image: &[u8; SHARED_STATE_SIZE]) -> Self {
        let mut leds = [false; LED_COUNT];
        for (i, led) in leds.iter_mut().enumerate() {
            *led = image[layout::LEDS + i] != 0;
        }

        let mut positions = [0u16; JOINT_COUNT];
        for joint in Joint::ALL {
            positions[joint.index()] = read_u16(image, joint.register());
        }

        Self {
            leds,
            left_motor: read_i16(image, layout::LEFT_MOTOR),
            right_motor: read_i16(image, layout::RIGHT_MOTOR),
            play_notes: image[layout::PLAY_NOTES] != 0,
            notes: ToneSequence::from_bytes(&image[layout::NOTES..layout::NOTES + NOTES_LEN]),
            preset: Preset::from_code(image[layout::SERVO_PRESET]),
            servo_enable: image[layout::SERVO_ENABLE] != 0,
            positions,
        }
    }

    /// Raw target for one joint
    pub fn position(&self, joint: Joint) -> u16 {
        self.positions[joint.index()]
    }
}

/// Servo fields the controller echoes back into the shared registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoEcho {
    /// Currently active preset
    pub preset: Preset,
    /// Targets actually being driven (lift, tilt, gripper)
    pub positions: [u16; JOINT_COUNT],
}

/// Status fields written by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// Button states (A, B, C)
    pub buttons: [bool; BUTTON_COUNT],
    /// Battery voltage in millivolts
    pub battery_mv: u16,
    /// Analog readings
    pub analog: [u16; ANALOG_COUNT],
    /// Left encoder count
    pub left_encoder: i16,
    /// Right encoder count
    pub right_encoder: i16,
    /// Servo outputs currently live
    pub servo_enabled: bool,
    /// Servo echo for this cycle
    ///
    /// `None` leaves the preset and position registers untouched so that
    /// host writes not yet acted upon stay visible to the next ingest.
    pub servo: Option<ServoEcho>,
}

impl Status {
    /// Encode the status view into a record image
    ///
    /// Host-owned bytes are left as they are.
    pub fn encode_into(&self, image: &mut [u8; SHARED_STATE_SIZE]) {
        for (i, &pressed) in self.buttons.iter().enumerate() {
            image[layout::BUTTONS + i] = pressed as u8;
        }
        write_u16(image, layout::BATTERY_MV, self.battery_mv);
        for (i, &value) in self.analog.iter().enumerate() {
            write_u16(image, layout::ANALOG + i * 2, value);
        }
        write_i16(image, layout::LEFT_ENCODER, self.left_encoder);
        write_i16(image, layout::RIGHT_ENCODER, self.right_encoder);
        image[layout::SERVO_ENABLE] = self.servo_enabled as u8;

        if let Some(echo) = self.servo {
            image[layout::SERVO_PRESET] = echo.preset.code();
            for joint in Joint::ALL {
                write_u16(image, joint.register(), echo.positions[joint.index()]);
            }
        }
    }
}

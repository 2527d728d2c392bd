//! Host-side request builders
//!
//! Produces the exact byte sequences the host puts on the bus, so host
//! tooling and simulations share one definition of the register map.
//!
//! ```ignore
//! let write = HostWrite::servo_position(Joint::Lift, 1450);
//! bus.write(ARMLINK_I2C_ADDRESS, write.as_bytes())?;
//! ```
//!
//! Parking is two writes with a pause in between:
//!
//! ```ignore
//! let [home, disable] = HostWrite::park();
//! bus.write(ARMLINK_I2C_ADDRESS, home.as_bytes())?;
//! delay_ms(PARK_SETTLE_MS);
//! bus.write(ARMLINK_I2C_ADDRESS, disable.as_bytes())?;
//! ```

use heapless::Vec;

use crate::layout::{self, NOTES_LEN, SHARED_STATE_SIZE};
use crate::message::{Joint, Preset};

/// 7-bit I2C address of the controller
pub const ARMLINK_I2C_ADDRESS: u8 = 20;

/// Time for the arm to reach the home pose before a park disables it
pub const PARK_SETTLE_MS: u32 = 2000;

/// Maximum size of a host write transaction (offset byte + full record)
pub const MAX_WRITE_SIZE: usize = SHARED_STATE_SIZE + 1;

/// Errors building a host request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestError {
    /// Tone string longer than the notes register
    NotesTooLong,
    /// Tone string is not ASCII
    NotesNotAscii,
}

/// A write transaction: register offset followed by data bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostWrite {
    bytes: Vec<u8, MAX_WRITE_SIZE>,
}

impl HostWrite {
    fn new(offset: usize, data: &[u8]) -> Self {
        let mut bytes = Vec::new();
        // Offsets and data lengths below are fixed by the layout and always fit
        let _ = bytes.push(offset as u8);
        let _ = bytes.extend_from_slice(data);
        Self { bytes }
    }

    /// Set the indicator outputs (yellow, green, red)
    pub fn leds(yellow: bool, green: bool, red: bool) -> Self {
        Self::new(layout::LEDS, &[yellow as u8, green as u8, red as u8])
    }

    /// Set both drive motor speeds
    pub fn motors(left: i16, right: i16) -> Self {
        let l = left.to_le_bytes();
        let r = right.to_le_bytes();
        Self::new(layout::LEFT_MOTOR, &[l[0], l[1], r[0], r[1]])
    }

    /// Request a tone sequence
    pub fn play_notes(notes: &str) -> Result<Self, RequestError> {
        if notes.len() > NOTES_LEN {
            return Err(RequestError::NotesTooLong);
        }
        if !notes.is_ascii() {
            return Err(RequestError::NotesNotAscii);
        }

        let mut data = [0u8; NOTES_LEN + 1];
        data[0] = 1;
        data[1..1 + notes.len()].copy_from_slice(notes.as_bytes());
        Ok(Self::new(layout::PLAY_NOTES, &data))
    }

    /// Enable or disable the servo outputs
    pub fn servo_enable(enable: bool) -> Self {
        Self::new(layout::SERVO_ENABLE, &[enable as u8])
    }

    /// Select a preset pose
    pub fn servo_preset(preset: Preset) -> Self {
        Self::new(layout::SERVO_PRESET, &[preset.code()])
    }

    /// Set a raw pulse-width target for one joint
    pub fn servo_position(joint: Joint, pulse_us: u16) -> Self {
        Self::new(joint.register(), &pulse_us.to_le_bytes())
    }

    /// Park sequence: select the home pose, then disable the outputs
    ///
    /// Send the second write only after [`PARK_SETTLE_MS`].
    pub fn park() -> [Self; 2] {
        [Self::servo_preset(Preset::Home), Self::servo_enable(false)]
    }

    /// Raw transaction bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A read transaction: the offset to select and how many bytes follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostRead {
    /// Register offset to select before reading
    pub offset: u8,
    /// Number of bytes to read
    pub len: usize,
}

impl HostRead {
    const fn new(offset: usize, len: usize) -> Self {
        Self {
            offset: offset as u8,
            len,
        }
    }

    /// Button states (3 bytes)
    pub const fn buttons() -> Self {
        Self::new(layout::BUTTONS, layout::BUTTON_COUNT)
    }

    /// Battery millivolts (2 bytes)
    pub const fn battery() -> Self {
        Self::new(layout::BATTERY_MV, 2)
    }

    /// Analog readings (12 bytes)
    pub const fn analog() -> Self {
        Self::new(layout::ANALOG, layout::ANALOG_COUNT * 2)
    }

    /// Encoder counts (4 bytes)
    pub const fn encoders() -> Self {
        Self::new(layout::LEFT_ENCODER, 4)
    }

    /// Active preset and enable state (2 bytes)
    pub const fn servo_status() -> Self {
        Self::new(layout::SERVO_PRESET, 2)
    }

    /// Driven pulse widths for all joints (6 bytes)
    pub const fn servo_positions() -> Self {
        Self::new(layout::SERVO_POSITIONS, 6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::RegisterBank;

    #[test]
    fn test_servo_position_bytes() {
        let write = HostWrite::servo_position(Joint::Tilt, 1550);
        assert_eq!(write.as_bytes(), &[47, 0x0E, 0x06]);
    }

    #[test]
    fn test_motor_bytes() {
        let write = HostWrite::motors(-400, 400);
        assert_eq!(write.as_bytes(), &[6, 0x70, 0xFE, 0x90, 0x01]);
    }

    #[test]
    fn test_play_notes_pads_with_nul() {
        let write = HostWrite::play_notes("cdef").unwrap();
        let bytes = write.as_bytes();
        assert_eq!(bytes.len(), 1 + 1 + NOTES_LEN);
        assert_eq!(bytes[0], layout::PLAY_NOTES as u8);
        assert_eq!(bytes[1], 1);
        assert_eq!(&bytes[2..6], b"cdef");
        assert!(bytes[6..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_play_notes_rejects_bad_input() {
        assert_eq!(
            HostWrite::play_notes("abcdefghijklmno"),
            Err(RequestError::NotesTooLong)
        );
        assert_eq!(HostWrite::play_notes("é"), Err(RequestError::NotesNotAscii));
    }

    #[test]
    fn test_requests_land_in_commands() {
        let mut bank = RegisterBank::new();
        bank.host_write(HostWrite::leds(true, false, true).as_bytes());
        bank.host_write(HostWrite::motors(100, -100).as_bytes());
        bank.host_write(HostWrite::play_notes("v10c").unwrap().as_bytes());
        bank.host_write(HostWrite::servo_enable(true).as_bytes());
        bank.host_write(HostWrite::servo_preset(Preset::Capture).as_bytes());
        bank.host_write(HostWrite::servo_position(Joint::Gripper, 2300).as_bytes());

        let commands = bank.ingest();
        assert_eq!(commands.leds, [true, false, true]);
        assert_eq!((commands.left_motor, commands.right_motor), (100, -100));
        assert!(commands.play_notes);
        assert_eq!(commands.notes.as_str(), "v10c");
        assert!(commands.servo_enable);
        assert_eq!(commands.preset, Preset::Capture);
        assert_eq!(commands.position(Joint::Gripper), 2300);
    }

    #[test]
    fn test_park_is_home_then_disable() {
        let [home, disable] = HostWrite::park();
        assert_eq!(home.as_bytes(), &[layout::SERVO_PRESET as u8, Preset::Home.code()]);
        assert_eq!(disable.as_bytes(), &[layout::SERVO_ENABLE as u8, 0]);
    }

    #[test]
    fn test_read_windows_cover_status() {
        assert_eq!(HostRead::buttons(), HostRead { offset: 3, len: 3 });
        assert_eq!(HostRead::battery(), HostRead { offset: 10, len: 2 });
        assert_eq!(HostRead::analog(), HostRead { offset: 12, len: 12 });
        assert_eq!(HostRead::encoders(), HostRead { offset: 39, len: 4 });
        assert_eq!(HostRead::servo_status(), HostRead { offset: 43, len: 2 });
        assert_eq!(HostRead::servo_positions(), HostRead { offset: 45, len: 6 });
    }
}

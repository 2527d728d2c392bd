//! Byte layout of the shared-state record
//!
//! Offsets and widths are fixed and must match the host build exactly.
//! All multi-byte fields are little-endian.

/// Total size of the shared-state record in bytes
pub const SHARED_STATE_SIZE: usize = 51;

/// Indicator outputs (yellow, green, red), one bool byte each
pub const LEDS: usize = 0;
pub const LED_COUNT: usize = 3;

/// Momentary buttons A, B, C, one bool byte each
pub const BUTTONS: usize = 3;
pub const BUTTON_COUNT: usize = 3;

/// Drive motor speeds (i16 each)
pub const LEFT_MOTOR: usize = 6;
pub const RIGHT_MOTOR: usize = 8;

/// Battery voltage in millivolts (u16)
pub const BATTERY_MV: usize = 10;

/// Analog readings (u16 each)
pub const ANALOG: usize = 12;
pub const ANALOG_COUNT: usize = 6;

/// Tone playback request flag
pub const PLAY_NOTES: usize = 24;

/// Tone string, ASCII, NUL padded
pub const NOTES: usize = 25;
pub const NOTES_LEN: usize = 14;

/// Encoder counts (i16 each)
pub const LEFT_ENCODER: usize = 39;
pub const RIGHT_ENCODER: usize = 41;

/// Preset selector / active preset echo
pub const SERVO_PRESET: usize = 43;

/// Servo enable request / enable state echo
pub const SERVO_ENABLE: usize = 44;

/// Servo pulse widths (u16 each, lift, tilt, gripper)
pub const SERVO_POSITIONS: usize = 45;

const _: () = assert!(SERVO_POSITIONS + 3 * 2 == SHARED_STATE_SIZE);
const _: () = assert!(NOTES + NOTES_LEN == LEFT_ENCODER);
const _: () = assert!(ANALOG + ANALOG_COUNT * 2 == PLAY_NOTES);

/// Which side of the link writes a given byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Owner {
    /// Written by the host only
    Host,
    /// Written by the controller only
    Device,
    /// Written by the host as a command and overwritten by the controller
    /// with the value it is actually driving
    Echo,
}

/// Get the owner of the byte at `offset`
///
/// Returns `None` for offsets past the end of the record.
pub const fn owner_of(offset: usize) -> Option<Owner> {
    match offset {
        0..=2 => Some(Owner::Host),
        3..=5 => Some(Owner::Device),
        6..=9 => Some(Owner::Host),
        10..=23 => Some(Owner::Device),
        24..=38 => Some(Owner::Host),
        39..=42 => Some(Owner::Device),
        43..=50 => Some(Owner::Echo),
        _ => None,
    }
}

/// Check whether the host may write the byte at `offset`
pub const fn host_writable(offset: usize) -> bool {
    matches!(owner_of(offset), Some(Owner::Host) | Some(Owner::Echo))
}

pub(crate) fn read_u16(image: &[u8; SHARED_STATE_SIZE], offset: usize) -> u16 {
    u16::from_le_bytes([image[offset], image[offset + 1]])
}

pub(crate) fn read_i16(image: &[u8; SHARED_STATE_SIZE], offset: usize) -> i16 {
    i16::from_le_bytes([image[offset], image[offset + 1]])
}

pub(crate) fn write_u16(image: &mut [u8; SHARED_STATE_SIZE], offset: usize, value: u16) {
    image[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn write_i16(image: &mut [u8; SHARED_STATE_SIZE], offset: usize, value: i16) {
    image[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_byte_has_an_owner() {
        for offset in 0..SHARED_STATE_SIZE {
            assert!(owner_of(offset).is_some(), "offset {} unowned", offset);
        }
        assert_eq!(owner_of(SHARED_STATE_SIZE), None);
    }

    #[test]
    fn test_status_bytes_not_host_writable() {
        assert!(!host_writable(BUTTONS));
        assert!(!host_writable(BATTERY_MV));
        assert!(!host_writable(ANALOG + 11));
        assert!(!host_writable(LEFT_ENCODER));
        assert!(!host_writable(RIGHT_ENCODER + 1));
    }

    #[test]
    fn test_command_and_echo_bytes_host_writable() {
        assert!(host_writable(LEDS));
        assert!(host_writable(LEFT_MOTOR));
        assert!(host_writable(PLAY_NOTES));
        assert!(host_writable(NOTES + NOTES_LEN - 1));
        assert!(host_writable(SERVO_PRESET));
        assert!(host_writable(SERVO_ENABLE));
        assert!(host_writable(SERVO_POSITIONS + 5));
    }

    #[test]
    fn test_little_endian_fields() {
        let mut image = [0u8; SHARED_STATE_SIZE];
        write_u16(&mut image, SERVO_POSITIONS, 1450);
        assert_eq!(image[SERVO_POSITIONS], 0xAA);
        assert_eq!(image[SERVO_POSITIONS + 1], 0x05);
        assert_eq!(read_u16(&image, SERVO_POSITIONS), 1450);

        write_i16(&mut image, LEFT_MOTOR, -400);
        assert_eq!(read_i16(&image, LEFT_MOTOR), -400);
    }
}

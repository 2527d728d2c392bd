//! Register bank backing the I2C target
//!
//! The bank holds two copies of the record:
//! - the image, which is what the host reads
//! - a staging area, where host writes land until the next ingest
//!
//! Host writes are tracked per byte so that ingest only overlays bytes the
//! host actually wrote, and never clobbers status the controller published.
//! Publishing builds the new image in a scratch copy and commits it with a
//! single assignment, so a host read never sees a half-published status as
//! long as bus access and publish are serialized (e.g. by a critical section).

use crate::layout::{host_writable, SHARED_STATE_SIZE};
use crate::message::{Commands, Status};

/// Double-buffered register bank
#[derive(Debug, Clone)]
pub struct RegisterBank {
    /// Host-visible record
    image: [u8; SHARED_STATE_SIZE],
    /// Host writes not yet ingested
    staged: [u8; SHARED_STATE_SIZE],
    /// Bit `n` set when byte `n` of `staged` holds a pending host write
    pending: u64,
    /// Register pointer for the next host access
    pointer: usize,
}

const _: () = assert!(SHARED_STATE_SIZE <= u64::BITS as usize);

impl Default for RegisterBank {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBank {
    /// Create a zeroed register bank
    pub const fn new() -> Self {
        Self {
            image: [0; SHARED_STATE_SIZE],
            staged: [0; SHARED_STATE_SIZE],
            pending: 0,
            pointer: 0,
        }
    }

    /// Handle a host write transaction
    ///
    /// The first byte selects the register offset; remaining bytes are
    /// stored at consecutive offsets. Bytes aimed at controller-owned
    /// registers or past the end of the record are dropped.
    ///
    /// Returns the number of data bytes accepted.
    pub fn host_write(&mut self, bytes: &[u8]) -> usize {
        let Some((&offset, data)) = bytes.split_first() else {
            return 0;
        };

        self.pointer = offset as usize;
        let mut accepted = 0;
        for &byte in data {
            let offset = self.pointer;
            if offset < SHARED_STATE_SIZE && host_writable(offset) {
                self.staged[offset] = byte;
                self.pending |= 1 << offset;
                accepted += 1;
            }
            self.pointer = self.pointer.saturating_add(1);
        }
        accepted
    }

    /// Handle a host read transaction
    ///
    /// Fills `out` starting at the register pointer and advances it.
    /// Reads past the end of the record return zero.
    pub fn host_read(&mut self, out: &mut [u8]) {
        self.peek(out);
        self.advance(out.len());
    }

    /// Copy bytes from the register pointer without moving it
    ///
    /// For bus drivers that hand the host a snapshot and only learn
    /// afterwards how many bytes were clocked out.
    pub fn peek(&self, out: &mut [u8]) {
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = self
                .image
                .get(self.pointer.saturating_add(i))
                .copied()
                .unwrap_or(0);
        }
    }

    /// Move the register pointer past bytes the host has read
    pub fn advance(&mut self, count: usize) {
        self.pointer = self.pointer.saturating_add(count);
    }

    /// Current register pointer
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Check if host writes are waiting to be ingested
    pub fn has_pending_writes(&self) -> bool {
        self.pending != 0
    }

    /// Host-visible record image
    pub fn image(&self) -> &[u8; SHARED_STATE_SIZE] {
        &self.image
    }

    /// Pull pending host writes into the image and decode the commands
    pub fn ingest(&mut self) -> Commands {
        if self.pending != 0 {
            self.image = merge(&self.image, &self.staged, self.pending);
            self.pending = 0;
        }
        Commands::decode(&self.image)
    }

    /// Commit the controller's status to the host-visible image
    pub fn publish(&mut self, status: &Status) {
        let mut next = self.image;
        status.encode_into(&mut next);
        self.image = next;
    }
}

/// Overlay the pending bytes of `staged` onto `image`
fn merge(
    image: &[u8; SHARED_STATE_SIZE],
    staged: &[u8; SHARED_STATE_SIZE],
    pending: u64,
) -> [u8; SHARED_STATE_SIZE] {
    let mut merged = *image;
    for (offset, byte) in merged.iter_mut().enumerate() {
        if pending & (1 << offset) != 0 {
            *byte = staged[offset];
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout;
    use crate::message::{Joint, Preset, ServoEcho};

    #[test]
    fn test_write_is_staged_until_ingest() {
        let mut bank = RegisterBank::new();
        let accepted = bank.host_write(&[layout::SERVO_ENABLE as u8, 1]);
        assert_eq!(accepted, 1);
        assert!(bank.has_pending_writes());

        // Host reads back the image, not the staged write
        bank.host_write(&[layout::SERVO_ENABLE as u8]);
        let mut out = [0xFFu8; 1];
        bank.host_read(&mut out);
        assert_eq!(out, [0]);

        let commands = bank.ingest();
        assert!(commands.servo_enable);
        assert!(!bank.has_pending_writes());
        assert_eq!(bank.image()[layout::SERVO_ENABLE], 1);
    }

    #[test]
    fn test_writes_to_status_bytes_dropped() {
        let mut bank = RegisterBank::new();
        let accepted = bank.host_write(&[layout::BATTERY_MV as u8, 0x34, 0x12]);
        assert_eq!(accepted, 0);
        assert!(!bank.has_pending_writes());
        bank.ingest();
        assert_eq!(bank.image()[layout::BATTERY_MV], 0);
    }

    #[test]
    fn test_write_spanning_owner_boundary() {
        let mut bank = RegisterBank::new();
        // LEDs 0..3 are host-owned, buttons 3..6 are not
        let accepted = bank.host_write(&[0, 1, 1, 1, 1, 1]);
        assert_eq!(accepted, 3);
        let commands = bank.ingest();
        assert_eq!(commands.leds, [true, true, true]);
        assert_eq!(bank.image()[layout::BUTTONS], 0);
    }

    #[test]
    fn test_write_past_end_dropped() {
        let mut bank = RegisterBank::new();
        let accepted = bank.host_write(&[49, 0x10, 0x27, 0xAA, 0xBB]);
        assert_eq!(accepted, 2);
        let commands = bank.ingest();
        assert_eq!(commands.position(Joint::Gripper), 10000);
    }

    #[test]
    fn test_read_advances_pointer() {
        let mut bank = RegisterBank::new();
        bank.publish(&Status {
            battery_mv: 0x1234,
            ..Default::default()
        });

        bank.host_write(&[layout::BATTERY_MV as u8]);
        let mut lo = [0u8; 1];
        let mut hi = [0u8; 1];
        bank.host_read(&mut lo);
        bank.host_read(&mut hi);
        assert_eq!((lo[0], hi[0]), (0x34, 0x12));
        assert_eq!(bank.pointer(), layout::BATTERY_MV + 2);
    }

    #[test]
    fn test_read_past_end_returns_zero() {
        let mut bank = RegisterBank::new();
        bank.publish(&Status {
            servo_enabled: true,
            servo: Some(ServoEcho {
                preset: Preset::None,
                positions: [0xFFFF; 3],
            }),
            ..Default::default()
        });
        bank.host_write(&[50]);
        let mut out = [0xAAu8; 3];
        bank.host_read(&mut out);
        assert_eq!(out, [0xFF, 0, 0]);
    }

    #[test]
    fn test_publish_does_not_discard_pending_host_write() {
        let mut bank = RegisterBank::new();
        bank.host_write(&[layout::SERVO_POSITIONS as u8, 0xDC, 0x05]); // 1500

        bank.publish(&Status {
            servo: Some(ServoEcho {
                preset: Preset::None,
                positions: [1450, 1550, 1400],
            }),
            ..Default::default()
        });

        // The host write arrived after the previous ingest; it wins at the next one
        let commands = bank.ingest();
        assert_eq!(commands.position(Joint::Lift), 1500);
        assert_eq!(commands.position(Joint::Tilt), 1550);
    }

    #[test]
    fn test_publish_without_echo_keeps_host_commands() {
        let mut bank = RegisterBank::new();
        bank.host_write(&[layout::SERVO_PRESET as u8, 4]);
        let commands = bank.ingest();
        assert_eq!(commands.preset, Preset::Grip);

        bank.publish(&Status::default());
        assert_eq!(bank.ingest().preset, Preset::Grip);
    }

    #[test]
    fn test_peek_then_advance() {
        let mut bank = RegisterBank::new();
        bank.publish(&Status {
            battery_mv: 0x1234,
            ..Default::default()
        });
        bank.host_write(&[layout::BATTERY_MV as u8]);

        let mut out = [0u8; 4];
        bank.peek(&mut out);
        assert_eq!(&out[..2], &[0x34, 0x12]);
        assert_eq!(bank.pointer(), layout::BATTERY_MV);

        // Host stopped after one byte
        bank.advance(1);
        let mut hi = [0u8; 1];
        bank.host_read(&mut hi);
        assert_eq!(hi, [0x12]);
    }

    #[test]
    fn test_empty_write_is_ignored() {
        let mut bank = RegisterBank::new();
        assert_eq!(bank.host_write(&[]), 0);
        assert_eq!(bank.pointer(), 0);
    }
}

//! Property tests for the register bank

use armlink_protocol::layout::{owner_of, Owner};
use armlink_protocol::{RegisterBank, Status, SHARED_STATE_SIZE};
use proptest::prelude::*;

fn published_bank() -> RegisterBank {
    let mut bank = RegisterBank::new();
    bank.publish(&Status {
        buttons: [true, false, true],
        battery_mv: 7400,
        analog: [11, 22, 33, 44, 55, 66],
        left_encoder: -120,
        right_encoder: 340,
        ..Default::default()
    });
    bank
}

proptest! {
    #[test]
    fn test_host_writes_never_touch_device_bytes(
        writes in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..60), 0..20)
    ) {
        let mut bank = published_bank();
        let before = *bank.image();

        for write in &writes {
            bank.host_write(write);
        }
        bank.ingest();

        for offset in 0..SHARED_STATE_SIZE {
            if owner_of(offset) == Some(Owner::Device) {
                prop_assert_eq!(bank.image()[offset], before[offset]);
            }
        }
    }

    #[test]
    fn test_read_matches_image(offset in 0u8..64, len in 0usize..64) {
        let mut bank = published_bank();
        bank.host_write(&[offset]);
        let mut out = vec![0u8; len];
        bank.host_read(&mut out);

        for (i, &byte) in out.iter().enumerate() {
            let expected = bank.image().get(offset as usize + i).copied().unwrap_or(0);
            prop_assert_eq!(byte, expected);
        }
        prop_assert_eq!(bank.pointer(), offset as usize + len);
    }
}

//! Shared state between Embassy tasks
//!
//! The register bank is touched by the bus task (host transactions) and the
//! control task (ingest/publish). Every access goes through a critical
//! section, so a host read always sees a fully published image.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use armlink_protocol::RegisterBank;

/// Register bank exposed on the I2C target
pub static REGISTER_BANK: Mutex<CriticalSectionRawMutex, RefCell<RegisterBank>> =
    Mutex::new(RefCell::new(RegisterBank::new()));

/// Run `f` with exclusive access to the register bank
pub fn with_bank<R>(f: impl FnOnce(&mut RegisterBank) -> R) -> R {
    REGISTER_BANK.lock(|bank| f(&mut bank.borrow_mut()))
}

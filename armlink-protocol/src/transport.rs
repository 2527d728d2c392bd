//! Controller-side exchange interface
//!
//! The controller's cycle loop talks to the shared record only through
//! [`Exchange`]. The bus driver behind it decides how host transactions
//! reach the record (interrupt, async task, test harness).

use crate::bank::RegisterBank;
use crate::message::{Commands, Status};

/// One side of the per-cycle shared-state exchange
///
/// Call [`ingest`](Exchange::ingest) exactly once at the top of a cycle and
/// [`publish`](Exchange::publish) exactly once at the bottom. Between the two
/// the controller's view of the commands is frozen.
pub trait Exchange {
    /// Pull the freshest host-written commands
    fn ingest(&mut self) -> Commands;

    /// Make the controller's status visible to the host
    fn publish(&mut self, status: &Status);
}

impl Exchange for RegisterBank {
    fn ingest(&mut self) -> Commands {
        RegisterBank::ingest(self)
    }

    fn publish(&mut self, status: &Status) {
        RegisterBank::publish(self, status)
    }
}

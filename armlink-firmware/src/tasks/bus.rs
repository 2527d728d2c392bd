//! I2C target task
//!
//! Serves host transactions against the register bank:
//! - write: `[offset, data...]` staged for the next ingest
//! - read: bytes from the register pointer, auto-incrementing

use defmt::*;
use embassy_rp::i2c_slave::{Command, I2cSlave, ReadStatus};
use embassy_rp::peripherals::I2C0;

use armlink_protocol::host::MAX_WRITE_SIZE;
use armlink_protocol::SHARED_STATE_SIZE;

use crate::channels::with_bank;

/// I2C target task
#[embassy_executor::task]
pub async fn bus_task(mut device: I2cSlave<'static, I2C0>) {
    info!("Bus task started");

    let mut buf = [0u8; MAX_WRITE_SIZE];

    loop {
        match device.listen(&mut buf).await {
            Ok(Command::Write(len)) => {
                let accepted = with_bank(|bank| bank.host_write(&buf[..len]));
                trace!("Host write: {} bytes, {} accepted", len, accepted);
            }
            Ok(Command::WriteRead(len)) => {
                with_bank(|bank| bank.host_write(&buf[..len]));
                respond(&mut device).await;
            }
            Ok(Command::Read) => respond(&mut device).await,
            Ok(Command::GeneralCall(_)) => {
                debug!("Ignoring general call");
            }
            Err(e) => {
                warn!("I2C listen error: {:?}", e);
            }
        }
    }
}

/// Answer a host read from the register pointer
///
/// The host gets a snapshot taken under the bank lock; the pointer only
/// moves past the bytes actually clocked out.
async fn respond(device: &mut I2cSlave<'static, I2C0>) {
    let mut out = [0u8; SHARED_STATE_SIZE];
    with_bank(|bank| bank.peek(&mut out));

    match device.respond_and_fill(&out, 0).await {
        Ok(ReadStatus::Done) | Ok(ReadStatus::NeedMoreBytes) => {
            with_bank(|bank| bank.advance(out.len()));
        }
        Ok(ReadStatus::LeftoverBytes(left)) => {
            let sent = out.len().saturating_sub(left as usize);
            with_bank(|bank| bank.advance(sent));
        }
        Err(e) => {
            warn!("I2C read error: {:?}", e);
        }
    }
}

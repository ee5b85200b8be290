//! Readiness polling
//!
//! The codec signals loader and DSP state through a single status register.
//! Polling is bounded by an attempt count, not a wall-clock deadline; the
//! delay between attempts is delegated to the port so the same loop works
//! on a host and on an embedded target.

use crate::error::{Error, Result};
use crate::regmap::RegisterPort;
use maybe_async::maybe_async;

/// Attempt budget and pacing for a readiness poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Status reads before giving up
    pub max_attempts: u32,
    /// Delay after each read that did not match, in microseconds
    pub interval_us: u32,
}

impl PollConfig {
    /// Create a poll configuration
    pub const fn new(max_attempts: u32, interval_us: u32) -> Self {
        Self {
            max_attempts,
            interval_us,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new(
            crate::cx2070x::READY_POLL_ATTEMPTS,
            crate::cx2070x::READY_POLL_INTERVAL_US,
        )
    }
}

/// Poll `reg` until it reads back `target`
///
/// Returns the number of reads it took. A failed read aborts the poll with
/// that error; only a successful read of the wrong value is retried.
/// After `max_attempts` mismatching reads the result is [`Error::Timeout`].
///
/// Every mismatching read is followed by a delay, including the last one,
/// so a timeout costs `max_attempts` delays. The CX2070x driver paces its
/// loader wait the same way.
#[maybe_async]
pub async fn poll_ready<P: RegisterPort + ?Sized>(
    port: &mut P,
    reg: u32,
    target: u8,
    config: &PollConfig,
) -> Result<u32> {
    let mut last = None;

    for attempt in 1..=config.max_attempts {
        let value = port.read(reg).await?;
        if value == target {
            log::trace!("reg 0x{:04X} ready after {} read(s)", reg, attempt);
            return Ok(attempt);
        }
        last = Some(value);
        if config.interval_us > 0 {
            port.delay_us(config.interval_us).await;
        }
    }

    log::debug!(
        "reg 0x{:04X} still 0x{:02X} after {} reads, expected 0x{:02X}",
        reg,
        last.unwrap_or(0),
        config.max_attempts,
        target
    );
    Err(Error::Timeout {
        reg,
        attempts: config.max_attempts,
    })
}

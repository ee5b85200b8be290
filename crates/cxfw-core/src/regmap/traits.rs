//! Register port trait definition
//!
//! The trait uses `maybe_async` to support both sync and async modes.
//! - By default, the trait is async (suitable for Embassy, tokio)
//! - With the `is_sync` feature, the trait becomes synchronous

use crate::error::Result;
use maybe_async::maybe_async;

/// Register access port (sync or async depending on `is_sync` feature)
///
/// Represents an addressed register space with byte-wide values. On the
/// CX2070x registers are 16 bits wide on the wire; addresses are carried as
/// `u32` and implementations must return [`Error::AddressOutOfRange`] for
/// addresses they cannot encode rather than truncating them.
///
/// Bulk transfers access consecutive registers starting at `reg`, the way
/// an auto-incrementing I2C register window does.
///
/// Every failed transfer is reported as an error. The loader never retries
/// a failed transfer, so implementations should not hide failures behind
/// retries of their own unless the bus itself requires it.
///
/// [`Error::AddressOutOfRange`]: crate::error::Error::AddressOutOfRange
///
/// ## Example
///
/// ```ignore
/// #[maybe_async]
/// impl RegisterPort for MyBus {
///     async fn read(&mut self, reg: u32) -> Result<u8> {
///         let mut buf = [0u8; 1];
///         self.bulk_read(reg, &mut buf).await?;
///         Ok(buf[0])
///     }
///     // ...
/// }
/// ```
#[maybe_async(AFIT)]
pub trait RegisterPort {
    /// Read a single register
    async fn read(&mut self, reg: u32) -> Result<u8>;

    /// Write a single register
    async fn write(&mut self, reg: u32, value: u8) -> Result<()>;

    /// Read `buf.len()` consecutive registers starting at `reg`
    async fn bulk_read(&mut self, reg: u32, buf: &mut [u8]) -> Result<()>;

    /// Write `data` to consecutive registers starting at `reg`
    async fn bulk_write(&mut self, reg: u32, data: &[u8]) -> Result<()>;

    /// Delay for the specified number of microseconds
    async fn delay_us(&mut self, us: u32);
}

//! cxfw-linux-i2c - Linux i2c-dev support
//!
//! This crate gives the firmware loader access to a CX2070x attached to a
//! Linux I2C adapter through the `/dev/i2c-N` device interface.
//!
//! # Example
//!
//! ```no_run
//! use cxfw_linux_i2c::{LinuxI2c, LinuxI2cConfig};
//! use cxfw_core::regmap::RegisterPort;
//!
//! // Codec at the default address 0x14
//! let mut codec = LinuxI2c::open_device("/dev/i2c-1")?;
//!
//! // Or with custom settings
//! let config = LinuxI2cConfig::new("/dev/i2c-1")
//!     .with_address(0x15)
//!     .with_max_transfer(32);
//! let mut codec = LinuxI2c::open(&config)?;
//!
//! let status = codec.read(0x1000)?;
//! println!("ABCODE: 0x{:02X}", status);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with cxfw CLI
//!
//! ```bash
//! # Load firmware using default settings
//! cxfw load -p linux_i2c:dev=/dev/i2c-1
//!
//! # Codec strapped to another address, adapter with small transfers
//! cxfw load -p linux_i2c:dev=/dev/i2c-1,addr=0x15,maxlen=32 -i cx2070x.srec
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with i2c-dev support enabled (`CONFIG_I2C_CHARDEV`)
//! - Read/write access to `/dev/i2c-N`
//! - No kernel codec driver bound to the slave address

pub mod device;
pub mod error;

// Re-exports
pub use device::{parse_options, LinuxI2c, LinuxI2cConfig, DEFAULT_ADDRESS};
pub use error::{LinuxI2cError, Result};

/// Open a Linux I2C device and return a boxed RegisterPort
///
/// This is a convenience function for use in the CLI programmer dispatch.
///
/// # Example Options
///
/// - `dev=/dev/i2c-1` - Required: device path
/// - `addr=0x14` - Optional: 7-bit slave address (default: 0x14)
/// - `maxlen=128` - Optional: register bytes per transfer (default: 128)
pub fn open_linux_i2c(
    options: &[(&str, &str)],
) -> std::result::Result<Box<dyn cxfw_core::regmap::RegisterPort>, Box<dyn std::error::Error>> {
    let config = parse_options(options)?;
    let i2c = LinuxI2c::open(&config)?;
    Ok(Box::new(i2c))
}

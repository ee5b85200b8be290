//! Linux I2C device implementation
//!
//! This module provides the `LinuxI2c` struct that implements the
//! `RegisterPort` trait on top of the kernel's i2c-dev interface.

use crate::error::{LinuxI2cError, Result};

use cxfw_core::error::{Error as CoreError, Result as CoreResult};
use cxfw_core::regmap::RegisterPort;

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;

/// Default 7-bit slave address of the CX2070x
pub const DEFAULT_ADDRESS: u16 = 0x14;

/// Default number of register bytes per transfer
pub const DEFAULT_MAX_TRANSFER: usize = 128;

/// Largest transfer accepted in the options
const MAX_TRANSFER_LIMIT: usize = 4096;

/// Bytes of register address sent before every access
const REG_ADDR_LEN: usize = 2;

/// Linux i2c-dev ioctl constants
mod ioctl {
    use nix::{ioctl_read_bad, ioctl_write_int_bad, ioctl_write_ptr_bad};

    const I2C_SLAVE: u16 = 0x0703;
    const I2C_FUNCS: u16 = 0x0705;
    const I2C_RDWR: u16 = 0x0707;

    /// Read transfer flag for `i2c_msg.flags`
    pub const I2C_M_RD: u16 = 0x0001;
    /// Adapter supports plain I2C-level commands
    pub const I2C_FUNC_I2C: libc::c_ulong = 0x0000_0001;

    ioctl_write_int_bad!(i2c_slave, I2C_SLAVE);
    ioctl_read_bad!(i2c_funcs, I2C_FUNCS, libc::c_ulong);
    ioctl_write_ptr_bad!(i2c_rdwr, I2C_RDWR, super::I2cRdwrData);
}

/// One message of a combined transfer
/// This must match the kernel's struct i2c_msg layout
#[repr(C)]
#[derive(Debug)]
struct I2cMsg {
    addr: u16,     // __u16 addr
    flags: u16,    // __u16 flags
    len: u16,      // __u16 len
    buf: *mut u8,  // __u8 *buf
}

/// Argument of the I2C_RDWR ioctl
#[repr(C)]
#[derive(Debug)]
struct I2cRdwrData {
    msgs: *mut I2cMsg, // struct i2c_msg *msgs
    nmsgs: u32,        // __u32 nmsgs
}

/// Configuration for opening a Linux I2C device
#[derive(Debug, Clone)]
pub struct LinuxI2cConfig {
    /// Device path (e.g., "/dev/i2c-1")
    pub device: String,
    /// 7-bit slave address (default: 0x14)
    pub address: u16,
    /// Register bytes per transfer (default: 128)
    pub max_transfer: usize,
}

impl Default for LinuxI2cConfig {
    fn default() -> Self {
        Self {
            device: String::new(),
            address: DEFAULT_ADDRESS,
            max_transfer: DEFAULT_MAX_TRANSFER,
        }
    }
}

impl LinuxI2cConfig {
    /// Create a new configuration with the given device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Default::default()
        }
    }

    /// Set the slave address
    pub fn with_address(mut self, address: u16) -> Self {
        self.address = address;
        self
    }

    /// Set the number of register bytes per transfer
    pub fn with_max_transfer(mut self, max_transfer: usize) -> Self {
        self.max_transfer = max_transfer;
        self
    }
}

/// CX2070x register access through `/dev/i2c-N`
///
/// Registers are addressed with a 16-bit big-endian prefix and the codec
/// auto-increments through consecutive registers, so bulk accesses are
/// split into chunks of at most `max_transfer` bytes.
pub struct LinuxI2c {
    /// File handle for the i2c-dev device
    file: File,
    /// 7-bit slave address
    address: u16,
    /// Register bytes per transfer
    max_transfer: usize,
}

impl LinuxI2c {
    /// Open a Linux I2C device with the given configuration
    pub fn open(config: &LinuxI2cConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxI2cError::NoDevice);
        }

        log::debug!("linux_i2c: Opening device {}", config.device);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.device)
            .map_err(|e| LinuxI2cError::OpenFailed {
                path: config.device.clone(),
                source: e,
            })?;

        let fd = file.as_raw_fd();

        let mut funcs: libc::c_ulong = 0;
        unsafe {
            ioctl::i2c_funcs(fd, &mut funcs).map_err(|e| {
                LinuxI2cError::FuncsFailed(std::io::Error::from_raw_os_error(e as i32))
            })?;
        }
        if funcs & ioctl::I2C_FUNC_I2C == 0 {
            return Err(LinuxI2cError::NotSupported);
        }

        // Fails with EBUSY if a kernel driver owns the codec
        let address = config.address;
        unsafe {
            ioctl::i2c_slave(fd, libc::c_int::from(address)).map_err(|e| {
                LinuxI2cError::SetAddressFailed {
                    addr: address,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }

        log::info!(
            "linux_i2c: Opened {} (addr=0x{:02X}, max transfer {} bytes)",
            config.device,
            address,
            config.max_transfer
        );

        Ok(Self {
            file,
            address,
            max_transfer: config.max_transfer.max(1),
        })
    }

    /// Open a device with the default slave address
    pub fn open_device(device: &str) -> Result<Self> {
        Self::open(&LinuxI2cConfig::new(device))
    }

    /// Slave address in use
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Run a combined transfer with the I2C_RDWR ioctl
    fn transfer(&mut self, msgs: &mut [I2cMsg]) -> Result<()> {
        let data = I2cRdwrData {
            msgs: msgs.as_mut_ptr(),
            nmsgs: msgs.len() as u32,
        };

        unsafe {
            ioctl::i2c_rdwr(self.file.as_raw_fd(), &data).map_err(|e| {
                LinuxI2cError::TransferFailed(std::io::Error::from_raw_os_error(e as i32))
            })?;
        }
        Ok(())
    }

    /// Write `data` to consecutive registers in one transfer
    fn write_regs(&mut self, reg: u16, data: &[u8]) -> Result<()> {
        let mut buf = Vec::with_capacity(REG_ADDR_LEN + data.len());
        buf.extend_from_slice(&reg.to_be_bytes());
        buf.extend_from_slice(data);

        let mut msgs = [I2cMsg {
            addr: self.address,
            flags: 0,
            len: buf.len() as u16,
            buf: buf.as_mut_ptr(),
        }];
        self.transfer(&mut msgs)
    }

    /// Read consecutive registers with a repeated start after the address
    fn read_regs(&mut self, reg: u16, buf: &mut [u8]) -> Result<()> {
        let mut reg_addr = reg.to_be_bytes();

        let mut msgs = [
            I2cMsg {
                addr: self.address,
                flags: 0,
                len: REG_ADDR_LEN as u16,
                buf: reg_addr.as_mut_ptr(),
            },
            I2cMsg {
                addr: self.address,
                flags: ioctl::I2C_M_RD,
                len: buf.len() as u16,
                buf: buf.as_mut_ptr(),
            },
        ];
        self.transfer(&mut msgs)
    }
}

/// Register number `offset` registers after `reg`, if it fits in 16 bits
fn register_at(reg: u32, offset: usize) -> CoreResult<u16> {
    u32::try_from(offset)
        .ok()
        .and_then(|offset| reg.checked_add(offset))
        .and_then(|r| u16::try_from(r).ok())
        .ok_or(CoreError::AddressOutOfRange { addr: reg })
}

fn bus_error(e: LinuxI2cError) -> CoreError {
    log::debug!("linux_i2c: {}", e);
    CoreError::Bus
}

impl RegisterPort for LinuxI2c {
    fn read(&mut self, reg: u32) -> CoreResult<u8> {
        let mut buf = [0u8; 1];
        self.bulk_read(reg, &mut buf)?;
        Ok(buf[0])
    }

    fn write(&mut self, reg: u32, value: u8) -> CoreResult<()> {
        self.bulk_write(reg, &[value])
    }

    fn bulk_read(&mut self, reg: u32, buf: &mut [u8]) -> CoreResult<()> {
        // Reject the whole access before touching the bus
        register_at(reg, buf.len().saturating_sub(1))?;

        let max = self.max_transfer;
        for (i, chunk) in buf.chunks_mut(max).enumerate() {
            let start = register_at(reg, i * max)?;
            self.read_regs(start, chunk).map_err(bus_error)?;
        }
        Ok(())
    }

    fn bulk_write(&mut self, reg: u32, data: &[u8]) -> CoreResult<()> {
        register_at(reg, data.len().saturating_sub(1))?;

        let max = self.max_transfer;
        for (i, chunk) in data.chunks(max).enumerate() {
            let start = register_at(reg, i * max)?;
            log::trace!("linux_i2c: write 0x{:04X} ({} bytes)", start, chunk.len());
            self.write_regs(start, chunk).map_err(bus_error)?;
        }
        Ok(())
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(std::time::Duration::from_micros(us as u64));
    }
}

/// Parse an integer given in decimal or with a `0x` prefix
fn parse_int(value: &str) -> Option<u32> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

/// Parse programmer options from a list of key-value pairs
pub fn parse_options(options: &[(&str, &str)]) -> std::result::Result<LinuxI2cConfig, String> {
    let mut config = LinuxI2cConfig::default();

    for (key, value) in options {
        match *key {
            "dev" => {
                config.device = value.to_string();
            }
            "addr" => {
                let addr = parse_int(value)
                    .filter(|a| (0x03..=0x77).contains(a))
                    .ok_or_else(|| format!("Invalid addr value: {} (must be 0x03-0x77)", value))?;
                config.address = addr as u16;
            }
            "maxlen" => {
                let len = parse_int(value)
                    .map(|l| l as usize)
                    .filter(|l| (1..=MAX_TRANSFER_LIMIT).contains(l))
                    .ok_or_else(|| {
                        format!(
                            "Invalid maxlen value: {} (must be 1-{})",
                            value, MAX_TRANSFER_LIMIT
                        )
                    })?;
                config.max_transfer = len;
            }
            _ => {
                log::warn!("linux_i2c: Unknown option: {}={}", key, value);
            }
        }
    }

    if config.device.is_empty() {
        return Err("No device specified. Use dev=/dev/i2c-N".to_string());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        let config = parse_options(&[("dev", "/dev/i2c-1"), ("addr", "0x15")]).unwrap();
        assert_eq!(config.device, "/dev/i2c-1");
        assert_eq!(config.address, 0x15);
        assert_eq!(config.max_transfer, DEFAULT_MAX_TRANSFER);

        let config = parse_options(&[("dev", "/dev/i2c-0"), ("maxlen", "32")]).unwrap();
        assert_eq!(config.address, DEFAULT_ADDRESS);
        assert_eq!(config.max_transfer, 32);
    }

    #[test]
    fn test_parse_options_errors() {
        assert!(parse_options(&[]).is_err());
        assert!(parse_options(&[("dev", "/dev/i2c-1"), ("addr", "0x80")]).is_err());
        assert!(parse_options(&[("dev", "/dev/i2c-1"), ("addr", "zz")]).is_err());
        assert!(parse_options(&[("dev", "/dev/i2c-1"), ("maxlen", "0")]).is_err());
    }

    #[test]
    fn test_register_at() {
        assert_eq!(register_at(0x1000, 0), Ok(0x1000));
        assert_eq!(register_at(0x1000, 0x80), Ok(0x1080));
        assert_eq!(register_at(0xFFFF, 0), Ok(0xFFFF));
        assert_eq!(
            register_at(0xFFFF, 1),
            Err(CoreError::AddressOutOfRange { addr: 0xFFFF })
        );
        assert_eq!(
            register_at(0x8000_0000, 0),
            Err(CoreError::AddressOutOfRange { addr: 0x8000_0000 })
        );
    }

    #[test]
    fn test_open_without_device() {
        assert!(matches!(
            LinuxI2c::open(&LinuxI2cConfig::default()),
            Err(LinuxI2cError::NoDevice)
        ));
    }
}

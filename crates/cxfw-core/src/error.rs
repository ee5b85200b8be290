//! Error types for cxfw-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Reasons a single image record failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Record does not start with `'S'`
    BadFraming,
    /// Record type is not `3` or `7` (raw type character)
    UnsupportedType(u8),
    /// Length field is zero, malformed, or too short for the address
    BadLength,
    /// The CR LF terminator is missing at the offset the length implies
    UnterminatedLine,
    /// Address or payload contains a non-hex character
    BadHex,
}

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Image errors
    /// A record in the image could not be decoded
    Decode {
        /// Image offset where the failing record starts
        offset: usize,
        /// What was wrong with the record
        kind: DecodeError,
    },

    // Register access errors
    /// Register transfer failed on the bus
    Bus,
    /// Register address cannot be encoded by the port
    AddressOutOfRange {
        /// Offending register address
        addr: u32,
    },

    // Protocol errors
    /// Status register never reported ready
    Timeout {
        /// Register that was polled
        reg: u32,
        /// Number of reads performed
        attempts: u32,
    },
    /// Device did not accept a patch record
    PatchRejected {
        /// Address of the rejected record
        addr: u32,
        /// Value read back from the control register
        status: u8,
    },
    /// Patch record appeared before the ram loader was acknowledged
    PatchBeforeLoader {
        /// Address of the record
        addr: u32,
    },
    /// Patch record without payload
    EmptyPatch {
        /// Address of the record
        addr: u32,
    },
    /// Final status check after the download failed
    NotReady {
        /// Value read back from the status register
        status: u8,
    },
    /// Load session was driven through an illegal state change
    InvalidTransition,
}

impl Error {
    /// True for failures of the register access port itself
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Bus | Self::AddressOutOfRange { .. })
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadFraming => write!(f, "record does not start with 'S'"),
            Self::UnsupportedType(c) => write!(
                f,
                "unsupported record type '{}'",
                char::from(*c).escape_default()
            ),
            Self::BadLength => write!(f, "invalid record length"),
            Self::UnterminatedLine => write!(f, "missing CR LF line terminator"),
            Self::BadHex => write!(f, "malformed hex digit"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { offset, kind } => {
                write!(f, "bad record at offset {}: {}", offset, kind)
            }
            Self::Bus => write!(f, "register transfer failed"),
            Self::AddressOutOfRange { addr } => {
                write!(f, "register address 0x{:08X} out of range", addr)
            }
            Self::Timeout { reg, attempts } => write!(
                f,
                "register 0x{:04X} not ready after {} reads",
                reg, attempts
            ),
            Self::PatchRejected { addr, status } => write!(
                f,
                "patch at 0x{:08X} rejected (status 0x{:02X})",
                addr, status
            ),
            Self::PatchBeforeLoader { addr } => write!(
                f,
                "patch at 0x{:08X} before ram loader was acknowledged",
                addr
            ),
            Self::EmptyPatch { addr } => write!(f, "patch at 0x{:08X} has no data", addr),
            Self::NotReady { status } => {
                write!(f, "device not ready after download (status 0x{:02X})", status)
            }
            Self::InvalidTransition => write!(f, "invalid load state transition"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;

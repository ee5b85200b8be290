//! Loader configuration
//!
//! Every register address, protocol code and poll budget the loader uses
//! lives in [`LoaderConfig`]. The default matches the CX2070x register map;
//! boards with a different codec revision can override individual values
//! from a TOML file (with the `std` feature):
//!
//! ```toml
//! [registers]
//! status = 0x1000
//! staging = "0x02FC"
//! control = "0x0400"
//!
//! [codes]
//! ready = 0x01
//! trigger = 0x85
//! accepted = 0x05
//!
//! [poll]
//! max_attempts = 100
//! interval_us = 1000
//! settle_ms = 200
//! ```

#[cfg(feature = "std")]
mod toml;

#[cfg(feature = "std")]
pub use self::toml::ConfigError;

use crate::cx2070x;
use crate::poll::PollConfig;

/// Registers, codes and timing used by the firmware loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Status (abort code) register polled for readiness
    pub status_reg: u32,
    /// Status value meaning "ready"
    pub ready_code: u8,
    /// Value written to the status register once the image is streamed
    pub finalize_code: u8,
    /// Patch staging buffer
    pub staging_reg: u32,
    /// Patch control register
    pub control_reg: u32,
    /// Control value that commits a staged patch
    pub trigger_code: u8,
    /// Control value read back after an accepted patch
    pub accepted_code: u8,
    /// Data records at or above this address use the patch path
    pub patch_threshold: u32,
    /// Poll budget for the ram loader and post-reset readiness checks
    pub ready_poll: PollConfig,
    /// Settle time after the post-reset readiness check, in milliseconds
    pub settle_ms: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            status_reg: cx2070x::ABCODE,
            ready_code: cx2070x::ABCODE_READY,
            finalize_code: cx2070x::ABCODE_FINALIZE,
            staging_reg: cx2070x::PATCH_STAGING,
            control_reg: cx2070x::UPDATE_CTR,
            trigger_code: cx2070x::UPDATE_TRIGGER,
            accepted_code: cx2070x::UPDATE_ACCEPTED,
            patch_threshold: cx2070x::PATCH_THRESHOLD,
            ready_poll: PollConfig::default(),
            settle_ms: cx2070x::RESET_SETTLE_MS,
        }
    }
}

impl LoaderConfig {
    /// True if a data record at `addr` goes through the patch staging path
    pub fn is_patch_address(&self, addr: u32) -> bool {
        addr >= self.patch_threshold
    }
}

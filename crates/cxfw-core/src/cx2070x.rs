//! CX2070x register map used by the firmware download
//!
//! Addresses are 16-bit register numbers on the codec's I2C interface,
//! values are single bytes. Only the registers touched while the DSP is in
//! its loader state are listed here.

// ============================================================================
// Loader status
// ============================================================================

/// Abort code register, reports loader/DSP readiness
pub const ABCODE: u32 = 0x1000;
/// ABCODE value meaning the device is ready
pub const ABCODE_READY: u8 = 0x01;
/// Value written to ABCODE to finalize a download
pub const ABCODE_FINALIZE: u8 = 0x00;

// ============================================================================
// Patch staging
// ============================================================================

/// Start of the patch staging buffer
pub const PATCH_STAGING: u32 = 0x02FC;
/// Update control register
pub const UPDATE_CTR: u32 = 0x0400;
/// UPDATE_CTR value that commits the staged patch
pub const UPDATE_TRIGGER: u8 = 0x85;
/// UPDATE_CTR value reported once a patch was accepted
pub const UPDATE_ACCEPTED: u8 = 0x05;
/// Records at or above this address go through the staging buffer
pub const PATCH_THRESHOLD: u32 = 0x8000_0000;

// ============================================================================
// Identification
// ============================================================================

/// Firmware version block (6 bytes, 0x1001-0x1006)
pub const FIRMWARE_VER_LO: u32 = 0x1001;
/// Length of the firmware version block
pub const FIRMWARE_VER_LEN: usize = 6;
/// ROM patch version block (3 bytes, 0x1584-0x1586)
pub const PATCH_HI: u32 = 0x1584;
/// Length of the ROM patch version block
pub const PATCH_VER_LEN: usize = 3;

// ============================================================================
// Timing
// ============================================================================

/// Status reads before giving up on the loader
pub const READY_POLL_ATTEMPTS: u32 = 100;
/// Delay between status reads in microseconds
pub const READY_POLL_INTERVAL_US: u32 = 1000;
/// Settle time after the device first reports ready following reset
pub const RESET_SETTLE_MS: u32 = 200;

/// Default firmware image file name
pub const FIRMWARE_NAME: &str = "cx2070x.srec";

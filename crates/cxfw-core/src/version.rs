//! Firmware identification
//!
//! Once firmware is running the codec exposes its variant and version in
//! two register blocks. The values are informational only.

use core::fmt;

use crate::cx2070x::{FIRMWARE_VER_LEN, FIRMWARE_VER_LO, PATCH_HI, PATCH_VER_LEN};
use crate::error::Result;
use crate::regmap::RegisterPort;
use maybe_async::maybe_async;

/// Identification of the running firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareVersion {
    /// Chip variant, the last digit of the part number (CX2070x)
    pub chip: u8,
    /// Firmware major version
    pub major: u8,
    /// Firmware minor version
    pub minor: u8,
    /// Patch major version
    pub patch_major: u8,
    /// Patch minor version
    pub patch_minor: u8,
    /// Release type
    pub release_type: u8,
    /// ROM patch version, most significant first
    pub rom_patch: [u8; 3],
}

impl FirmwareVersion {
    /// Interpret the raw version blocks
    pub fn from_registers(fw: &[u8; FIRMWARE_VER_LEN], patch: &[u8; PATCH_VER_LEN]) -> Self {
        Self {
            chip: fw[4],
            major: fw[1],
            minor: fw[0],
            patch_major: fw[3],
            patch_minor: fw[2],
            release_type: fw[5],
            rom_patch: [patch[2], patch[1], patch[0]],
        }
    }

    /// Part number suffix and firmware version line
    pub fn firmware(&self) -> FirmwareLine<'_> {
        FirmwareLine(self)
    }

    /// ROM patch version line
    pub fn rom_patch(&self) -> RomPatchLine<'_> {
        RomPatchLine(self)
    }
}

/// Display adapter for the firmware line
pub struct FirmwareLine<'a>(&'a FirmwareVersion);

impl fmt::Display for FirmwareLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        write!(
            f,
            "Conexant CX2070{} codec. Firmware version:{}.{:02}, Patch Version:{}.{}, Release type:{}",
            v.chip, v.major, v.minor, v.patch_major, v.patch_minor, v.release_type
        )
    }
}

/// Display adapter for the ROM patch line
pub struct RomPatchLine<'a>(&'a FirmwareVersion);

impl fmt::Display for RomPatchLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0.rom_patch;
        write!(f, "Firmware patch version:{}.{}.{}", a, b, c)
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.firmware(), self.rom_patch())
    }
}

/// Read both identification blocks
#[maybe_async]
pub async fn read_version<P: RegisterPort + ?Sized>(port: &mut P) -> Result<FirmwareVersion> {
    let mut fw = [0u8; FIRMWARE_VER_LEN];
    port.bulk_read(FIRMWARE_VER_LO, &mut fw).await?;

    let mut patch = [0u8; PATCH_VER_LEN];
    port.bulk_read(PATCH_HI, &mut patch).await?;

    let version = FirmwareVersion::from_registers(&fw, &patch);
    log::debug!("{}", version.firmware());
    log::debug!("{}", version.rom_patch());
    Ok(version)
}

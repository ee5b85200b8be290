//! cxfw-dummy - Emulated CX2070x codec for testing
//!
//! This crate provides an in-memory register space that behaves like a
//! CX2070x while its DSP is in the firmware loader state. It is useful for
//! exercising the download protocol without hardware: every access is kept
//! in an operation log, and faults can be injected through [`DummyConfig`].

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::string::String;
use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use cxfw_core::cx2070x::{
    ABCODE, ABCODE_FINALIZE, ABCODE_READY, FIRMWARE_VER_LO, PATCH_HI, PATCH_STAGING,
    UPDATE_ACCEPTED, UPDATE_CTR, UPDATE_TRIGGER,
};
use cxfw_core::error::{Error, Result};
use cxfw_core::loader::PATCH_HEADER_LEN;
use cxfw_core::regmap::RegisterPort;

/// Size of the emulated register space (16-bit register addresses)
pub const REGISTER_SPACE: usize = 0x1_0000;

/// Status value reported while the loader or firmware is still starting
pub const STATUS_BUSY: u8 = 0x00;

/// Configuration for the emulated codec
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Status reads answered with "busy" before the device reports ready
    pub ready_after: u32,
    /// Status register never reports ready
    pub never_ready: bool,
    /// Status register stays at the finalize value after the download
    pub boot_fails: bool,
    /// Leave the trigger code in the control register instead of accepting
    pub reject_patches: bool,
    /// Fail the Nth bulk write (1-based)
    pub fail_bulk_write: Option<usize>,
    /// Fail every read starting at this register
    pub fail_read: Option<u32>,
    /// Contents of the firmware version block
    pub version: [u8; 6],
    /// Contents of the ROM patch version block
    pub rom_patch: [u8; 3],
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            ready_after: 0,
            never_ready: false,
            boot_fails: false,
            reject_patches: false,
            fail_bulk_write: None,
            fail_read: None,
            // CX20709, firmware 3.18, patch 2.0, release type 1
            version: [0x12, 0x03, 0x00, 0x02, 0x09, 0x01],
            rom_patch: [0x02, 0x01, 0x00],
        }
    }
}

/// One access seen by the emulated codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Single register read
    Read(u32),
    /// Single register write
    Write(u32, u8),
    /// Bulk read of `len` registers
    BulkRead(u32, usize),
    /// Bulk write of the given bytes
    BulkWrite(u32, Vec<u8>),
    /// Delay in microseconds
    Delay(u32),
}

/// A patch the codec committed from the staging buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedPatch {
    /// Device-side target (low 24 bits of the record address)
    pub target: u32,
    /// Patched bytes
    pub data: Vec<u8>,
}

/// Emulated CX2070x register space
///
/// The status register is modelled separately from the plain register
/// array: it reports busy for the configured number of reads, then ready,
/// and writing the finalize code starts the firmware.
pub struct DummyCodec {
    config: DummyConfig,
    regs: Vec<u8>,
    status: u8,
    busy_reads: u32,
    firmware_running: bool,
    bulk_writes: usize,
    elapsed_us: u64,
    ops: Vec<Op>,
    patches: Vec<AppliedPatch>,
}

impl DummyCodec {
    /// Create a new emulated codec with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        let mut regs = vec![0u8; REGISTER_SPACE];
        let fw = FIRMWARE_VER_LO as usize;
        regs[fw..fw + config.version.len()].copy_from_slice(&config.version);
        let patch = PATCH_HI as usize;
        regs[patch..patch + config.rom_patch.len()].copy_from_slice(&config.rom_patch);

        Self {
            config,
            regs,
            status: ABCODE_READY,
            busy_reads: 0,
            firmware_running: false,
            bulk_writes: 0,
            elapsed_us: 0,
            ops: Vec::new(),
            patches: Vec::new(),
        }
    }

    /// Create an emulated codec that accepts everything
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Plain register contents (the status register is not included)
    pub fn registers(&self) -> &[u8] {
        &self.regs
    }

    /// Every access so far, oldest first
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Forget the operation log
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Patches committed through the staging buffer
    pub fn patches(&self) -> &[AppliedPatch] {
        &self.patches
    }

    /// Total time requested through `delay_us`
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_us
    }

    /// True once the finalize code has been written
    pub fn is_firmware_running(&self) -> bool {
        self.firmware_running
    }

    fn span(&self, reg: u32, len: usize) -> Result<core::ops::Range<usize>> {
        let start = reg as usize;
        match start.checked_add(len) {
            Some(end) if end <= REGISTER_SPACE => Ok(start..end),
            _ => Err(Error::AddressOutOfRange { addr: reg }),
        }
    }

    fn read_status(&mut self) -> u8 {
        if self.config.never_ready {
            return STATUS_BUSY;
        }
        if self.busy_reads < self.config.ready_after {
            self.busy_reads += 1;
            return STATUS_BUSY;
        }
        self.status
    }

    fn write_status(&mut self, value: u8) {
        if value == ABCODE_FINALIZE {
            self.firmware_running = true;
            self.status = if self.config.boot_fails {
                value
            } else {
                ABCODE_READY
            };
            log::debug!("dummy: firmware started (status 0x{:02X})", self.status);
        } else {
            self.status = value;
        }
    }

    fn write_control(&mut self, value: u8) {
        if value != UPDATE_TRIGGER || self.config.reject_patches {
            self.regs[UPDATE_CTR as usize] = value;
            return;
        }

        let base = PATCH_STAGING as usize;
        let header = &self.regs[base..base + PATCH_HEADER_LEN];
        let target = u32::from_le_bytes([header[0], header[1], header[2], 0]);
        let len = header[3] as usize + 1;
        let data_start = base + PATCH_HEADER_LEN;
        let data = self.regs[data_start..data_start + len].to_vec();

        log::trace!("dummy: patch 0x{:06X} ({} bytes)", target, len);
        self.patches.push(AppliedPatch { target, data });
        self.regs[UPDATE_CTR as usize] = UPDATE_ACCEPTED;
    }

    fn store(&mut self, reg: u32, value: u8) -> Result<()> {
        match reg {
            ABCODE => self.write_status(value),
            UPDATE_CTR => self.write_control(value),
            _ => {
                let range = self.span(reg, 1)?;
                self.regs[range.start] = value;
            }
        }
        Ok(())
    }

    fn check_read(&self, reg: u32) -> Result<()> {
        if self.config.fail_read == Some(reg) {
            return Err(Error::Bus);
        }
        Ok(())
    }
}

impl RegisterPort for DummyCodec {
    fn read(&mut self, reg: u32) -> Result<u8> {
        self.ops.push(Op::Read(reg));
        self.check_read(reg)?;

        if reg == ABCODE {
            return Ok(self.read_status());
        }
        let range = self.span(reg, 1)?;
        Ok(self.regs[range.start])
    }

    fn write(&mut self, reg: u32, value: u8) -> Result<()> {
        self.ops.push(Op::Write(reg, value));
        self.store(reg, value)
    }

    fn bulk_read(&mut self, reg: u32, buf: &mut [u8]) -> Result<()> {
        self.ops.push(Op::BulkRead(reg, buf.len()));
        self.check_read(reg)?;

        let range = self.span(reg, buf.len())?;
        buf.copy_from_slice(&self.regs[range]);
        Ok(())
    }

    fn bulk_write(&mut self, reg: u32, data: &[u8]) -> Result<()> {
        self.ops.push(Op::BulkWrite(reg, data.to_vec()));
        self.bulk_writes += 1;

        if self.config.fail_bulk_write == Some(self.bulk_writes) {
            log::debug!("dummy: failing bulk write #{}", self.bulk_writes);
            return Err(Error::Bus);
        }

        // Single-register writes see the same status and control model
        if let [value] = data {
            return self.store(reg, *value);
        }
        let range = self.span(reg, data.len())?;
        self.regs[range].copy_from_slice(data);
        Ok(())
    }

    fn delay_us(&mut self, us: u32) {
        // No real delay needed for in-memory operations
        self.ops.push(Op::Delay(us));
        self.elapsed_us += u64::from(us);
    }
}

/// Parse programmer options from a list of key-value pairs
///
/// - `ready_after=<n>` - busy status reads before reporting ready
/// - `reject_patch=<bool>` - refuse every staged patch
/// - `never_ready=<bool>` - status register never reports ready
/// - `boot_fails=<bool>` - firmware does not start after the download
pub fn parse_options(options: &[(&str, &str)]) -> core::result::Result<DummyConfig, String> {
    let mut config = DummyConfig::default();

    for (key, value) in options {
        match *key {
            "ready_after" => {
                config.ready_after = value
                    .parse()
                    .map_err(|_| format!("Invalid ready_after value: {}", value))?;
            }
            "reject_patch" => config.reject_patches = parse_flag(key, value)?,
            "never_ready" => config.never_ready = parse_flag(key, value)?,
            "boot_fails" => config.boot_fails = parse_flag(key, value)?,
            _ => {
                log::warn!("dummy: Unknown option: {}={}", key, value);
            }
        }
    }

    Ok(config)
}

fn parse_flag(key: &str, value: &str) -> core::result::Result<bool, String> {
    match value {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(format!("Invalid {} value: {} (expected yes/no)", key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxfw_core::config::LoaderConfig;
    use cxfw_core::error::DecodeError;
    use cxfw_core::loader::{
        download, run_session, wait_for_device, LoadProgress, LoadReport, LoadSession, LoadState,
        NoProgress,
    };
    use cxfw_core::srec::Record;
    use cxfw_core::version::read_version;

    fn image(records: &[Record]) -> Vec<u8> {
        records.iter().flat_map(|r| r.to_line()).collect()
    }

    fn data(addr: u32, payload: &[u8]) -> Record {
        Record::data(addr, payload).unwrap()
    }

    fn end() -> Record {
        Record::end(0)
    }

    fn status_reads(ops: &[Op]) -> usize {
        ops.iter().filter(|op| **op == Op::Read(ABCODE)).count()
    }

    #[test]
    fn test_direct_record_single_bulk_write() {
        let mut codec = DummyCodec::new_default();
        let image = image(&[data(0x1000, &[0x12, 0x34]), end()]);

        let report = download(&mut codec, &image, &LoaderConfig::default(), &mut NoProgress).unwrap();

        assert_eq!(
            codec.ops(),
            &[
                Op::BulkWrite(0x1000, vec![0x12, 0x34]),
                Op::Read(ABCODE),
                Op::Write(ABCODE, ABCODE_FINALIZE),
                Op::Read(ABCODE),
            ]
        );
        assert_eq!(&codec.registers()[0x1000..0x1002], &[0x12, 0x34]);
        assert_eq!(report.records, 2);
        assert_eq!(report.direct_records, 1);
        assert_eq!(report.direct_bytes, 2);
        assert!(codec.is_firmware_running());
    }

    #[test]
    fn test_patch_record_goes_through_staging() {
        let mut codec = DummyCodec::new_default();
        let image = image(&[end(), data(0x8000_0050, &[0x12, 0x34])]);

        let report = download(&mut codec, &image, &LoaderConfig::default(), &mut NoProgress).unwrap();

        assert_eq!(
            codec.ops(),
            &[
                Op::Read(ABCODE),
                Op::BulkWrite(PATCH_STAGING, vec![0x50, 0x00, 0x00, 0x01, 0x12, 0x34]),
                Op::Write(UPDATE_CTR, UPDATE_TRIGGER),
                Op::Read(UPDATE_CTR),
                Op::Write(ABCODE, ABCODE_FINALIZE),
                Op::Read(ABCODE),
            ]
        );
        assert_eq!(
            codec.patches(),
            &[AppliedPatch {
                target: 0x50,
                data: vec![0x12, 0x34],
            }]
        );
        assert_eq!(report.patch_records, 1);
        assert_eq!(report.patch_bytes, 2);
    }

    #[test]
    fn test_only_first_end_record_polls() {
        let mut codec = DummyCodec::new(DummyConfig {
            ready_after: 3,
            ..Default::default()
        });
        let image = image(&[
            data(0x0100, &[0xAA]),
            end(),
            data(0x0200, &[0xBB]),
            end(),
            data(0x0300, &[0xCC]),
        ]);

        let report = download(&mut codec, &image, &LoaderConfig::default(), &mut NoProgress).unwrap();

        // Four poll reads (three busy) plus the final check
        assert_eq!(status_reads(codec.ops()), 5);
        let delays = codec.ops().iter().filter(|op| matches!(op, Op::Delay(_))).count();
        assert_eq!(delays, 3);
        assert_eq!(report.end_records, 2);
        assert_eq!(report.direct_records, 3);
        assert_eq!(codec.registers()[0x0300], 0xCC);
    }

    #[test]
    fn test_bulk_write_failure_stops_session() {
        let mut codec = DummyCodec::new(DummyConfig {
            fail_bulk_write: Some(2),
            ..Default::default()
        });
        let image = image(&[
            data(0x0100, &[0x01]),
            data(0x0200, &[0x02]),
            data(0x0300, &[0x03]),
            end(),
        ]);
        let mut session = LoadSession::new(&image);

        let failure = run_session(
            &mut session,
            &mut codec,
            &LoaderConfig::default(),
            &mut NoProgress,
        )
        .unwrap_err();

        assert_eq!(session.state(), LoadState::Failed);
        assert_eq!(failure.state, LoadState::Streaming);
        assert_eq!(failure.error, Error::Bus);
        assert!(failure.error.is_io());
        assert_eq!(failure.records, 2);
        assert_eq!(failure.offset, 18);
        // Nothing after the failing write
        assert_eq!(codec.ops().len(), 2);
        assert_eq!(codec.registers()[0x0300], 0x00);
    }

    #[test]
    fn test_staging_write_failure_skips_trigger() {
        let mut codec = DummyCodec::new(DummyConfig {
            fail_bulk_write: Some(1),
            ..Default::default()
        });
        let image = image(&[end(), data(0x8000_0050, &[0x12, 0x34]), data(0x0100, &[0x01])]);

        let failure =
            download(&mut codec, &image, &LoaderConfig::default(), &mut NoProgress).unwrap_err();

        assert_eq!(failure.error, Error::Bus);
        assert_eq!(failure.state, LoadState::Streaming);
        assert_eq!(failure.offset, 16);
        assert_eq!(
            codec.ops().last(),
            Some(&Op::BulkWrite(PATCH_STAGING, vec![0x50, 0x00, 0x00, 0x01, 0x12, 0x34]))
        );
        assert!(!codec
            .ops()
            .iter()
            .any(|op| matches!(op, Op::Write(UPDATE_CTR, _))));
        assert!(codec.patches().is_empty());
    }

    #[test]
    fn test_control_read_failure_aborts_patch() {
        let mut codec = DummyCodec::new(DummyConfig {
            fail_read: Some(UPDATE_CTR),
            ..Default::default()
        });
        let image = image(&[end(), data(0x8000_0050, &[0x12]), data(0x0100, &[0x01])]);

        let failure =
            download(&mut codec, &image, &LoaderConfig::default(), &mut NoProgress).unwrap_err();

        assert_eq!(failure.error, Error::Bus);
        assert_eq!(codec.ops().last(), Some(&Op::Read(UPDATE_CTR)));
        assert_eq!(codec.registers()[0x0100], 0x00);
        assert!(!codec.is_firmware_running());
    }

    #[test]
    fn test_single_register_bulk_write_uses_register_model() {
        let mut codec = DummyCodec::new_default();

        // Stage a patch, then trigger it through a one-byte bulk write
        codec
            .bulk_write(PATCH_STAGING, &[0x20, 0x00, 0x00, 0x00, 0x77])
            .unwrap();
        codec.bulk_write(UPDATE_CTR, &[UPDATE_TRIGGER]).unwrap();
        assert_eq!(
            codec.patches(),
            &[AppliedPatch {
                target: 0x20,
                data: vec![0x77],
            }]
        );
        assert_eq!(codec.read(UPDATE_CTR).unwrap(), UPDATE_ACCEPTED);

        codec.bulk_write(ABCODE, &[ABCODE_FINALIZE]).unwrap();
        assert!(codec.is_firmware_running());
        assert_eq!(codec.read(ABCODE).unwrap(), ABCODE_READY);
    }

    #[test]
    fn test_rejected_patch() {
        let mut codec = DummyCodec::new(DummyConfig {
            reject_patches: true,
            ..Default::default()
        });
        let image = image(&[end(), data(0x8000_0010, &[0x01]), data(0x0100, &[0x02])]);

        let failure =
            download(&mut codec, &image, &LoaderConfig::default(), &mut NoProgress).unwrap_err();

        assert_eq!(
            failure.error,
            Error::PatchRejected {
                addr: 0x8000_0010,
                status: UPDATE_TRIGGER,
            }
        );
        assert!(codec.patches().is_empty());
        assert_eq!(codec.registers()[0x0100], 0x00);
    }

    #[test]
    fn test_patch_before_loader_rejected() {
        let mut codec = DummyCodec::new_default();
        let image = image(&[data(0x8000_0000, &[0x01]), end()]);

        let failure =
            download(&mut codec, &image, &LoaderConfig::default(), &mut NoProgress).unwrap_err();

        assert_eq!(failure.error, Error::PatchBeforeLoader { addr: 0x8000_0000 });
        assert_eq!(failure.offset, 0);
        assert!(codec.ops().is_empty());
    }

    #[test]
    fn test_empty_patch_rejected() {
        let mut codec = DummyCodec::new_default();
        let image = image(&[end(), data(0x8000_0000, &[])]);

        let failure =
            download(&mut codec, &image, &LoaderConfig::default(), &mut NoProgress).unwrap_err();

        assert_eq!(failure.error, Error::EmptyPatch { addr: 0x8000_0000 });
    }

    #[test]
    fn test_loader_never_ready() {
        let mut codec = DummyCodec::new(DummyConfig {
            never_ready: true,
            ..Default::default()
        });
        let image = image(&[data(0x0100, &[0x01]), end(), data(0x0200, &[0x02])]);

        let failure =
            download(&mut codec, &image, &LoaderConfig::default(), &mut NoProgress).unwrap_err();

        assert_eq!(
            failure.error,
            Error::Timeout {
                reg: ABCODE,
                attempts: 100,
            }
        );
        assert_eq!(failure.state, LoadState::AwaitingLoaderReady);
        assert_eq!(status_reads(codec.ops()), 100);
        assert_eq!(codec.elapsed_us(), 100 * 1000);
        assert_eq!(codec.registers()[0x0200], 0x00);
    }

    #[test]
    fn test_status_read_error_aborts_poll() {
        let mut codec = DummyCodec::new(DummyConfig {
            fail_read: Some(ABCODE),
            ..Default::default()
        });
        let image = image(&[end()]);

        let failure =
            download(&mut codec, &image, &LoaderConfig::default(), &mut NoProgress).unwrap_err();

        assert_eq!(failure.error, Error::Bus);
        assert_eq!(codec.ops(), &[Op::Read(ABCODE)]);
    }

    #[test]
    fn test_firmware_not_ready_after_download() {
        let mut codec = DummyCodec::new(DummyConfig {
            boot_fails: true,
            ..Default::default()
        });
        let image = image(&[data(0x0100, &[0x01]), end()]);
        let mut session = LoadSession::new(&image);

        let failure = run_session(
            &mut session,
            &mut codec,
            &LoaderConfig::default(),
            &mut NoProgress,
        )
        .unwrap_err();

        assert_eq!(failure.error, Error::NotReady { status: ABCODE_FINALIZE });
        assert_eq!(failure.state, LoadState::Verifying);
        assert_eq!(failure.offset, image.len());
        assert_eq!(session.state(), LoadState::Failed);
    }

    #[test]
    fn test_decode_error_reports_record_offset() {
        let mut codec = DummyCodec::new_default();
        let mut image = image(&[data(0x0100, &[0x01]), end()]);
        image.extend_from_slice(b"S9030000FC\r\n");

        let failure =
            download(&mut codec, &image, &LoaderConfig::default(), &mut NoProgress).unwrap_err();

        assert_eq!(
            failure.error,
            Error::Decode {
                offset: 34,
                kind: DecodeError::UnsupportedType(b'9'),
            }
        );
        assert_eq!(failure.records, 2);
        // Never finalized
        assert!(!codec.is_firmware_running());
    }

    #[test]
    fn test_unencodable_address() {
        let mut codec = DummyCodec::new_default();
        let image = image(&[data(0x0001_0000, &[0x01]), end()]);

        let failure =
            download(&mut codec, &image, &LoaderConfig::default(), &mut NoProgress).unwrap_err();

        assert_eq!(failure.error, Error::AddressOutOfRange { addr: 0x0001_0000 });
        assert!(failure.error.is_io());
    }

    #[test]
    fn test_empty_image_still_verified() {
        let mut codec = DummyCodec::new_default();

        let report = download(&mut codec, &[], &LoaderConfig::default(), &mut NoProgress).unwrap();

        assert_eq!(report, LoadReport::default());
        assert_eq!(
            codec.ops(),
            &[Op::Write(ABCODE, ABCODE_FINALIZE), Op::Read(ABCODE)]
        );
    }

    #[derive(Default)]
    struct Recorder {
        started: Option<usize>,
        positions: Vec<usize>,
        loader_ready: usize,
        verifying: usize,
        complete: Option<LoadReport>,
    }

    impl LoadProgress for Recorder {
        fn started(&mut self, image_len: usize) {
            self.started = Some(image_len);
        }
        fn record_applied(&mut self, position: usize, _record: &Record) {
            self.positions.push(position);
        }
        fn loader_ready(&mut self) {
            self.loader_ready += 1;
        }
        fn verifying(&mut self) {
            self.verifying += 1;
        }
        fn complete(&mut self, report: &LoadReport) {
            self.complete = Some(*report);
        }
    }

    #[test]
    fn test_progress_callbacks() {
        let mut codec = DummyCodec::new_default();
        let image = image(&[data(0x0100, &[0x01]), end(), end()]);
        let mut progress = Recorder::default();

        let report = download(&mut codec, &image, &LoaderConfig::default(), &mut progress).unwrap();

        assert_eq!(progress.started, Some(image.len()));
        assert_eq!(progress.positions, vec![18, 34, 50]);
        assert_eq!(progress.loader_ready, 1);
        assert_eq!(progress.verifying, 1);
        assert_eq!(progress.complete, Some(report));
    }

    #[test]
    fn test_custom_threshold() {
        let mut codec = DummyCodec::new_default();
        let config = LoaderConfig {
            patch_threshold: 0x4000_0000,
            ..Default::default()
        };
        let image = image(&[end(), data(0x4000_0020, &[0x77])]);

        download(&mut codec, &image, &config, &mut NoProgress).unwrap();

        assert_eq!(
            codec.patches(),
            &[AppliedPatch {
                target: 0x20,
                data: vec![0x77],
            }]
        );
    }

    #[test]
    fn test_read_version() {
        let mut codec = DummyCodec::new_default();
        let version = read_version(&mut codec).unwrap();

        assert_eq!(version.chip, 9);
        assert_eq!((version.major, version.minor), (3, 0x12));
        assert_eq!((version.patch_major, version.patch_minor), (2, 0));
        assert_eq!(version.release_type, 1);
        assert_eq!(version.rom_patch, [0, 1, 2]);
        assert_eq!(
            codec.ops(),
            &[Op::BulkRead(FIRMWARE_VER_LO, 6), Op::BulkRead(PATCH_HI, 3)]
        );
    }

    #[test]
    fn test_wait_for_device() {
        let mut codec = DummyCodec::new(DummyConfig {
            ready_after: 2,
            ..Default::default()
        });

        wait_for_device(&mut codec, &LoaderConfig::default()).unwrap();

        assert_eq!(status_reads(codec.ops()), 3);
        assert_eq!(codec.elapsed_us(), 2 * 1000 + 200 * 1000);
    }

    #[test]
    fn test_parse_options() {
        let config = parse_options(&[("ready_after", "5"), ("reject_patch", "yes")]).unwrap();
        assert_eq!(config.ready_after, 5);
        assert!(config.reject_patches);
        assert!(!config.never_ready);

        assert!(parse_options(&[("ready_after", "soon")]).is_err());
        assert!(parse_options(&[("boot_fails", "maybe")]).is_err());
    }
}

//! Download progress reporting and results

use core::fmt;

use crate::error::Error;
use crate::srec::Record;

use super::state::LoadState;

/// Summary of a completed download
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records decoded
    pub records: usize,
    /// Data records written directly to their address
    pub direct_records: usize,
    /// Data records written through the patch staging buffer
    pub patch_records: usize,
    /// End records seen (only the first one is acted on)
    pub end_records: usize,
    /// Payload bytes written directly
    pub direct_bytes: usize,
    /// Payload bytes written as patches
    pub patch_bytes: usize,
}

/// Why a download stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadFailure {
    /// State the session was in when the error occurred
    pub state: LoadState,
    /// Image offset of the record being handled
    pub offset: usize,
    /// Number of records decoded before the failure
    pub records: usize,
    /// Underlying error
    pub error: Error,
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "firmware download failed while {} (offset {}, {} records): {}",
            self.state, self.offset, self.records, self.error
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LoadFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Progress callback for firmware downloads
pub trait LoadProgress {
    /// Called once before the first record
    fn started(&mut self, image_len: usize);

    /// Called after each record has been applied
    fn record_applied(&mut self, position: usize, record: &Record);

    /// Called when the ram loader has been acknowledged
    fn loader_ready(&mut self);

    /// Called when the image is exhausted and the final check starts
    fn verifying(&mut self);

    /// Called when the download is confirmed
    fn complete(&mut self, report: &LoadReport);
}

/// A no-op progress reporter
pub struct NoProgress;

impl LoadProgress for NoProgress {
    fn started(&mut self, _image_len: usize) {}
    fn record_applied(&mut self, _position: usize, _record: &Record) {}
    fn loader_ready(&mut self) {}
    fn verifying(&mut self) {}
    fn complete(&mut self, _report: &LoadReport) {}
}

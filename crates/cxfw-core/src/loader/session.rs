//! Per-download session state

use crate::error::{Error, Result};
use crate::srec::{decode_record, Record};

use super::state::{LoadEvent, LoadState};

/// Progress and state of one download attempt
///
/// A session borrows the image for its lifetime and is never reused: once it
/// reaches a terminal state every further transition is rejected.
#[derive(Debug)]
pub struct LoadSession<'a> {
    image: &'a [u8],
    position: usize,
    record_start: usize,
    loader_acknowledged: bool,
    state: LoadState,
    records: usize,
}

impl<'a> LoadSession<'a> {
    /// Create an idle session over `image`
    pub fn new(image: &'a [u8]) -> Self {
        Self {
            image,
            position: 0,
            record_start: 0,
            loader_acknowledged: false,
            state: LoadState::Idle,
            records: 0,
        }
    }

    /// Image being loaded
    pub fn image(&self) -> &'a [u8] {
        self.image
    }

    /// Offset of the next undecoded byte
    pub fn position(&self) -> usize {
        self.position
    }

    /// Offset where the most recently decoded record starts
    pub fn record_start(&self) -> usize {
        self.record_start
    }

    /// True once the ram loader has been acknowledged
    pub fn is_loader_acknowledged(&self) -> bool {
        self.loader_acknowledged
    }

    /// Current state
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Number of records decoded so far
    pub fn records(&self) -> usize {
        self.records
    }

    /// True if every image byte has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.image.len()
    }

    /// Feed `event` to the state machine
    pub fn transition(&mut self, event: LoadEvent) -> Result<LoadState> {
        let next = self.state.on(event)?;
        if next != self.state {
            log::debug!("load session: {} -> {}", self.state, next);
        }
        self.state = next;
        Ok(next)
    }

    /// Decode the record at the current position and step past it
    ///
    /// Returns `None` once the image is exhausted. A decode error leaves the
    /// position on the failing record.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        if self.is_exhausted() {
            return Ok(None);
        }

        let offset = self.position;
        let (record, consumed) =
            decode_record(self.image, offset).map_err(|kind| Error::Decode { offset, kind })?;

        self.record_start = offset;
        self.position += consumed;
        self.records += 1;
        Ok(Some(record))
    }

    /// Record that the ram loader came up
    pub(crate) fn acknowledge_loader(&mut self) {
        self.loader_acknowledged = true;
    }

    /// Move to `Failed`, keeping terminal states untouched
    pub(crate) fn fail(&mut self) {
        if let Ok(next) = self.state.on(LoadEvent::Fault) {
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    const IMAGE: &[u8] = b"S3070000100012345A\r\nS70500000000FA\r\nS70500000000FA\r\n";

    #[test]
    fn test_new_session_is_idle() {
        let session = LoadSession::new(IMAGE);
        assert_eq!(session.state(), LoadState::Idle);
        assert_eq!(session.position(), 0);
        assert!(!session.is_loader_acknowledged());
    }

    #[test]
    fn test_next_record_advances_position() {
        let mut session = LoadSession::new(IMAGE);

        let first = session.next_record().unwrap().unwrap();
        assert_eq!(first.address(), 0x1000);
        assert_eq!(session.position(), 20);
        assert_eq!(session.record_start(), 0);

        // Both end records are consumed like any other record
        assert!(session.next_record().unwrap().unwrap().is_end());
        assert!(session.next_record().unwrap().unwrap().is_end());
        assert_eq!(session.position(), IMAGE.len());
        assert_eq!(session.records(), 3);
        assert!(session.next_record().unwrap().is_none());
    }

    #[test]
    fn test_decode_error_reports_offset() {
        let image = b"S3070000100012345A\r\nS9030000FC\r\n";
        let mut session = LoadSession::new(image);

        session.next_record().unwrap();
        assert_eq!(
            session.next_record(),
            Err(Error::Decode {
                offset: 20,
                kind: DecodeError::UnsupportedType(b'9'),
            })
        );
        assert_eq!(session.position(), 20);
    }

    #[test]
    fn test_fail_keeps_terminal_state() {
        let mut session = LoadSession::new(IMAGE);
        session.transition(LoadEvent::Start).unwrap();
        session.fail();
        assert_eq!(session.state(), LoadState::Failed);

        session.fail();
        assert_eq!(session.state(), LoadState::Failed);
        assert_eq!(session.transition(LoadEvent::Start), Err(Error::InvalidTransition));
    }
}

//! Load session state machine

use core::fmt;

use crate::error::{Error, Result};

/// Phase of a firmware download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadState {
    /// Session created, nothing sent yet
    Idle,
    /// Decoding and applying records
    Streaming,
    /// First end record seen, waiting for the ram loader to come up
    AwaitingLoaderReady,
    /// Image exhausted, confirming the device is ready
    Verifying,
    /// Download confirmed
    Loaded,
    /// Download aborted
    Failed,
}

/// Inputs that move a session between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadEvent {
    /// Download begins
    Start,
    /// First end record decoded
    FirstEnd,
    /// Ram loader reported ready
    LoaderReady,
    /// No bytes left in the image
    ImageDone,
    /// Final status check passed
    Verified,
    /// Any error
    Fault,
}

impl LoadState {
    /// Apply `event`, returning the next state
    ///
    /// Terminal states accept no events, and a fault moves any other state
    /// to [`LoadState::Failed`].
    pub fn on(self, event: LoadEvent) -> Result<LoadState> {
        use LoadEvent as E;
        use LoadState as S;

        match (self, event) {
            (S::Loaded | S::Failed, _) => Err(Error::InvalidTransition),
            (_, E::Fault) => Ok(S::Failed),
            (S::Idle, E::Start) => Ok(S::Streaming),
            (S::Streaming, E::FirstEnd) => Ok(S::AwaitingLoaderReady),
            (S::AwaitingLoaderReady, E::LoaderReady) => Ok(S::Streaming),
            (S::Streaming, E::ImageDone) => Ok(S::Verifying),
            (S::Verifying, E::Verified) => Ok(S::Loaded),
            _ => Err(Error::InvalidTransition),
        }
    }

    /// True for `Loaded` and `Failed`
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Loaded | Self::Failed)
    }

    /// Short lowercase name for log messages
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Streaming => "streaming",
            Self::AwaitingLoaderReady => "awaiting loader",
            Self::Verifying => "verifying",
            Self::Loaded => "loaded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut state = LoadState::Idle;
        for event in [
            LoadEvent::Start,
            LoadEvent::FirstEnd,
            LoadEvent::LoaderReady,
            LoadEvent::ImageDone,
            LoadEvent::Verified,
        ] {
            state = state.on(event).unwrap();
        }
        assert_eq!(state, LoadState::Loaded);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_image_without_end_record() {
        let state = LoadState::Idle
            .on(LoadEvent::Start)
            .and_then(|s| s.on(LoadEvent::ImageDone))
            .unwrap();
        assert_eq!(state, LoadState::Verifying);
    }

    #[test]
    fn test_fault_from_any_live_state() {
        for state in [
            LoadState::Idle,
            LoadState::Streaming,
            LoadState::AwaitingLoaderReady,
            LoadState::Verifying,
        ] {
            assert_eq!(state.on(LoadEvent::Fault), Ok(LoadState::Failed));
        }
    }

    #[test]
    fn test_terminal_states_are_final() {
        for state in [LoadState::Loaded, LoadState::Failed] {
            assert_eq!(state.on(LoadEvent::Fault), Err(Error::InvalidTransition));
            assert_eq!(state.on(LoadEvent::Start), Err(Error::InvalidTransition));
        }
    }

    #[test]
    fn test_illegal_transitions() {
        assert_eq!(LoadState::Idle.on(LoadEvent::FirstEnd), Err(Error::InvalidTransition));
        assert_eq!(
            LoadState::AwaitingLoaderReady.on(LoadEvent::ImageDone),
            Err(Error::InvalidTransition)
        );
        assert_eq!(
            LoadState::Streaming.on(LoadEvent::Verified),
            Err(Error::InvalidTransition)
        );
        assert_eq!(
            LoadState::Streaming.on(LoadEvent::LoaderReady),
            Err(Error::InvalidTransition)
        );
    }
}

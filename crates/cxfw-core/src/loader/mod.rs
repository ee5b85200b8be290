//! Firmware loader
//!
//! The protocol engine that takes a decoded image into the codec:
//!
//! - [`LoadSession`] holds the position and phase of one download
//! - [`LoadState`] is the session's state machine
//! - [`PatchDescriptor`] is the staging format for patch-range records
//! - [`download`] runs an image to completion against a [`RegisterPort`]
//!
//! [`RegisterPort`]: crate::regmap::RegisterPort

mod download;
mod patch;
mod progress;
mod session;
mod state;

pub use download::{download, run_session, wait_for_device};
pub use patch::{PatchDescriptor, HEADER_LEN as PATCH_HEADER_LEN, MAX_DESCRIPTOR_LEN};
pub use progress::{LoadFailure, LoadProgress, LoadReport, NoProgress};
pub use session::LoadSession;
pub use state::{LoadEvent, LoadState};

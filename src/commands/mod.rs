//! CLI command implementations
//!
//! Every command that talks to a codec takes a `&mut dyn RegisterPort`, so
//! the same implementation works with the emulator and with real hardware.

mod decode;
mod list;
mod load;
mod version;

pub use decode::run_decode;
pub use list::list_programmers;
pub use load::run_load;
pub use version::run_version;

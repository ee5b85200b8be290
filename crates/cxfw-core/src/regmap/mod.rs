//! Register access port
//!
//! The firmware loader never talks to a bus directly. Everything goes
//! through the [`RegisterPort`] trait, which the surrounding driver (or one
//! of the backend crates) implements for its transport.

mod traits;

pub use traits::RegisterPort;

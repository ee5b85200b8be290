//! cxfw-core - Core library for CX2070x DSP firmware delivery
//!
//! This crate decodes the S-record style firmware images shipped for the
//! Conexant CX2070x codec family and drives them into the device through a
//! register access port. It is designed to be `no_std` compatible so the same
//! protocol engine can run on a host tool or on an embedded controller that
//! owns the codec's I2C bus.
//!
//! # Features
//!
//! - `std` - Enable standard library support (includes `alloc`, TOML config)
//! - `alloc` - Enable heap allocation (record encoding)
//! - `is_sync` - Compile the port trait and protocol as blocking code
//!
//! # Example
//!
//! ```ignore
//! use cxfw_core::config::LoaderConfig;
//! use cxfw_core::loader::{self, NoProgress};
//! use cxfw_core::regmap::RegisterPort;
//!
//! fn bring_up<P: RegisterPort>(port: &mut P, image: &[u8]) {
//!     let config = LoaderConfig::default();
//!     match loader::download(port, image, &config, &mut NoProgress) {
//!         Ok(report) => println!("Loaded {} records", report.records),
//!         Err(e) => println!("Download failed: {}", e),
//!     }
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
// Allow async fn in traits - we use maybe-async for dual sync/async support
#![allow(async_fn_in_trait)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod config;
pub mod cx2070x;
pub mod error;
pub mod loader;
pub mod poll;
pub mod regmap;
pub mod srec;
pub mod version;

pub use error::{DecodeError, Error, Result};

//! Programmer registration and dispatch
//!
//! This module provides a centralized registry for all programmers, with support
//! for feature-gated inclusion and dynamic help text generation.

use cxfw_core::regmap::RegisterPort;

/// Information about a programmer
pub struct ProgrammerInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all available programmers (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_programmers() -> Vec<ProgrammerInfo> {
    let mut programmers = Vec::new();

    #[cfg(feature = "dummy")]
    programmers.push(ProgrammerInfo {
        name: "dummy",
        aliases: &[],
        description: "Emulated CX2070x for testing (ready_after=<n>,reject_patch=<yes|no>)",
    });

    #[cfg(feature = "linux-i2c")]
    programmers.push(ProgrammerInfo {
        name: "linux_i2c",
        aliases: &["linux-i2c", "i2cdev"],
        description: "Linux i2c-dev interface (dev=/dev/i2c-N,addr=<0xNN>,maxlen=<bytes>)",
    });

    programmers
}

/// Generate help text listing all available programmers
pub fn programmer_help() -> String {
    let programmers = available_programmers();

    if programmers.is_empty() {
        return "No programmers available (recompile with programmer features enabled)".to_string();
    }

    let mut help = String::from("Available programmers:\n");
    for p in &programmers {
        help.push_str(&format!("  {:12} - {}\n", p.name, p.description));
    }
    help
}

/// Generate a short list of programmer names for CLI help
pub fn programmer_names_short() -> String {
    let programmers = available_programmers();
    let names: Vec<&str> = programmers.iter().map(|p| p.name).collect();
    names.join(", ")
}

/// Resolve a programmer name or alias to its primary name
pub fn find_programmer(name: &str) -> Option<&'static str> {
    available_programmers()
        .into_iter()
        .find(|p| p.name == name || p.aliases.contains(&name))
        .map(|p| p.name)
}

/// Execute a function with the specified programmer
///
/// The programmer string can be just the name (e.g., "dummy") or include
/// parameters (e.g., "linux_i2c:dev=/dev/i2c-1,addr=0x14").
#[allow(unused_variables)]
pub fn with_programmer<F>(programmer: &str, f: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&mut dyn RegisterPort) -> Result<(), Box<dyn std::error::Error>>,
{
    let (name, options) = parse_programmer_string(programmer);

    let canonical_name = match find_programmer(name) {
        Some(n) => n,
        None => {
            return Err(unknown_programmer_error(name));
        }
    };

    match canonical_name {
        #[cfg(feature = "dummy")]
        "dummy" => {
            use cxfw_dummy::{parse_options, DummyCodec};

            let config =
                parse_options(&options).map_err(|e| format!("Invalid dummy parameters: {}", e))?;

            log::info!("Using emulated CX2070x");
            let mut codec = DummyCodec::new(config);
            let result = f(&mut codec);
            log::debug!(
                "dummy: {} register accesses, {} patches, {} us of delays",
                codec.ops().len(),
                codec.patches().len(),
                codec.elapsed_us()
            );
            result
        }

        #[cfg(feature = "linux-i2c")]
        "linux_i2c" => {
            use cxfw_linux_i2c::{parse_options, LinuxI2c};

            log::info!("Opening Linux I2C programmer...");

            let config = parse_options(&options)
                .map_err(|e| format!("Invalid linux_i2c parameters: {}", e))?;

            let mut codec = LinuxI2c::open(&config).map_err(|e| {
                format!(
                    "Failed to open Linux I2C device: {}\n\
                     Make sure the device exists and you have read/write permissions.\n\
                     You may need to: sudo usermod -aG i2c $USER",
                    e
                )
            })?;

            f(&mut codec)
        }

        _ => Err(unknown_programmer_error(name)),
    }
}

/// Parse a programmer string into name and options
///
/// Format: "name" or "name:option1=value1,option2=value2"
pub fn parse_programmer_string(s: &str) -> (&str, Vec<(&str, &str)>) {
    if let Some((name, opts)) = s.split_once(':') {
        let options: Vec<_> = opts
            .split(',')
            .filter_map(|opt| opt.split_once('='))
            .collect();
        (name, options)
    } else {
        (s, Vec::new())
    }
}

fn unknown_programmer_error(name: &str) -> Box<dyn std::error::Error> {
    let mut msg = format!("Unknown programmer: {}\n\n", name);
    msg.push_str(&programmer_help());
    msg.push_str("\nUse 'cxfw list-programmers' for more details");
    msg.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_programmer_string() {
        assert_eq!(parse_programmer_string("dummy"), ("dummy", vec![]));
        assert_eq!(
            parse_programmer_string("linux_i2c:dev=/dev/i2c-1,addr=0x14"),
            ("linux_i2c", vec![("dev", "/dev/i2c-1"), ("addr", "0x14")])
        );
        // Options without a value are dropped
        assert_eq!(
            parse_programmer_string("dummy:reject_patch,ready_after=2"),
            ("dummy", vec![("ready_after", "2")])
        );
    }

    #[test]
    fn test_find_programmer() {
        assert_eq!(find_programmer("nonexistent"), None);
        #[cfg(feature = "linux-i2c")]
        assert_eq!(find_programmer("i2cdev"), Some("linux_i2c"));
        #[cfg(feature = "dummy")]
        assert_eq!(find_programmer("dummy"), Some("dummy"));
    }
}

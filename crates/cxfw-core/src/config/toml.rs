//! TOML loader configuration parsing
//!
//! All sections and keys are optional; anything left out keeps the
//! CX2070x default. Numbers may be written as integers or as `"0x..."`
//! strings.

use std::fmt;
use std::fs;
use std::path::Path;
use std::string::{String, ToString};
use std::format;

use super::LoaderConfig;

/// Errors that can occur when loading a configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file could not be read
    Io(String),
    /// The file is not valid configuration TOML
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "cannot read config: {}", msg),
            Self::Parse(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// TOML config file structure
#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfigFile {
    #[serde(default)]
    registers: TomlRegisters,
    #[serde(default)]
    codes: TomlCodes,
    #[serde(default)]
    poll: TomlPoll,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlRegisters {
    #[serde(default, deserialize_with = "deserialize_opt_u32")]
    status: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_opt_u32")]
    staging: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_opt_u32")]
    control: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_opt_u32")]
    patch_threshold: Option<u32>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlCodes {
    #[serde(default, deserialize_with = "deserialize_opt_u8")]
    ready: Option<u8>,
    #[serde(default, deserialize_with = "deserialize_opt_u8")]
    finalize: Option<u8>,
    #[serde(default, deserialize_with = "deserialize_opt_u8")]
    trigger: Option<u8>,
    #[serde(default, deserialize_with = "deserialize_opt_u8")]
    accepted: Option<u8>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlPoll {
    #[serde(default, deserialize_with = "deserialize_opt_u32")]
    max_attempts: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_opt_u32")]
    interval_us: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_opt_u32")]
    settle_ms: Option<u32>,
}

/// Deserialize a u32 that can be hex (0x...) or decimal
fn deserialize_opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum HexOrInt {
        Int(u32),
        Str(String),
    }

    match HexOrInt::deserialize(deserializer)? {
        HexOrInt::Int(n) => Ok(Some(n)),
        HexOrInt::Str(s) => parse_number(&s).map(Some).map_err(serde::de::Error::custom),
    }
}

fn deserialize_opt_u8<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match deserialize_opt_u32(deserializer)? {
        Some(n) => u8::try_from(n)
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("value {} does not fit in a byte", n))),
        None => Ok(None),
    }
}

/// Parse a number that can be hex (0x...) or decimal
fn parse_number(s: &str) -> Result<u32, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("invalid hex: {}", e))
    } else {
        s.parse().map_err(|e| format!("invalid number: {}", e))
    }
}

impl LoaderConfig {
    /// Load a configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse a configuration from a TOML string, starting from the defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: TomlConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut config = LoaderConfig::default();

        let regs = file.registers;
        config.status_reg = regs.status.unwrap_or(config.status_reg);
        config.staging_reg = regs.staging.unwrap_or(config.staging_reg);
        config.control_reg = regs.control.unwrap_or(config.control_reg);
        config.patch_threshold = regs.patch_threshold.unwrap_or(config.patch_threshold);

        let codes = file.codes;
        config.ready_code = codes.ready.unwrap_or(config.ready_code);
        config.finalize_code = codes.finalize.unwrap_or(config.finalize_code);
        config.trigger_code = codes.trigger.unwrap_or(config.trigger_code);
        config.accepted_code = codes.accepted.unwrap_or(config.accepted_code);

        let poll = file.poll;
        config.ready_poll.max_attempts = poll.max_attempts.unwrap_or(config.ready_poll.max_attempts);
        config.ready_poll.interval_us = poll.interval_us.unwrap_or(config.ready_poll.interval_us);
        config.settle_ms = poll.settle_ms.unwrap_or(config.settle_ms);

        log::debug!("Loaded loader config: {:?}", config);
        Ok(config)
    }
}

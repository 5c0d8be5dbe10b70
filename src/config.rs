//! # Configuration Management
//!
//! Centralized configuration for the codec, the framing layer and logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()` (`ZKTX_CODEC_*`)
//!
//! ## Security Considerations
//! - `max_message_size` bounds the input a single decode will look at
//! - `recursion_limit` bounds stack depth for nested messages
//! - `max_frame_length` bounds what a stream peer can make us buffer

use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Largest input a single decode accepts by default (16 MB)
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Default nesting budget for embedded messages
pub const DEFAULT_RECURSION_LIMIT: u32 = 100;

/// Largest frame the delimited codec accepts by default (4 MB)
pub const DEFAULT_MAX_FRAME_LENGTH: usize = 4 * 1024 * 1024;

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct CodecConfig {
    /// Decode limits
    #[serde(default)]
    pub decode: DecodeConfig,

    /// Stream framing limits
    #[serde(default)]
    pub framing: FramingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| CodecError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| CodecError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| CodecError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables.
    ///
    /// Unset variables keep their defaults; set but unparsable ones are errors.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(val) = env_parse::<usize>("ZKTX_CODEC_MAX_MESSAGE_SIZE")? {
            config.decode.max_message_size = val;
        }

        if let Some(val) = env_parse::<u32>("ZKTX_CODEC_RECURSION_LIMIT")? {
            config.decode.recursion_limit = val;
        }

        if let Some(val) = env_parse::<usize>("ZKTX_CODEC_MAX_FRAME_LENGTH")? {
            config.framing.max_frame_length = val;
        }

        if let Ok(level) = std::env::var("ZKTX_CODEC_LOG_LEVEL") {
            config.logging.log_level = level.parse::<Level>().map_err(|_| {
                CodecError::ConfigError(format!("Invalid ZKTX_CODEC_LOG_LEVEL: {level}"))
            })?;
        }

        if let Some(val) = env_parse::<bool>("ZKTX_CODEC_LOG_JSON")? {
            config.logging.json_format = val;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CodecError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| CodecError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.decode.validate());
        errors.extend(self.framing.validate());
        errors.extend(self.logging.validate());

        if self.framing.max_frame_length > self.decode.max_message_size {
            errors.push(format!(
                "Max frame length ({}) exceeds max message size ({}); oversized frames would fail at decode",
                self.framing.max_frame_length, self.decode.max_message_size
            ));
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CodecError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| CodecError::ConfigError(format!("Invalid {key}: {raw}"))),
        Err(_) => Ok(None),
    }
}

/// Limits applied to every decode call
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Inputs longer than this are rejected before parsing
    pub max_message_size: usize,

    /// Maximum depth of embedded messages
    pub recursion_limit: u32,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl DecodeConfig {
    /// Validate decode limits
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_message_size == 0 {
            errors.push("Max message size cannot be 0".to_string());
        } else if self.max_message_size > i32::MAX as usize {
            errors.push(format!(
                "Max message size too large: {} bytes (maximum: {})",
                self.max_message_size,
                i32::MAX
            ));
        }

        if self.recursion_limit == 0 {
            errors.push("Recursion limit must be greater than 0".to_string());
        } else if self.recursion_limit > 10_000 {
            errors.push(format!(
                "Recursion limit very high: {} (maximum recommended: 10,000)",
                self.recursion_limit
            ));
        }

        errors
    }
}

/// Limits for the varint-delimited stream codec
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct FramingConfig {
    /// Frames announcing more payload than this are rejected
    pub max_frame_length: usize,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            max_frame_length: DEFAULT_MAX_FRAME_LENGTH,
        }
    }
}

impl FramingConfig {
    /// Validate framing limits
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_frame_length == 0 {
            errors.push("Max frame length cannot be 0".to_string());
        } else if self.max_frame_length > i32::MAX as usize {
            errors.push(format!(
                "Max frame length too large: {} bytes (maximum: {})",
                self.max_frame_length,
                i32::MAX
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("zktx-codec"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}

//! Structured logging setup
//!
//! The codec itself only emits `tracing` events; installing a subscriber is
//! left to the embedding application. `init_logging` is the convenience path
//! for binaries, tests and benches that want the configured format.

use crate::config::LoggingConfig;
use crate::error::{constants, CodecError, Result};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global subscriber from `config`.
///
/// `RUST_LOG` takes precedence over `config.log_level` when set.
///
/// # Errors
/// `ConfigError` if a global subscriber is already installed
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_ascii_lowercase()));

    let installed = if config.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init()
    };

    installed.map_err(|_| CodecError::ConfigError(constants::ERR_LOGGING_INSTALLED.to_string()))?;

    info!(
        app = %config.app_name,
        level = %config.log_level,
        json = config.json_format,
        "Logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        let config = LoggingConfig::default();
        // First call may lose to another test in this binary
        let _ = init_logging(&config);
        assert!(matches!(
            init_logging(&config),
            Err(CodecError::ConfigError(_))
        ));
    }
}

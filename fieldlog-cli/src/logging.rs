//! Logging initialization for the fieldlog CLI.
//!
//! Configures `tracing-subscriber` based on the `[general]` section
//! of `FieldlogConfig`. Log lines go to stderr so that stdout carries
//! only command output.

use std::io::Write;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use fieldlog_core::config::GeneralConfig;

use crate::error::CliError;

/// Initialize the global tracing subscriber.
///
/// Must be called at most once, before any tracing macros are used.
/// `RUST_LOG` wins over `level_override`, which wins over `config.log_level`.
///
/// # Formats
///
/// * `"json"` - Machine-parseable JSON lines
/// * `"pretty"` - Human-readable colored output
pub fn init_tracing(config: &GeneralConfig, level_override: Option<&str>) -> Result<(), CliError> {
    let level = level_override.unwrap_or(&config.log_level);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match config.log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| {
                CliError::Config(format!("failed to initialize JSON tracing subscriber: {e}"))
            }),
        "pretty" => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| {
                CliError::Config(format!("failed to initialize pretty tracing subscriber: {e}"))
            }),
        other => Err(CliError::Config(format!(
            "unknown log format '{other}', expected 'json' or 'pretty'"
        ))),
    }
}

/// Report a tracing setup failure on `w` and keep going.
///
/// Used where the command should still run without logs (e.g. `config`
/// against a broken file). Returns `true` if tracing was initialized.
pub fn warn_on_failure(result: Result<(), CliError>, w: &mut dyn Write) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            let _ = writeln!(w, "warning: logging disabled: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format_rejected() {
        let config = GeneralConfig {
            log_level: "info".to_owned(),
            log_format: "xml".to_owned(),
        };
        let err = init_tracing(&config, None).expect_err("xml format should be rejected");
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn test_setup_failure_is_reported() {
        let config = GeneralConfig {
            log_level: "info".to_owned(),
            log_format: "xml".to_owned(),
        };
        let mut buffer = Vec::new();
        let initialized = warn_on_failure(init_tracing(&config, None), &mut buffer);

        assert!(!initialized);
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.starts_with("warning: logging disabled"));
        assert!(output.contains("xml"));
    }

    #[test]
    fn test_success_writes_nothing() {
        let mut buffer = Vec::new();
        assert!(warn_on_failure(Ok(()), &mut buffer));
        assert!(buffer.is_empty());
    }
}

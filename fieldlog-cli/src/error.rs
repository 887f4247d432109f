//! CLI-specific error types and exit code mapping

use fieldlog_analyzer::AnalyzerError;
use fieldlog_core::error::{AnalysisError, FieldlogError};

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering or report writing.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (report write, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from fieldlog-core.
    #[error("{0}")]
    Core(#[from] FieldlogError),

    /// Analysis engine error.
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalyzerError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                        |
    /// |------|--------------------------------|
    /// | 0    | Success                        |
    /// | 1    | General / command error        |
    /// | 2    | Configuration error            |
    /// | 3    | Invalid analysis date          |
    /// | 10   | IO error                       |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Io(_) => 10,
            Self::Core(FieldlogError::Config(_)) => 2,
            Self::Core(FieldlogError::Analysis(AnalysisError::InvalidDate(_))) => 3,
            Self::Core(FieldlogError::Io(_)) => 10,
            Self::Analysis(AnalyzerError::InvalidDate { .. }) => 3,
            Self::Analysis(AnalyzerError::Config { .. }) => 2,
            Self::Analysis(AnalyzerError::Io { .. }) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

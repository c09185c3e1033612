//! CLI-specific error types and exit code mapping

use fieldlearn_core::error::FieldLearnError;
use fieldlearn_learner::LearnerError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Learning did not converge (too many rules survived).
    #[error("learning failed: {0}")]
    Convergence(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from fieldlearn-core.
    #[error("{0}")]
    Core(#[from] FieldLearnError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                  |
    /// |------|------------------------------------------|
    /// | 0    | Success                                  |
    /// | 1    | General / command error                  |
    /// | 2    | Configuration error                      |
    /// | 3    | Learning did not converge (too many rules) |
    /// | 10   | IO error                                 |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Convergence(_) => 3,
            Self::Io(_) => 10,
            Self::Core(FieldLearnError::Config(_)) => 2,
            Self::Core(e) if e.is_convergence_failure() => 3,
            Self::Core(FieldLearnError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<LearnerError> for CliError {
    fn from(e: LearnerError) -> Self {
        match e {
            LearnerError::TooManyRules { .. } => Self::Convergence(e.to_string()),
            LearnerError::Config { .. } => Self::Config(e.to_string()),
            other => Self::Command(other.to_string()),
        }
    }
}

use forge_core::WfcError;
use forge_rules::{LoadError, RuleError};
use thiserror::Error;

/// Errors surfaced by the binary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Settings Error: {0}")]
    Settings(#[from] figment::Error),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rule File Error: {0}")]
    Rules(#[from] LoadError),

    #[error("Model Error: {0}")]
    Model(#[from] RuleError),

    #[error("WFC Core Error: {0}")]
    WfcCore(#[from] WfcError),

    #[error("Solver thread panicked")]
    WorkerPanicked,

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    /// Process exit code: 2 when every try failed, 3 when the run was
    /// cancelled, 1 otherwise.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::WfcCore(WfcError::NoSolutionFound { .. }) => 2,
            Self::WfcCore(WfcError::Interrupted) => 3,
            _ => 1,
        }
    }
}

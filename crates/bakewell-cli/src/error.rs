use thiserror::Error;

use bakewell_core::{
    AnalysisError, ConfigError, DeltaReportError, SourceError, ValidationError,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Report(#[from] DeltaReportError),

    #[error("{0}")]
    Command(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Validation(_) | CliError::Config(_) | CliError::Command(_) => 2,
            CliError::Analysis(_) | CliError::Report(_) => 3,
            CliError::Serialization(_) => 4,
            CliError::Source(_) => 6,
            CliError::Io(_) => 10,
        }
    }
}

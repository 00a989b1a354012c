use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{var} environment variable not set")]
    MissingCredential { var: String },
}

/// The single error an analysis surfaces to its caller. Transport, remote and
/// decoding causes are logged where they happen and collapsed into this.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Failed to get analysis from AI model.")]
pub struct AnalysisFailure;

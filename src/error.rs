use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("chunk size must be a positive integer, got {0}")]
    InvalidChunkSize(usize),
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Failure of an external completion or embedding capability.
/// The message is the provider's own text, kept verbatim for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("model unavailable: {0}")]
    Unavailable(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("service error: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis of chunk {index} failed: {source}")]
    Chunk {
        index: usize,
        #[source]
        source: ServiceError,
    },
    #[error("roll-up failed: {0}")]
    RollUp(#[source] ServiceError),
    #[error("no chunk analyses to summarize")]
    NoInsights,
}

//! Error types for the popefinder pipeline
//!
//! Every failure is per-call and surfaces to the invoking CLI layer;
//! nothing is swallowed or retried inside the core.

use thiserror::Error;

/// Main error type for the chat pipeline and its collaborators
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Backend call failed (network or API level). Transient: the caller
    /// may retry, the pipeline itself never does.
    #[error("Backend call failed: {0}")]
    Backend(String),

    /// Backend returned no usable content for this call
    #[error("Backend returned an empty response")]
    EmptyResponse,

    /// Response text did not match the expected schema. Carries the raw
    /// text for diagnostics.
    #[error("Failed to parse structured output: {message}")]
    ParseFailure { message: String, raw: String },

    /// Vector store unreachable during ingestion or retrieval
    #[error("Vector store unavailable: {0}")]
    StoreUnavailable(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

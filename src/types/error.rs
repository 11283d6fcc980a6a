//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Taxonomy
//!
//! - **Selection**: no files matched after exclusion (fatal to the batch)
//! - **Generate(ContentTooLarge)**: definition exceeds generator capacity;
//!   recovered per definition, batch continues
//! - **Generate(Transport / MalformedResponse)**: any other generator
//!   failure, with the same local recovery
//! - **OutputConflict**: copy-mode target already exists; configurable
//!   between failing that file or skipping it, never silently overwritten
//! - **Fidelity**: transformed output failed the lossless round-trip check
//!   (internal defect, fatal for that file only)
//!
//! ## Design Principles
//!
//! - Single unified error type (DocsmithError) for the entire application
//! - Per-definition failures never escalate past the file being processed;
//!   per-file failures never escalate past the batch
//! - No panic/unwrap - all errors are recoverable

use std::path::PathBuf;
use thiserror::Error;

/// Convenient result alias for the entire crate
pub type Result<T> = std::result::Result<T, DocsmithError>;

// =============================================================================
// Generator Error
// =============================================================================

/// Failure classes a generator call can produce
///
/// The transformer only branches on `ContentTooLarge` (the definition cannot
/// fit the generator's capacity); everything else is recovered identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateErrorKind {
    /// Definition text exceeds what the generator can accept
    ContentTooLarge,
    /// Network or service failure
    Transport,
    /// Generator responded, but the payload did not parse into a schema
    MalformedResponse,
}

impl std::fmt::Display for GenerateErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContentTooLarge => write!(f, "CONTENT_TOO_LARGE"),
            Self::Transport => write!(f, "TRANSPORT"),
            Self::MalformedResponse => write!(f, "MALFORMED_RESPONSE"),
        }
    }
}

/// Error produced by a [`DocstringGenerator`](crate::generator::DocstringGenerator) call
///
/// Retry policy, if any, belongs to the generator implementation; the engine
/// never retries internally.
#[derive(Debug, Clone)]
pub struct GenerateError {
    /// Failure class for routing decisions
    pub kind: GenerateErrorKind,
    /// Detailed error message
    pub message: String,
    /// Generator that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.kind, self.message)
        } else {
            write!(f, "[{}] {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for GenerateError {}

impl GenerateError {
    pub fn new(kind: GenerateErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            provider: None,
        }
    }

    /// Add generator context to an existing error
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn content_too_large(message: impl Into<String>) -> Self {
        Self::new(GenerateErrorKind::ContentTooLarge, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(GenerateErrorKind::Transport, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(GenerateErrorKind::MalformedResponse, message)
    }

    /// Check whether this is the distinguishable capacity condition
    pub fn is_capacity(&self) -> bool {
        self.kind == GenerateErrorKind::ContentTooLarge
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum DocsmithError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Parse error in {path}: {message}")]
    Parse { message: String, path: String },

    #[error("Selection error: {0}")]
    Selection(String),

    #[error("Output conflict: {} already exists", path.display())]
    OutputConflict { path: PathBuf },

    #[error("Round-trip fidelity violated for {path}: {message}")]
    Fidelity { message: String, path: String },

    #[error("Generation failed: {0}")]
    Generate(GenerateError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl From<GenerateError> for DocsmithError {
    fn from(err: GenerateError) -> Self {
        DocsmithError::Generate(err)
    }
}

impl From<r2d2::Error> for DocsmithError {
    fn from(err: r2d2::Error) -> Self {
        DocsmithError::Cache(format!("Connection pool error: {}", err))
    }
}

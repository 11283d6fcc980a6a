//! Generator Contract
//!
//! The abstract boundary the transformer calls through to obtain structured
//! docstring content. The LLM-backed implementation lives in [`openai`];
//! [`cache`] wraps any generator with durable memoization. Tests substitute
//! in-memory mocks.
//!
//! The engine never retries a failed call internally; retry policy, if any,
//! belongs to the implementation behind this trait.

pub mod cache;
pub mod openai;

pub use cache::{CachedGenerator, GenerationCache};
pub use openai::OpenAiGenerator;

use async_trait::async_trait;
use std::sync::Arc;

use crate::analyzer::Language;
use crate::schema::DocstringData;
use crate::types::{DefinitionKind, GenerateError};

/// Shared generator handle for concurrent file workers
pub type SharedGenerator = Arc<dyn DocstringGenerator>;

/// Everything that affects generator output, bundled so the cache can key on
/// the whole of it
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// Source language of the definition
    pub language: Language,
    /// Cleaned definition text (blank lines stripped, trimmed)
    pub definition: String,
    /// Function or class
    pub kind: DefinitionKind,
    /// Sampling temperature
    pub temperature: f32,
}

#[async_trait]
pub trait DocstringGenerator: Send + Sync {
    /// Produce structured docstring content for one definition.
    ///
    /// Fails with [`GenerateErrorKind::ContentTooLarge`] when the definition
    /// exceeds the service's capacity, and with `Transport` or
    /// `MalformedResponse` for anything else.
    ///
    /// [`GenerateErrorKind::ContentTooLarge`]: crate::types::GenerateErrorKind::ContentTooLarge
    async fn generate(&self, request: &GenerateRequest)
    -> Result<DocstringData, GenerateError>;

    /// Generator name for logging
    fn name(&self) -> &str;
}

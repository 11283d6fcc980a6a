//! Docsmith - AI-Assisted Docstring Insertion Engine
//!
//! Augments Python source files with synthesized docstrings for functions
//! and classes that lack one, without disturbing any other byte of the file.
//!
//! ## Core Features
//!
//! - **Lossless Insertion**: CST-driven splicing via tree-sitter; untouched
//!   source is carried through byte-identical
//! - **Pluggable Rendering**: Google and NumPy docstring conventions over
//!   one schema
//! - **Durable Memoization**: generator calls cached in SQLite, keyed by
//!   language, definition text, kind, and temperature
//! - **Bounded Concurrency**: files processed in parallel under a worker
//!   pool, tolerant of partial failure
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use docsmith::{BatchDriver, CachedGenerator, Config, GenerationCache, OpenAiGenerator};
//!
//! let config = Config::default();
//! let cache = Arc::new(GenerationCache::open(&config.cache_path)?);
//! let openai = Arc::new(OpenAiGenerator::new(None, config.openai.clone())?);
//! let generator = Arc::new(CachedGenerator::new(cache, openai));
//! let report = BatchDriver::new(config, generator).run().await?;
//! ```
//!
//! ## Modules
//!
//! - [`transform`]: the syntax transformer (the engine's core)
//! - [`schema`]: docstring content model and style builders
//! - [`generator`]: generator contract, OpenAI backend, generation cache
//! - [`batch`]: bounded-concurrency batch driver
//! - [`analyzer`]: language registry and glob file selection
//! - [`config`]: configuration types and Figment loader

pub mod analyzer;
pub mod batch;
pub mod cli;
pub mod config;
pub mod constants;
pub mod generator;
pub mod schema;
pub mod transform;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, OnConflict, QuoteStyle};

// Error Types
pub use types::{DefinitionKind, DocsmithError, GenerateError, GenerateErrorKind, Result};

// Schema & Builders
pub use schema::{
    BuilderStyle, ClassDocstring, DocstringBuilder, DocstringData, FunctionDocstring,
    GoogleBuilder, NumpyBuilder, ParameterDoc, RaiseDoc, ReturnDoc, create_builder,
};

// Generator
pub use generator::{
    CachedGenerator, DocstringGenerator, GenerateRequest, GenerationCache, OpenAiGenerator,
    SharedGenerator,
};

// Engine
pub use batch::{BatchDriver, BatchReport, FileFailure};
pub use transform::{DocstringTransformer, SkippedDefinition, TransformOutcome};

// Analyzer
pub use analyzer::{Language, select_files};

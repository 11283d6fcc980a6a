//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Generation cache constants
pub mod cache {
    /// Cache scheme version, baked into every cache key.
    ///
    /// Bump this whenever the docstring schema or the prompt changes in a
    /// way that makes old entries incompatible. Old entries stay in the
    /// store but are never matched again.
    pub const SCHEME_VERSION: u32 = 1;

    /// Default on-disk location of the SQLite cache store
    pub const DEFAULT_CACHE_PATH: &str = ".docsmith/cache.db";
}

/// Transformer constants
pub mod transform {
    /// Method name that marks a Python constructor
    pub const INIT_METHOD_NAME: &str = "__init__";

    /// Boilerplate lead-ins stripped from generated descriptions
    pub const BOILERPLATE_PREFIXES: &[&str] = &["This function", "This method", "This class"];

    /// Prefix for derived sibling output files in copy mode
    pub const OUTPUT_FILE_PREFIX: &str = "modified_";
}

/// Generator defaults
pub mod generator {
    /// Default sampling temperature for docstring generation
    pub const DEFAULT_TEMPERATURE: f32 = 0.25;

    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Default OpenAI model
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

    /// Default OpenAI-compatible API base URL
    pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
}

/// Batch driver defaults
pub mod batch {
    /// Default bounded worker pool size
    pub const DEFAULT_MAX_WORKERS: usize = 10;
}

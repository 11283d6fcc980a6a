//! Configuration Types
//!
//! The full configuration surface consumed by the engine, with sensible
//! defaults and range validation. Loaded by [`ConfigLoader`] and overridden
//! by CLI flags.
//!
//! [`ConfigLoader`]: super::ConfigLoader

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::analyzer::Language;
use crate::constants::batch::DEFAULT_MAX_WORKERS;
use crate::constants::cache::DEFAULT_CACHE_PATH;
use crate::constants::generator::DEFAULT_TEMPERATURE;
use crate::generator::openai::OpenAiConfig;
use crate::schema::BuilderStyle;
use crate::types::{DocsmithError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Glob rules selecting files to process
    pub include: Vec<String>,

    /// Glob rules removing files from the selection
    pub exclude: Vec<String>,

    /// Overwrite originals instead of writing `modified_<basename>` siblings
    pub inplace: bool,

    /// What to do when a copy-mode output path already exists
    pub on_conflict: OnConflict,

    /// Indent width used when the file's own indent unit cannot be detected
    pub indent_size: usize,

    /// Bounded worker pool size for the batch driver
    pub max_workers: usize,

    /// Docstring delimiter style
    pub quote_style: QuoteStyle,

    /// Docstring convention rendered by the builder
    pub builder_style: BuilderStyle,

    /// Sampling temperature passed to the generator
    pub temperature: f32,

    /// Leave constructor methods undocumented
    pub skip_init_methods: bool,

    /// Source language (one grammar per run)
    pub language: Language,

    /// Location of the durable generation cache
    pub cache_path: PathBuf,

    /// OpenAI generator settings
    pub openai: OpenAiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            inplace: false,
            on_conflict: OnConflict::Fail,
            indent_size: 4,
            max_workers: DEFAULT_MAX_WORKERS,
            quote_style: QuoteStyle::TripleDouble,
            builder_style: BuilderStyle::Google,
            temperature: DEFAULT_TEMPERATURE,
            skip_init_methods: true,
            language: Language::Python,
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            openai: OpenAiConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `DocsmithError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(DocsmithError::Config(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if self.indent_size == 0 {
            return Err(DocsmithError::Config(
                "indent_size must be greater than 0".to_string(),
            ));
        }

        if self.max_workers == 0 {
            return Err(DocsmithError::Config(
                "max_workers must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Fallback indent unit derived from `indent_size`
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent_size)
    }
}

// =============================================================================
// Enumerated Options
// =============================================================================

/// Docstring delimiter convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum QuoteStyle {
    #[default]
    TripleDouble,
    TripleSingle,
    Double,
    Single,
}

impl QuoteStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TripleDouble => "\"\"\"",
            Self::TripleSingle => "'''",
            Self::Double => "\"",
            Self::Single => "'",
        }
    }

    /// Delimiter to wrap a rendered block with.
    ///
    /// Single-quote delimiters cannot span lines in Python, so multi-line
    /// blocks are promoted to the matching triple-quoted variant.
    pub fn delimiter_for(&self, multiline: bool) -> &'static str {
        match (self, multiline) {
            (Self::Double, true) => Self::TripleDouble.as_str(),
            (Self::Single, true) => Self::TripleSingle.as_str(),
            _ => self.as_str(),
        }
    }
}

/// Policy for an already-existing copy-mode output path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OnConflict {
    /// Report the file as failed, leave the existing output untouched
    #[default]
    Fail,
    /// Leave the existing output untouched and move on silently
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_temperature_range() {
        let config = Config {
            temperature: 3.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = Config {
            max_workers: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_quote_style_str() {
        assert_eq!(QuoteStyle::TripleDouble.as_str(), "\"\"\"");
        assert_eq!(QuoteStyle::Single.as_str(), "'");
    }

    #[test]
    fn test_single_quote_styles_promote_for_multiline() {
        assert_eq!(QuoteStyle::Single.delimiter_for(true), "'''");
        assert_eq!(QuoteStyle::Double.delimiter_for(true), "\"\"\"");
        assert_eq!(QuoteStyle::Single.delimiter_for(false), "'");
        assert_eq!(QuoteStyle::TripleDouble.delimiter_for(true), "\"\"\"");
        assert_eq!(QuoteStyle::TripleSingle.delimiter_for(false), "'''");
    }
}

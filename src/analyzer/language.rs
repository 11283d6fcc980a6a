//! Language Registry
//!
//! One CST grammar is assumed per run. Python is the shipped grammar; the
//! enum exists so the generator receives a stylized language name and new
//! grammars can slot in without touching the transformer's contract.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{DocsmithError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
}

impl Language {
    /// Preferred stylization of the language name, as passed to the generator
    pub fn stylized_name(&self) -> &'static str {
        match self {
            Self::Python => "Python",
        }
    }

    /// Lowercase identifier used in cache keys and config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
        }
    }

    /// Tree-sitter grammar for this language
    pub fn grammar(&self) -> tree_sitter::Language {
        match self {
            Self::Python => tree_sitter_python::LANGUAGE.into(),
        }
    }

    /// Build a tree-sitter parser configured for this language
    pub fn parser(&self) -> Result<tree_sitter::Parser> {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&self.grammar()).map_err(|e| {
            DocsmithError::Config(format!(
                "Failed to load {} grammar: {}",
                self.stylized_name(),
                e
            ))
        })?;
        Ok(parser)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

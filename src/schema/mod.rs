//! Documentation Schema
//!
//! The structured content model every generated docstring conforms to:
//! a one-sentence, verb-initial description, plus (for functions only)
//! ordered parameter, return-value, and raised-error sections.
//!
//! Class docstrings carry a description and nothing else; the two cases are
//! modeled as a tagged union sharing the description capability so the
//! transformer stays generic over definition kind.

pub mod builder;

pub use builder::{BuilderStyle, DocstringBuilder, GoogleBuilder, NumpyBuilder, create_builder};

use serde::{Deserialize, Serialize};

use crate::constants::transform::BOILERPLATE_PREFIXES;
use crate::types::{DefinitionKind, GenerateError, capitalize_first};

// =============================================================================
// Schema Items
// =============================================================================

/// One documented function parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterDoc {
    pub name: String,
    pub description: String,
    /// Assumed type(s), e.g. "str, int"; empty when the generator had no guess
    pub assumed_type: String,
}

/// One documented return value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnDoc {
    pub name: String,
    pub description: String,
    pub assumed_type: String,
}

/// One documented raised error
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaiseDoc {
    pub name: String,
    pub description: String,
}

// =============================================================================
// Docstring Data
// =============================================================================

/// Structured docstring content for a function definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionDocstring {
    /// One-sentence, verb-initial description
    pub description: String,
    pub parameters: Vec<ParameterDoc>,
    pub returns: Vec<ReturnDoc>,
    pub raises: Vec<RaiseDoc>,
}

/// Structured docstring content for a class definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassDocstring {
    /// One-sentence, verb-initial description
    pub description: String,
}

/// Tagged union over the two definition kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DocstringData {
    Function(FunctionDocstring),
    Class(ClassDocstring),
}

impl DocstringData {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::Function(_) => DefinitionKind::Function,
            Self::Class(_) => DefinitionKind::Class,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Function(data) => &data.description,
            Self::Class(data) => &data.description,
        }
    }

    fn description_mut(&mut self) -> &mut String {
        match self {
            Self::Function(data) => &mut data.description,
            Self::Class(data) => &mut data.description,
        }
    }

    /// Normalize a freshly generated description.
    ///
    /// Strips one boilerplate lead-in ("This function", "This method",
    /// "This class"), trims whitespace, and capitalizes the first letter.
    /// An empty description afterwards counts as a malformed generator
    /// response, never as valid content.
    pub fn postprocess(mut self) -> Result<Self, GenerateError> {
        let description = self.description_mut();
        let mut text = description.as_str();

        for prefix in BOILERPLATE_PREFIXES {
            if let Some(rest) = text.strip_prefix(prefix) {
                text = rest;
                break;
            }
        }

        let cleaned = capitalize_first(text.trim());
        if cleaned.is_empty() {
            return Err(GenerateError::malformed(
                "generated description is empty after post-processing",
            ));
        }

        *description = cleaned;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postprocess_strips_boilerplate_and_capitalizes() {
        let data = DocstringData::Function(FunctionDocstring {
            description: "This function computes the dot product of two vectors.".to_string(),
            ..Default::default()
        });

        let data = data.postprocess().unwrap();
        assert_eq!(
            data.description(),
            "Computes the dot product of two vectors."
        );
    }

    #[test]
    fn test_postprocess_class_prefix() {
        let data = DocstringData::Class(ClassDocstring {
            description: "This class represents a 2D point.".to_string(),
        });

        assert_eq!(
            data.postprocess().unwrap().description(),
            "Represents a 2D point."
        );
    }

    #[test]
    fn test_postprocess_only_first_prefix_removed() {
        // Only one lead-in is stripped, matching the fixed prefix list
        let data = DocstringData::Class(ClassDocstring {
            description: "This method This class does things.".to_string(),
        });

        assert_eq!(
            data.postprocess().unwrap().description(),
            "This class does things."
        );
    }

    #[test]
    fn test_postprocess_rejects_empty_description() {
        let data = DocstringData::Function(FunctionDocstring {
            description: "This function   ".to_string(),
            ..Default::default()
        });

        let err = data.postprocess().unwrap_err();
        assert_eq!(err.kind, crate::types::GenerateErrorKind::MalformedResponse);
    }

    #[test]
    fn test_serde_roundtrip_preserves_kind_tag() {
        let data = DocstringData::Class(ClassDocstring {
            description: "Represents a point.".to_string(),
        });

        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"kind\":\"class\""));

        let back: DocstringData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}

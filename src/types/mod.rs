pub mod error;

pub use error::{DocsmithError, GenerateError, GenerateErrorKind, Result};

// =============================================================================
// Definition Kind
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// The unit the engine documents: a function or a class definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    Function,
    Class,
}

impl DefinitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capitalize the first character of a string.
/// Used when post-processing generated descriptions.
#[inline]
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("computes a sum"), "Computes a sum");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("Already"), "Already");
    }

    #[test]
    fn test_definition_kind_str() {
        assert_eq!(DefinitionKind::Function.as_str(), "function");
        assert_eq!(DefinitionKind::Class.to_string(), "class");
    }
}

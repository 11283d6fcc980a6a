//! Docstring Builders
//!
//! Pure rendering: schema + indent unit in, style-specific text block out.
//! No I/O, no tree knowledge. The transformer indents and quote-wraps the
//! returned block afterwards.
//!
//! Two conventions are supported and are selected by configuration, not by
//! subclassing: Google (`Args:` / `Returns:` / `Raises:`) and NumPy
//! (underlined section headers). Both consume the identical schema.

use serde::{Deserialize, Serialize};

use super::{DocstringData, FunctionDocstring};

// =============================================================================
// Builder Selection
// =============================================================================

/// Docstring convention selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuilderStyle {
    #[default]
    Google,
    Numpy,
}

/// Create the configured builder variant
pub fn create_builder(style: BuilderStyle) -> Box<dyn DocstringBuilder> {
    match style {
        BuilderStyle::Google => Box::new(GoogleBuilder),
        BuilderStyle::Numpy => Box::new(NumpyBuilder),
    }
}

/// Renders a [`DocstringData`] into a text block.
///
/// Contract: first line is the description; each non-empty section follows
/// after one blank line, with one entry per item indented by the indent
/// unit relative to the block's left margin. Empty sections render nothing,
/// not even a header.
pub trait DocstringBuilder: Send + Sync {
    fn build(&self, data: &DocstringData, indent_unit: &str) -> String;
}

// =============================================================================
// Google Style
// =============================================================================

pub struct GoogleBuilder;

impl GoogleBuilder {
    fn section<T, F>(lines: &mut Vec<String>, title: &str, items: &[T], indent: &str, entry: F)
    where
        F: Fn(&T) -> String,
    {
        if items.is_empty() {
            return;
        }

        lines.push(String::new());
        lines.push(format!("{title}:"));
        for item in items {
            lines.push(format!("{indent}{}", entry(item)));
        }
    }

    fn function_sections(lines: &mut Vec<String>, data: &FunctionDocstring, indent: &str) {
        Self::section(lines, "Args", &data.parameters, indent, |p| {
            let ty = annotate_type(&p.assumed_type);
            format!("{}{}: {}", or_value(&p.name), ty, p.description)
        });
        Self::section(lines, "Returns", &data.returns, indent, |r| {
            let ty = annotate_type(&r.assumed_type);
            format!("{}{}: {}", or_value(&r.name), ty, r.description)
        });
        Self::section(lines, "Raises", &data.raises, indent, |e| {
            format!("{}: {}", or_value(&e.name), e.description)
        });
    }
}

impl DocstringBuilder for GoogleBuilder {
    fn build(&self, data: &DocstringData, indent_unit: &str) -> String {
        let mut lines = vec![data.description().to_string()];

        if let DocstringData::Function(func) = data {
            Self::function_sections(&mut lines, func, indent_unit);
        }

        lines.join("\n")
    }
}

// =============================================================================
// NumPy Style
// =============================================================================

pub struct NumpyBuilder;

impl NumpyBuilder {
    fn section<T, F>(lines: &mut Vec<String>, title: &str, items: &[T], indent: &str, entry: F)
    where
        F: Fn(&T) -> (String, String),
    {
        if items.is_empty() {
            return;
        }

        lines.push(String::new());
        lines.push(title.to_string());
        lines.push("-".repeat(title.len()));
        for item in items {
            let (head, description) = entry(item);
            lines.push(format!("{indent}{head}"));
            lines.push(format!("{indent}{indent}{description}"));
        }
    }
}

impl DocstringBuilder for NumpyBuilder {
    fn build(&self, data: &DocstringData, indent_unit: &str) -> String {
        let mut lines = vec![data.description().to_string()];

        if let DocstringData::Function(func) = data {
            Self::section(&mut lines, "Parameters", &func.parameters, indent_unit, |p| {
                (
                    format!("{} : {}", or_value(&p.name), p.assumed_type),
                    p.description.clone(),
                )
            });
            Self::section(&mut lines, "Returns", &func.returns, indent_unit, |r| {
                (
                    format!("{} : {}", or_value(&r.name), r.assumed_type),
                    r.description.clone(),
                )
            });
            Self::section(&mut lines, "Raises", &func.raises, indent_unit, |e| {
                (or_value(&e.name).to_string(), e.description.clone())
            });
        }

        lines.join("\n")
    }
}

fn or_value(name: &str) -> &str {
    if name.is_empty() { "value" } else { name }
}

fn annotate_type(assumed_type: &str) -> String {
    if assumed_type.is_empty() {
        String::new()
    } else {
        format!(" ({assumed_type})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ClassDocstring, ParameterDoc, RaiseDoc, ReturnDoc};

    fn sample_function() -> DocstringData {
        DocstringData::Function(FunctionDocstring {
            description: "Computes the dot product of two vectors.".to_string(),
            parameters: vec![
                ParameterDoc {
                    name: "a".to_string(),
                    description: "First vector.".to_string(),
                    assumed_type: "list".to_string(),
                },
                ParameterDoc {
                    name: "b".to_string(),
                    description: "Second vector.".to_string(),
                    assumed_type: String::new(),
                },
            ],
            returns: vec![ReturnDoc {
                name: "product".to_string(),
                description: "The dot product.".to_string(),
                assumed_type: "float".to_string(),
            }],
            raises: vec![RaiseDoc {
                name: "ValueError".to_string(),
                description: "If the vectors differ in length.".to_string(),
            }],
        })
    }

    #[test]
    fn test_google_full_layout() {
        let block = GoogleBuilder.build(&sample_function(), "    ");
        let expected = "\
Computes the dot product of two vectors.

Args:
    a (list): First vector.
    b: Second vector.

Returns:
    product (float): The dot product.

Raises:
    ValueError: If the vectors differ in length.";
        assert_eq!(block, expected);
    }

    #[test]
    fn test_numpy_full_layout() {
        let block = NumpyBuilder.build(&sample_function(), "    ");
        assert!(block.starts_with("Computes the dot product of two vectors."));
        assert!(block.contains("Parameters\n----------\n    a : list\n        First vector."));
        assert!(block.contains("Returns\n-------\n    product : float"));
        assert!(block.contains("Raises\n------\n    ValueError"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let data = DocstringData::Function(FunctionDocstring {
            description: "Does nothing.".to_string(),
            ..Default::default()
        });

        for style in [BuilderStyle::Google, BuilderStyle::Numpy] {
            let block = create_builder(style).build(&data, "    ");
            assert_eq!(block, "Does nothing.", "style {:?}", style);
        }
    }

    #[test]
    fn test_class_renders_description_only() {
        let data = DocstringData::Class(ClassDocstring {
            description: "Represents a 2D point.".to_string(),
        });

        for style in [BuilderStyle::Google, BuilderStyle::Numpy] {
            let block = create_builder(style).build(&data, "  ");
            assert_eq!(block, "Represents a 2D point.", "style {:?}", style);
        }
    }

    #[test]
    fn test_unnamed_items_fall_back_to_value() {
        let data = DocstringData::Function(FunctionDocstring {
            description: "Returns a constant.".to_string(),
            returns: vec![ReturnDoc {
                name: String::new(),
                description: "Always 42.".to_string(),
                assumed_type: "int".to_string(),
            }],
            ..Default::default()
        });

        let block = GoogleBuilder.build(&data, "    ");
        assert!(block.contains("    value (int): Always 42."));
    }
}

//! Syntax Transformer
//!
//! The documentation-insertion engine. Parses a whole file with tree-sitter,
//! collects function and class definitions in post-order, decides per
//! definition whether to skip, insert, or fail gracefully, and splices the
//! rendered docstring back via byte-span edits applied highest-offset-first.
//!
//! Every byte outside the inserted docstring lines is carried through
//! untouched; for definitions whose body shared a line with the signature,
//! the body is re-wrapped onto its own lines as well. That round-trip
//! fidelity is the central correctness property of working on the CST
//! instead of patching text.

use tracing::{debug, warn};

use crate::config::Config;
use crate::generator::{DocstringGenerator, GenerateRequest};
use crate::schema::{DocstringBuilder, create_builder};
use crate::types::{DefinitionKind, DocsmithError, GenerateError, Result};

mod site;

use site::{DefinitionSite, collect_sites};

// =============================================================================
// Outcome Types
// =============================================================================

/// A definition the transformer left undocumented, with the cause
#[derive(Debug, Clone)]
pub struct SkippedDefinition {
    pub name: String,
    pub kind: DefinitionKind,
    /// 1-based source line of the definition
    pub line: usize,
    pub error: GenerateError,
}

/// Result of transforming one file
#[derive(Debug)]
pub struct TransformOutcome {
    /// Rewritten source text
    pub code: String,
    /// Number of docstrings inserted
    pub inserted: usize,
    /// Definitions skipped because generation failed
    pub skipped: Vec<SkippedDefinition>,
}

/// One byte-span rewrite against the original source
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

// =============================================================================
// Transformer
// =============================================================================

pub struct DocstringTransformer<'a> {
    config: &'a Config,
    generator: &'a dyn DocstringGenerator,
    builder: Box<dyn DocstringBuilder>,
}

impl<'a> DocstringTransformer<'a> {
    pub fn new(config: &'a Config, generator: &'a dyn DocstringGenerator) -> Self {
        Self {
            config,
            generator,
            builder: create_builder(config.builder_style),
        }
    }

    /// Transform one file's source text.
    ///
    /// Definitions are processed sequentially in post-order; a failed
    /// generation skips that definition and the rest of the file continues.
    pub async fn transform(&self, path: &str, source: &str) -> Result<TransformOutcome> {
        let mut parser = self.config.language.parser()?;
        let tree = parser.parse(source, None).ok_or_else(|| DocsmithError::Parse {
            message: format!("Failed to parse {} file", self.config.language.stylized_name()),
            path: path.to_string(),
        })?;

        let input_had_errors = tree.root_node().has_error();
        let sites = collect_sites(tree.root_node(), source);

        let indent_unit =
            detect_indent_unit(source).unwrap_or_else(|| self.config.indent_unit());

        let mut edits: Vec<Edit> = Vec::new();
        let mut skipped = Vec::new();

        for site in &sites {
            if !self.is_eligible(site) {
                continue;
            }

            match self.generate_for(site, source).await {
                Ok(data) => edits.push(self.splice(site, &data, &indent_unit)),
                Err(error) => {
                    warn!(
                        path,
                        definition = %site.name,
                        kind = %site.kind,
                        %error,
                        "Failed to generate docstring for definition, skipping"
                    );
                    skipped.push(SkippedDefinition {
                        name: site.name.clone(),
                        kind: site.kind,
                        line: site.start_row + 1,
                        error,
                    });
                }
            }
        }

        let inserted = edits.len();
        let code = apply_edits(source, edits);

        // Insertion must never introduce a syntax error the input did not have
        if !input_had_errors {
            let reparsed = parser.parse(&code, None).ok_or_else(|| DocsmithError::Parse {
                message: "Failed to re-parse transformed output".to_string(),
                path: path.to_string(),
            })?;
            if reparsed.root_node().has_error() {
                return Err(DocsmithError::Fidelity {
                    message: "transformed output no longer parses cleanly".to_string(),
                    path: path.to_string(),
                });
            }
        }

        debug!(path, inserted, skipped = skipped.len(), "Transformed file");

        Ok(TransformOutcome {
            code,
            inserted,
            skipped,
        })
    }

    /// Eligibility never consults the generator: documented definitions and
    /// configured-out constructors are skipped before any content is fetched
    fn is_eligible(&self, site: &DefinitionSite) -> bool {
        if site.has_docstring {
            return false;
        }

        if self.config.skip_init_methods
            && site.kind == DefinitionKind::Function
            && site.name == crate::constants::transform::INIT_METHOD_NAME
        {
            return false;
        }

        true
    }

    async fn generate_for(
        &self,
        site: &DefinitionSite,
        source: &str,
    ) -> std::result::Result<crate::schema::DocstringData, GenerateError> {
        let definition = clean_definition_text(&source[site.payload_start..site.payload_end]);

        let request = GenerateRequest {
            language: self.config.language,
            definition,
            kind: site.kind,
            temperature: self.config.temperature,
        };

        let data = self.generator.generate(&request).await?;
        data.postprocess()
    }

    fn splice(
        &self,
        site: &DefinitionSite,
        data: &crate::schema::DocstringData,
        indent_unit: &str,
    ) -> Edit {
        let block = self.builder.build(data, indent_unit);
        let quote = self.config.quote_style.delimiter_for(block.contains('\n'));

        if site.inline_body {
            // Body shared the signature line: re-wrap it as an indented
            // block with the docstring first and blank lines around the
            // original statements
            let body_indent = nested_indent(indent_unit, site.start_col);
            let docstring = wrap_docstring(&block, &body_indent, quote);
            let original_body = &site.body_text;
            Edit {
                start: site.colon_end,
                end: site.body_end,
                text: format!("\n{body_indent}{docstring}\n\n{body_indent}{original_body}\n"),
            }
        } else {
            // Indented block: insert before the first statement, reusing its
            // exact indentation
            let body_indent = &site.first_stmt_indent;
            let docstring = wrap_docstring(&block, body_indent, quote);
            Edit {
                start: site.first_stmt_start,
                end: site.first_stmt_start,
                text: format!("{docstring}\n\n{body_indent}"),
            }
        }
    }
}

// =============================================================================
// Text Helpers
// =============================================================================

/// Reduce a definition's payload before sending it to the generator:
/// drop blank lines, trim surrounding whitespace
fn clean_definition_text(definition: &str) -> String {
    definition
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Detect the file's own indent unit: the leading whitespace of the first
/// indented line that follows a block opener
fn detect_indent_unit(source: &str) -> Option<String> {
    let mut prev_opens_block = false;

    for line in source.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let indent = &line[..line.len() - trimmed.len()];
        if prev_opens_block && !indent.is_empty() {
            return Some(indent.to_string());
        }

        prev_opens_block = trimmed.trim_end().ends_with(':');
    }

    None
}

/// Indentation for a body synthesized from an inline definition: the
/// enclosing nesting level plus one, clamped to at least one unit
fn nested_indent(indent_unit: &str, start_col: usize) -> String {
    let unit_width = indent_unit.len().max(1);
    let level = start_col / unit_width;
    indent_unit.repeat((level + 1).max(1))
}

/// Indent a rendered block and wrap it in the configured delimiters.
///
/// A description-only block stays on one line; anything longer opens after
/// the delimiter and closes on its own indented line.
fn wrap_docstring(block: &str, indent: &str, quote: &str) -> String {
    if !block.contains('\n') {
        return format!("{quote}{block}{quote}");
    }

    let mut out = String::from(quote);
    out.push('\n');
    for line in block.lines() {
        if !line.is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
        out.push('\n');
    }
    out.push_str(indent);
    out.push_str(quote);
    out
}

/// Apply edits back-to-front so earlier offsets stay valid
fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| b.start.cmp(&a.start));

    let mut output = source.to_string();
    for edit in edits {
        output.replace_range(edit.start..edit.end, &edit.text);
    }
    output
}

//! Definition Site Collection
//!
//! Walks a parsed tree and extracts every function and class definition into
//! an owned [`DefinitionSite`], post-order (children before parents), so the
//! async generation loop never holds tree nodes across awaits.

use tree_sitter::Node;

use crate::types::DefinitionKind;

/// A function or class definition lifted out of the tree.
///
/// Byte offsets index into the original source and stay valid because edits
/// are applied back-to-front.
#[derive(Debug, Clone)]
pub struct DefinitionSite {
    pub kind: DefinitionKind,
    pub name: String,
    /// 0-based row of the `def`/`class` keyword
    pub start_row: usize,
    /// Start column, used to derive nesting depth for inline bodies
    pub start_col: usize,
    /// Payload span sent to the generator; includes decorators
    pub payload_start: usize,
    pub payload_end: usize,
    /// Byte just past the `:` that introduces the body
    pub colon_end: usize,
    /// End of the body (equals the definition end)
    pub body_end: usize,
    /// Verbatim body text, kept for re-wrapping inline bodies
    pub body_text: String,
    /// Body shares a line with the signature's closing `:`
    pub inline_body: bool,
    /// Start of the first non-comment body statement
    pub first_stmt_start: usize,
    /// Exact leading whitespace of the first statement's line
    pub first_stmt_indent: String,
    /// First statement is already a string-literal expression
    pub has_docstring: bool,
}

/// Collect all definition sites in post-order
pub fn collect_sites(root: Node<'_>, source: &str) -> Vec<DefinitionSite> {
    let mut sites = Vec::new();
    visit(root, source, &mut sites);
    sites
}

fn visit(node: Node<'_>, source: &str, sites: &mut Vec<DefinitionSite>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, source, sites);
    }

    if matches!(node.kind(), "function_definition" | "class_definition")
        && let Some(site) = DefinitionSite::from_node(node, source)
    {
        sites.push(site);
    }
}

impl DefinitionSite {
    fn from_node(node: Node<'_>, source: &str) -> Option<Self> {
        let kind = match node.kind() {
            "function_definition" => DefinitionKind::Function,
            "class_definition" => DefinitionKind::Class,
            _ => return None,
        };

        let name = node
            .child_by_field_name("name")
            .map(|n| source[n.byte_range()].to_string())?;

        let body = node
            .child_by_field_name("body")
            .filter(|b| b.kind() == "block")?;

        let colon = {
            let mut cursor = node.walk();
            node.children(&mut cursor)
                .filter(|c| c.kind() == ":" && c.start_byte() < body.start_byte())
                .last()?
        };

        let first_stmt = {
            let mut cursor = body.walk();
            body.named_children(&mut cursor)
                .find(|c| c.kind() != "comment")?
        };

        let has_docstring = first_stmt.kind() == "expression_statement"
            && first_stmt
                .named_child(0)
                .is_some_and(|expr| expr.kind() == "string");

        let inline_body = body.start_position().row == colon.end_position().row;

        let first_stmt_start = first_stmt.start_byte();
        let first_stmt_indent = if inline_body {
            String::new()
        } else {
            line_indent(source, first_stmt_start)
        };

        // Decorators travel with the definition in the generation payload
        let payload_node = match node.parent() {
            Some(parent) if parent.kind() == "decorated_definition" => parent,
            _ => node,
        };

        Some(Self {
            kind,
            name,
            start_row: node.start_position().row,
            start_col: node.start_position().column,
            payload_start: payload_node.start_byte(),
            payload_end: payload_node.end_byte(),
            colon_end: colon.end_byte(),
            body_end: body.end_byte(),
            body_text: source[body.byte_range()].to_string(),
            inline_body,
            first_stmt_start,
            first_stmt_indent,
            has_docstring,
        })
    }
}

/// Leading whitespace of the line containing the given byte offset
fn line_indent(source: &str, offset: usize) -> String {
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    source[line_start..offset]
        .chars()
        .take_while(|c| c.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Language;

    fn sites_for(source: &str) -> Vec<DefinitionSite> {
        let mut parser = Language::Python.parser().unwrap();
        let tree = parser.parse(source, None).unwrap();
        collect_sites(tree.root_node(), source)
    }

    #[test]
    fn test_post_order_children_before_parents() {
        let source = "class A:\n    def m(self):\n        def inner():\n            pass\n        return inner\n";
        let names: Vec<_> = sites_for(source).iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, vec!["inner", "m", "A"]);
    }

    #[test]
    fn test_docstring_detection() {
        let documented = "def f():\n    \"\"\"Doc.\"\"\"\n    return 1\n";
        assert!(sites_for(documented)[0].has_docstring);

        let bare = "def f():\n    return 1\n";
        assert!(!sites_for(bare)[0].has_docstring);

        // A string that is not the first statement does not count
        let late = "def f():\n    x = 1\n    \"note\"\n";
        assert!(!sites_for(late)[0].has_docstring);
    }

    #[test]
    fn test_comment_before_first_statement_is_skipped() {
        let source = "def f():\n    # setup\n    \"\"\"Doc.\"\"\"\n    return 1\n";
        assert!(sites_for(source)[0].has_docstring);
    }

    #[test]
    fn test_inline_body_detection() {
        assert!(sites_for("def f(): return 1\n")[0].inline_body);
        assert!(!sites_for("def f():\n    return 1\n")[0].inline_body);

        // Multi-line signature with the body on the closing line still
        // counts as inline
        let folded = "def f(a,\n      b): return a + b\n";
        assert!(sites_for(folded)[0].inline_body);
    }

    #[test]
    fn test_payload_includes_decorators() {
        let source = "@wraps(f)\n@cached\ndef f():\n    return 1\n";
        let site = &sites_for(source)[0];
        assert!(source[site.payload_start..site.payload_end].starts_with("@wraps(f)"));
    }

    #[test]
    fn test_first_stmt_indent_is_exact() {
        let source = "class A:\n  def m(self):\n      return 1\n";
        let method = sites_for(source)
            .into_iter()
            .find(|s| s.name == "m")
            .unwrap();
        assert_eq!(method.first_stmt_indent, "      ");
    }
}

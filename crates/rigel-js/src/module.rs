//! Parsed JavaScript modules and their top-level constant bindings.

use rigel_constant::ConstantValue;
use tracing::debug;
use tree_sitter::{Node, Tree};

use crate::node::JsNode;
use crate::node_text;

/// Failure to obtain a syntax tree at all.
///
/// Parse errors *inside* the source do not fail the bridge: tree-sitter
/// trees are best-effort and unparsed regions simply resolve as Unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("tree-sitter parser unavailable: {0}")]
    ParserUnavailable(String),
    #[error("tree-sitter failed to produce a syntax tree")]
    NoTree,
}

/// One parsed JavaScript source, owning its text and syntax tree.
///
/// Every [`JsNode`] borrows from its module, so a reparse invalidates all
/// outstanding constant values by construction; nothing is cached across
/// parses.
pub struct JsModule {
    source: String,
    tree: Tree,
}

impl JsModule {
    pub fn parse(source: impl Into<String>) -> Result<Self, ParseError> {
        let source = source.into();
        let tree = crate::parse_javascript(&source)?;
        debug!(
            bytes = source.len(),
            has_errors = tree.root_node().has_error(),
            "parsed javascript module"
        );
        Ok(Self { source, tree })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The constant value bound to a top-level `name`.
    pub fn constant(&self, name: &str) -> Option<ConstantValue<JsNode<'_>>> {
        let node = self.top_level_declaration(name)?;
        Some(ConstantValue::of(JsNode::new(self, node)))
    }

    /// All top-level bindings usable as constants, in source order:
    /// `const`/`let`/`var` declarators with an initializer plus class
    /// declarations. `export` wrappers are looked through.
    pub fn constants(&self) -> Vec<(String, ConstantValue<JsNode<'_>>)> {
        let mut out = Vec::new();
        self.each_top_level_binding(|binding, node| {
            out.push((
                binding.to_string(),
                ConstantValue::of(JsNode::new(self, node)),
            ));
            false
        });
        out
    }

    /// The node a top-level `name` is bound to: a declarator's initializer,
    /// or a class declaration itself.
    pub(crate) fn top_level_declaration(&self, name: &str) -> Option<Node<'_>> {
        let mut found = None;
        self.each_top_level_binding(|binding, node| {
            if binding == name {
                found = Some(node);
                true
            } else {
                false
            }
        });
        found
    }

    /// Visit top-level bindings until `visit` returns `true`.
    fn each_top_level_binding<'t>(&'t self, mut visit: impl FnMut(&str, Node<'t>) -> bool) {
        let root = self.tree.root_node();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            let declaration = if child.kind() == "export_statement" {
                match child.child_by_field_name("declaration") {
                    Some(inner) => inner,
                    None => continue,
                }
            } else {
                child
            };
            match declaration.kind() {
                "lexical_declaration" | "variable_declaration" => {
                    let mut declarators = declaration.walk();
                    for declarator in declaration.named_children(&mut declarators) {
                        if declarator.kind() != "variable_declarator" {
                            continue;
                        }
                        let (Some(name), Some(value)) = (
                            declarator.child_by_field_name("name"),
                            declarator.child_by_field_name("value"),
                        ) else {
                            continue;
                        };
                        // Destructuring patterns do not bind one constant.
                        if name.kind() != "identifier" {
                            continue;
                        }
                        if visit(node_text(&self.source, name), value) {
                            return;
                        }
                    }
                }
                "class_declaration" => {
                    let Some(name) = declaration.child_by_field_name("name") else {
                        continue;
                    };
                    if visit(node_text(&self.source, name), declaration) {
                        return;
                    }
                }
                _ => {}
            }
        }
    }
}

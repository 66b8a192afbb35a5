//! Adapter from tree-sitter syntax nodes to the resolver's host contract.

use std::fmt;

use num_bigint::BigInt;
use rigel_constant::{ClassRef, ConstantNode, NumericValue, Scalar};
use rigel_core::Span;
use tree_sitter::Node;

use crate::literal::{parse_number_literal, unescape_escape_sequence};
use crate::module::JsModule;
use crate::node_text;

/// A borrowed view of one expression node inside a [`JsModule`].
///
/// Copyable and valid only while the module is alive. Reference chasing
/// happens here, before classification: identifiers are followed to their
/// same-module top-level binding, so an alias of an object literal is an
/// object literal.
#[derive(Clone, Copy)]
pub struct JsNode<'t> {
    module: &'t JsModule,
    node: Node<'t>,
}

impl fmt::Debug for JsNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JsNode({} @ {:?})",
            self.node.kind(),
            self.node.byte_range()
        )
    }
}

impl<'t> JsNode<'t> {
    pub(crate) fn new(module: &'t JsModule, node: Node<'t>) -> Self {
        Self { module, node }
    }

    pub fn syntax(&self) -> Node<'t> {
        self.node
    }

    pub fn text(&self) -> &'t str {
        node_text(self.module.source(), self.node)
    }

    /// Chase parentheses and same-module identifier references down to a
    /// value node. Unresolvable and cyclic references return the identifier
    /// itself, which classifies as Unknown.
    fn resolved(&self) -> Node<'t> {
        let mut node = self.node;
        let mut visited: Vec<usize> = Vec::new();
        loop {
            match node.kind() {
                "parenthesized_expression" => match first_expression_child(node) {
                    Some(inner) => node = inner,
                    None => return node,
                },
                "identifier" | "shorthand_property_identifier" => {
                    if visited.contains(&node.id()) {
                        return node; // reference cycle
                    }
                    visited.push(node.id());
                    let name = node_text(self.module.source(), node);
                    match self.module.top_level_declaration(name) {
                        Some(target) => node = target,
                        None => return node,
                    }
                }
                _ => return node,
            }
        }
    }

    fn scalar_of(&self, node: Node<'t>) -> Option<Scalar> {
        match node.kind() {
            "string" | "template_string" => self.string_value(node).map(Scalar::String),
            "true" => Some(Scalar::Bool(true)),
            "false" => Some(Scalar::Bool(false)),
            "number" => parse_number_literal(node_text(self.module.source(), node))
                .ok()
                .map(Scalar::Number),
            "unary_expression" => self.folded_unary(node).map(Scalar::Number),
            _ => None,
        }
    }

    /// `-5` parses as a prefix expression; fold the sign into the number.
    fn folded_unary(&self, node: Node<'t>) -> Option<NumericValue> {
        let operator = node.child_by_field_name("operator")?;
        let argument = node.child_by_field_name("argument")?;
        let operand = JsNode::new(self.module, argument).resolved();
        if operand.kind() != "number" {
            return None;
        }
        let value = parse_number_literal(node_text(self.module.source(), operand)).ok()?;
        match node_text(self.module.source(), operator) {
            "+" => Some(value),
            "-" => Some(negate(value)),
            _ => None,
        }
    }

    /// Concatenate fragments and expanded escapes. A template substitution
    /// makes the node a computed value, not a string constant.
    fn string_value(&self, node: Node<'t>) -> Option<String> {
        let mut out = String::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "string_fragment" => out.push_str(node_text(self.module.source(), child)),
                "escape_sequence" => {
                    let expanded =
                        unescape_escape_sequence(node_text(self.module.source(), child)).ok()?;
                    out.push_str(&expanded);
                }
                "template_substitution" => return None,
                _ => {}
            }
        }
        Some(out)
    }

    fn object_properties(&self, node: Node<'t>) -> Vec<(String, JsNode<'t>)> {
        let mut out = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "pair" => {
                    let (Some(key), Some(value)) = (
                        child.child_by_field_name("key"),
                        child.child_by_field_name("value"),
                    ) else {
                        continue;
                    };
                    let Some(name) = self.property_name(key) else {
                        continue;
                    };
                    out.push((name, JsNode::new(self.module, value)));
                }
                "shorthand_property_identifier" => {
                    let name = node_text(self.module.source(), child).to_string();
                    out.push((name, JsNode::new(self.module, child)));
                }
                // Methods, spreads and computed keys are not constant
                // properties.
                _ => {}
            }
        }
        out
    }

    fn property_name(&self, key: Node<'t>) -> Option<String> {
        match key.kind() {
            "property_identifier" => Some(node_text(self.module.source(), key).to_string()),
            "string" => self.string_value(key),
            "number" => Some(node_text(self.module.source(), key).to_string()),
            _ => None,
        }
    }
}

impl<'t> ConstantNode for JsNode<'t> {
    fn is_object_literal(&self) -> bool {
        self.resolved().kind() == "object"
    }

    fn is_array_literal(&self) -> bool {
        self.resolved().kind() == "array"
    }

    fn scalar(&self) -> Option<Scalar> {
        let node = self.resolved();
        self.scalar_of(node)
    }

    fn elements(&self) -> Option<Vec<Self>> {
        let node = self.resolved();
        if node.kind() != "array" {
            return None;
        }
        let mut cursor = node.walk();
        let elements = node
            .named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .map(|child| JsNode::new(self.module, child))
            .collect();
        Some(elements)
    }

    fn properties(&self) -> Option<Vec<(String, Self)>> {
        let node = self.resolved();
        (node.kind() == "object").then(|| self.object_properties(node))
    }

    fn class_ref(&self) -> Option<ClassRef> {
        let node = self.resolved();
        if !matches!(node.kind(), "class_declaration" | "class") {
            return None;
        }
        let name = node.child_by_field_name("name")?;
        Some(ClassRef::new(
            node_text(self.module.source(), name),
            Span::new(node.start_byte(), node.end_byte()),
        ))
    }

    fn span(&self) -> Span {
        Span::new(self.node.start_byte(), self.node.end_byte())
    }
}

fn negate(value: NumericValue) -> NumericValue {
    match value {
        NumericValue::Int(v) => match v.checked_neg() {
            Some(negated) => NumericValue::Int(negated),
            None => NumericValue::BigInt(-BigInt::from(v)),
        },
        NumericValue::BigInt(v) => NumericValue::BigInt(-v),
        NumericValue::Float(v) => NumericValue::Float(-v),
    }
}

fn first_expression_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment");
    found
}

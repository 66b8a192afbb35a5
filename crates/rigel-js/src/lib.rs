//! JavaScript host bridge for the rigel constant-value resolver.
//!
//! Parses source text with `tree-sitter-javascript` and adapts its nodes to
//! the [`rigel_constant::ConstantNode`] contract, so framework configuration
//! written as JS object literals can be resolved into typed values. The goal
//! is tooling support for constant expressions, not full evaluation.

use std::cell::RefCell;

use tree_sitter::{Node, Parser, Tree};

pub mod literal;
pub mod module;
pub mod node;

pub use literal::{parse_number_literal, LiteralError};
pub use module::{JsModule, ParseError};
pub use node::JsNode;

thread_local! {
    static JS_PARSER: RefCell<Result<Parser, String>> = RefCell::new({
        let mut parser = Parser::new();
        match parser.set_language(&tree_sitter_javascript::LANGUAGE.into()) {
            Ok(()) => Ok(parser),
            Err(_) => Err("tree-sitter-javascript language load failed".to_string()),
        }
    });
}

/// Parse JavaScript source text with `tree-sitter-javascript`.
pub fn parse_javascript(source: &str) -> Result<Tree, ParseError> {
    JS_PARSER.with(|parser_cell| {
        let mut parser = parser_cell
            .try_borrow_mut()
            .map_err(|_| ParseError::ParserUnavailable("parser is already in use".to_string()))?;
        let parser = parser
            .as_mut()
            .map_err(|message| ParseError::ParserUnavailable(message.clone()))?;

        parser.parse(source, None).ok_or(ParseError::NoTree)
    })
}

/// Return the byte slice for `node` within `source`.
pub(crate) fn node_text<'a>(source: &'a str, node: Node<'_>) -> &'a str {
    &source[node.byte_range()]
}

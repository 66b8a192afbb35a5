//! The host-node contract the resolver runs against.
//!
//! The engine never owns a syntax tree. A [`ConstantNode`] is a cheap copy of
//! a borrowed reference into a host parse tree (tree-sitter, a mock, ...)
//! that stays valid for the duration of a resolver call. Implementations
//! expose the already-parsed shape of the node; all conversion policy lives
//! in this crate.

use std::fmt;

use num_bigint::BigInt;
use rigel_core::Span;
use serde::{Deserialize, Serialize};

/// Semantic kind of a constant-value node, recomputed from the node shape on
/// every call and never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstantValueKind {
    String,
    Boolean,
    Numeric,
    Array,
    ObjectLiteral,
    ClassReference,
    Unknown,
}

/// A constant naming a class rather than carrying a scalar value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassRef {
    pub name: String,
    pub span: Span,
}

impl ClassRef {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// How the host parser stored a numeric literal.
///
/// Exactly one of the three representations, chosen by the host when it
/// parsed the literal: integers that fit 64 bits, bigger integers, or a
/// binary double for anything fractional.
#[derive(Clone, Debug, PartialEq)]
pub enum NumericValue {
    BigInt(BigInt),
    Int(i64),
    Float(f64),
}

/// A scalar literal value as the host parser produced it.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    String(String),
    Bool(bool),
    Number(NumericValue),
}

/// Borrowed, read-only view of one host syntax node.
///
/// Accessors are shape probes: each returns `None`/`false` when the node is
/// not of that shape, so the resolver can try shapes in order without the
/// host reporting errors.
pub trait ConstantNode: Copy + fmt::Debug {
    fn is_object_literal(&self) -> bool;

    fn is_array_literal(&self) -> bool;

    /// The parsed scalar value, if this is a string/boolean/numeric literal.
    fn scalar(&self) -> Option<Scalar>;

    /// Element nodes of an array literal, in source order.
    fn elements(&self) -> Option<Vec<Self>>;

    /// Key/value property nodes of an object literal, in source order.
    /// Property names are unique; the host drops computed keys.
    fn properties(&self) -> Option<Vec<(String, Self)>>;

    /// The class this node names, if it is a class-reference constant.
    fn class_ref(&self) -> Option<ClassRef>;

    fn span(&self) -> Span;
}

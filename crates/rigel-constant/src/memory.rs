//! A simple in-memory host node for unit tests and examples.
//!
//! Real embeddings adapt a parser's syntax nodes; this tree stands in for
//! them where spinning up a parser is not worth it.

use std::str::FromStr;

use num_bigint::BigInt;
use rigel_core::Span;

use crate::node::{ClassRef, ConstantNode, NumericValue, Scalar};

#[derive(Clone, Debug, PartialEq)]
pub enum MemoryData {
    String(String),
    Bool(bool),
    Number(NumericValue),
    Array(Vec<MemoryData>),
    Object(Vec<(String, MemoryData)>),
    Class(String),
    /// A node the classifier cannot interpret, e.g. an unresolved reference.
    Opaque,
}

impl MemoryData {
    pub fn string(value: impl Into<String>) -> Self {
        MemoryData::String(value.into())
    }

    pub fn bool(value: bool) -> Self {
        MemoryData::Bool(value)
    }

    pub fn int(value: i64) -> Self {
        MemoryData::Number(NumericValue::Int(value))
    }

    pub fn float(value: f64) -> Self {
        MemoryData::Number(NumericValue::Float(value))
    }

    pub fn big(digits: &str) -> Self {
        let value = BigInt::from_str(digits).expect("invalid big integer literal in test data");
        MemoryData::Number(NumericValue::BigInt(value))
    }

    pub fn array(elements: impl IntoIterator<Item = MemoryData>) -> Self {
        MemoryData::Array(elements.into_iter().collect())
    }

    pub fn object<'a>(properties: impl IntoIterator<Item = (&'a str, MemoryData)>) -> Self {
        MemoryData::Object(
            properties
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }

    pub fn class(name: impl Into<String>) -> Self {
        MemoryData::Class(name.into())
    }
}

impl<'a> ConstantNode for &'a MemoryData {
    fn is_object_literal(&self) -> bool {
        matches!(self, MemoryData::Object(_))
    }

    fn is_array_literal(&self) -> bool {
        matches!(self, MemoryData::Array(_))
    }

    fn scalar(&self) -> Option<Scalar> {
        match self {
            MemoryData::String(s) => Some(Scalar::String(s.clone())),
            MemoryData::Bool(b) => Some(Scalar::Bool(*b)),
            MemoryData::Number(n) => Some(Scalar::Number(n.clone())),
            _ => None,
        }
    }

    fn elements(&self) -> Option<Vec<Self>> {
        let this: &'a MemoryData = *self;
        match this {
            MemoryData::Array(elements) => Some(elements.iter().collect()),
            _ => None,
        }
    }

    fn properties(&self) -> Option<Vec<(String, Self)>> {
        let this: &'a MemoryData = *self;
        match this {
            MemoryData::Object(properties) => Some(
                properties
                    .iter()
                    .map(|(name, value)| (name.clone(), value))
                    .collect(),
            ),
            _ => None,
        }
    }

    fn class_ref(&self) -> Option<ClassRef> {
        match self {
            MemoryData::Class(name) => Some(ClassRef::new(name.clone(), self.span())),
            _ => None,
        }
    }

    fn span(&self) -> Span {
        Span::new(0, 0)
    }
}

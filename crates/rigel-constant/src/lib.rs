//! Typed constant-value resolution for parsed source models.
//!
//! Framework tooling often needs the *value* of a literal expression (a
//! string, a number in a specific width, a class reference, a whole
//! configuration object literal) without running the program that contains
//! it. This crate takes a borrowed host syntax node (see [`ConstantNode`])
//! and converts it to a caller-chosen [`TargetType`], with numeric
//! widening/narrowing, element-wise array conversion, and a lazy keyed view
//! over object literals.
//!
//! Conversion never fails on a shape mismatch; callers chain speculative
//! attempts and get `None` back. The one hard error is asking for an exact
//! 32-bit integer that does not fit ([`ConvertError::Int32Overflow`]).

pub mod convert;
pub mod memory;
pub mod node;
pub mod object;
pub mod pointer;
pub mod resolver;

pub use convert::{coerce_numeric, ConvertError, TargetType, Value};
pub use node::{ClassRef, ConstantNode, ConstantValueKind, NumericValue, Scalar};
pub use object::ObjectLiteral;
pub use pointer::{JsonPointer, JsonPointerError};
pub use resolver::ConstantValue;

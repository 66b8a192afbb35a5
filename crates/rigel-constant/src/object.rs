//! Read-only keyed view over an object-literal node.

use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use rigel_core::Span;

use crate::convert::{ConvertError, TargetType, Value};
use crate::node::{ClassRef, ConstantNode, ConstantValueKind};
use crate::pointer::{parse_array_index, JsonPointer};
use crate::resolver::ConstantValue;

/// A property bag over one object-literal node.
///
/// The property map is populated lazily on first access and is read-only;
/// population is idempotent. Values are wrapped as [`ConstantValue`]s, so a
/// lookup distinguishes "not found" (`None` from [`property`]) from "found
/// but unconvertible" (`Ok(None)` from a later `convert_to`).
///
/// [`property`]: ObjectLiteral::property
#[derive(Clone, Debug)]
pub struct ObjectLiteral<N: ConstantNode> {
    node: N,
    properties: OnceCell<IndexMap<String, ConstantValue<N>>>,
}

impl<N: ConstantNode> ObjectLiteral<N> {
    /// Wrap `node`, or `None` if it is not an object literal.
    pub fn of(node: N) -> Option<Self> {
        node.is_object_literal().then(|| Self {
            node,
            properties: OnceCell::new(),
        })
    }

    pub fn node(&self) -> N {
        self.node
    }

    pub fn span(&self) -> Span {
        self.node.span()
    }

    /// All properties in source order.
    pub fn properties(&self) -> &IndexMap<String, ConstantValue<N>> {
        self.properties.get_or_init(|| {
            self.node
                .properties()
                .unwrap_or_default()
                .into_iter()
                .map(|(name, node)| (name, ConstantValue::of(node)))
                .collect()
        })
    }

    pub fn property(&self, name: &str) -> Option<ConstantValue<N>> {
        self.properties().get(name).copied()
    }

    pub fn property_as(
        &self,
        name: &str,
        target: &TargetType,
    ) -> Result<Option<Value<N>>, ConvertError> {
        match self.property(name) {
            Some(value) => value.convert_to(target),
            None => Ok(None),
        }
    }

    pub fn property_as_string(&self, name: &str) -> Option<String> {
        self.property(name)?.as_string()
    }

    pub fn property_as_object_literal(&self, name: &str) -> Option<ObjectLiteral<N>> {
        self.property(name)?.as_object_literal()
    }

    pub fn property_as_class(&self, name: &str) -> Option<ClassRef> {
        self.property(name)?.as_class()
    }

    /// Navigate a nested structure with an RFC-6901 JSON pointer.
    ///
    /// Object steps use property lookup, array steps zero-based indexing.
    /// The empty pointer addresses this object. Any miss, including a
    /// malformed pointer, is `None`.
    pub fn find(&self, pointer: &str) -> Option<ConstantValue<N>> {
        let pointer = JsonPointer::parse(pointer).ok()?;
        let mut current = ConstantValue::of(self.node);
        for token in pointer.tokens() {
            current = step(current, token)?;
        }
        Some(current)
    }

    /// Every object literal nested below this one, depth-first in source
    /// order. This object itself is not included.
    pub fn child_object_literals(&self) -> Vec<ObjectLiteral<N>> {
        let mut found = Vec::new();
        let mut stack: Vec<ConstantValue<N>> =
            self.properties().values().rev().copied().collect();
        while let Some(value) = stack.pop() {
            match value.kind() {
                ConstantValueKind::ObjectLiteral => {
                    if let Some(object) = value.as_object_literal() {
                        stack.extend(object.properties().values().rev().copied());
                        found.push(object);
                    }
                }
                ConstantValueKind::Array => {
                    if let Some(elements) = value.node().and_then(|n| n.elements()) {
                        stack.extend(elements.into_iter().rev().map(ConstantValue::of));
                    }
                }
                _ => {}
            }
        }
        found
    }
}

fn step<N: ConstantNode>(value: ConstantValue<N>, token: &str) -> Option<ConstantValue<N>> {
    if let Some(object) = value.as_object_literal() {
        return object.property(token);
    }
    let node = value.node()?;
    if node.is_array_literal() {
        let index = parse_array_index(token)?;
        return node.elements()?.into_iter().nth(index).map(ConstantValue::of);
    }
    None
}

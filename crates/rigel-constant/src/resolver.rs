//! The constant-value façade: classification and conversion dispatch.

use crate::convert::{coerce_numeric, ConvertError, TargetType, Value};
use crate::node::{ClassRef, ConstantNode, ConstantValueKind, NumericValue, Scalar};
use crate::object::ObjectLiteral;

/// An immutable reference to one host syntax node, interpreted as a constant.
///
/// Built on demand from a borrowed node, never cached across host reparses.
/// An absent node is a valid constant of kind `Unknown`; every conversion on
/// it degrades to an empty result.
#[derive(Clone, Copy, Debug)]
pub struct ConstantValue<N: ConstantNode> {
    node: Option<N>,
}

impl<N: ConstantNode> ConstantValue<N> {
    pub fn of(node: N) -> Self {
        Self { node: Some(node) }
    }

    pub fn absent() -> Self {
        Self { node: None }
    }

    pub fn node(&self) -> Option<N> {
        self.node
    }

    /// Classify the underlying node. Recomputed on every call; shape checks
    /// run in fixed precedence: object literal, array, scalar literal,
    /// class reference, and anything else is `Unknown`.
    pub fn kind(&self) -> ConstantValueKind {
        let Some(node) = self.node else {
            return ConstantValueKind::Unknown;
        };
        if node.is_object_literal() {
            return ConstantValueKind::ObjectLiteral;
        }
        if node.is_array_literal() {
            return ConstantValueKind::Array;
        }
        match node.scalar() {
            Some(Scalar::String(_)) => ConstantValueKind::String,
            Some(Scalar::Bool(_)) => ConstantValueKind::Boolean,
            Some(Scalar::Number(_)) => ConstantValueKind::Numeric,
            None => {
                if node.class_ref().is_some() {
                    ConstantValueKind::ClassReference
                } else {
                    ConstantValueKind::Unknown
                }
            }
        }
    }

    /// Convert to the requested target.
    ///
    /// Shape mismatches and unrecognized targets yield `Ok(None)` so callers
    /// can chain speculative attempts; the only error is the exact-fit
    /// 32-bit overflow from an arbitrary-precision source.
    pub fn convert_to(&self, target: &TargetType) -> Result<Option<Value<N>>, ConvertError> {
        match target {
            TargetType::ArrayOf(element) => self.convert_array(element),
            TargetType::ObjectLiteral => Ok(self.as_object_literal().map(Value::Object)),
            TargetType::String => Ok(self.as_string().map(Value::String)),
            TargetType::Bool => Ok(self.as_bool().map(Value::Bool)),
            TargetType::ClassReference => Ok(self.as_class().map(Value::Class)),
            numeric if numeric.is_numeric() => match self.numeric_value() {
                Some(value) => coerce_numeric(&value, numeric),
                None => Ok(None),
            },
            // The generic escape hatch is only meaningful as an array
            // element target.
            _ => Ok(None),
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match self.node?.scalar()? {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.node?.scalar()? {
            Scalar::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn numeric_value(&self) -> Option<NumericValue> {
        match self.node?.scalar()? {
            Scalar::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_object_literal(&self) -> Option<ObjectLiteral<N>> {
        ObjectLiteral::of(self.node?)
    }

    pub fn as_class(&self) -> Option<ClassRef> {
        self.node?.class_ref()
    }

    /// Convert an array literal element-wise.
    ///
    /// The result always has one slot per source element, in order. An
    /// element that does not convert leaves its slot empty; it never aborts
    /// the other elements. An exact-fit overflow inside an element is a
    /// contract violation and propagates.
    fn convert_array(&self, element: &TargetType) -> Result<Option<Value<N>>, ConvertError> {
        let Some(node) = self.node else {
            return Ok(None);
        };
        let Some(elements) = node.elements() else {
            return Ok(None);
        };
        let mut slots = Vec::with_capacity(elements.len());
        for child in elements {
            let value = ConstantValue::of(child);
            if *element == TargetType::Value {
                slots.push(Some(Value::Constant(value)));
            } else {
                slots.push(value.convert_to(element)?);
            }
        }
        Ok(Some(Value::Array(slots)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryData;
    use pretty_assertions::assert_eq;

    #[test]
    fn classification_precedence() {
        let object = MemoryData::object([("a", MemoryData::int(1))]);
        let array = MemoryData::array([MemoryData::bool(true)]);
        let string = MemoryData::string("hi");
        let boolean = MemoryData::bool(false);
        let number = MemoryData::float(1.5);
        let class = MemoryData::class("Widget");
        let opaque = MemoryData::Opaque;

        assert_eq!(
            ConstantValue::of(&object).kind(),
            ConstantValueKind::ObjectLiteral
        );
        assert_eq!(ConstantValue::of(&array).kind(), ConstantValueKind::Array);
        assert_eq!(ConstantValue::of(&string).kind(), ConstantValueKind::String);
        assert_eq!(
            ConstantValue::of(&boolean).kind(),
            ConstantValueKind::Boolean
        );
        assert_eq!(ConstantValue::of(&number).kind(), ConstantValueKind::Numeric);
        assert_eq!(
            ConstantValue::of(&class).kind(),
            ConstantValueKind::ClassReference
        );
        assert_eq!(ConstantValue::of(&opaque).kind(), ConstantValueKind::Unknown);
        assert_eq!(
            ConstantValue::<&MemoryData>::absent().kind(),
            ConstantValueKind::Unknown
        );
    }

    #[test]
    fn scalar_conversions_check_the_literal_flag() {
        let string = MemoryData::string("answer");
        let value = ConstantValue::of(&string);
        assert_eq!(value.as_string().as_deref(), Some("answer"));
        assert_eq!(value.as_bool(), None);
        assert!(value.convert_to(&TargetType::Int32).unwrap().is_none());

        let number = MemoryData::int(7);
        let value = ConstantValue::of(&number);
        assert!(value.as_string().is_none());
        assert_eq!(
            value
                .convert_to(&TargetType::Int32)
                .unwrap()
                .and_then(|v| v.as_i32()),
            Some(7)
        );
    }

    #[test]
    fn array_of_generic_elements_preserves_length_and_order() {
        let array = MemoryData::array([
            MemoryData::int(1),
            MemoryData::string("two"),
            MemoryData::bool(true),
        ]);
        let value = ConstantValue::of(&array)
            .convert_to(&TargetType::array_of(TargetType::Value))
            .unwrap()
            .unwrap();
        let slots = value.as_array().unwrap();
        assert_eq!(slots.len(), 3);
        let kinds: Vec<_> = slots
            .iter()
            .map(|slot| slot.as_ref().unwrap().as_constant().unwrap().kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                ConstantValueKind::Numeric,
                ConstantValueKind::String,
                ConstantValueKind::Boolean,
            ]
        );
    }

    #[test]
    fn one_bad_element_does_not_abort_the_array() {
        let array = MemoryData::array([
            MemoryData::int(1),
            MemoryData::Opaque,
            MemoryData::int(3),
        ]);
        let value = ConstantValue::of(&array)
            .convert_to(&TargetType::array_of(TargetType::Int32))
            .unwrap()
            .unwrap();
        let slots = value.as_array().unwrap();
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].as_ref().and_then(|v| v.as_i32()), Some(1));
        assert!(slots[1].is_none());
        assert_eq!(slots[2].as_ref().and_then(|v| v.as_i32()), Some(3));
    }

    #[test]
    fn element_overflow_propagates_out_of_the_array() {
        let array = MemoryData::array([MemoryData::big("4294967296")]);
        let result =
            ConstantValue::of(&array).convert_to(&TargetType::array_of(TargetType::Int32));
        assert!(matches!(
            result,
            Err(ConvertError::Int32Overflow { .. })
        ));
    }

    #[test]
    fn non_array_nodes_are_not_applicable_for_arrays() {
        let number = MemoryData::int(5);
        let result = ConstantValue::of(&number)
            .convert_to(&TargetType::array_of(TargetType::Int32))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn generic_target_at_top_level_is_not_applicable() {
        let number = MemoryData::int(5);
        let result = ConstantValue::of(&number)
            .convert_to(&TargetType::Value)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn class_reference_conversion() {
        let class = MemoryData::class("Widget");
        let value = ConstantValue::of(&class)
            .convert_to(&TargetType::ClassReference)
            .unwrap()
            .unwrap();
        assert_eq!(value.as_class().map(|c| c.name.as_str()), Some("Widget"));
    }
}

//! Conversion of IR constants into tagged literal pairs.
//!
//! Pure and stateless; safe to call from any worker.

use pando_program::{Literal, LiteralArray, LiteralTag, LiteralValue};

use crate::ir::{BuiltinTypeIndex, IrLiteral};

/// Wire tag and value of one constant.
pub fn encode(literal: &IrLiteral) -> (LiteralTag, Literal) {
    let (tag, value) = match literal {
        IrLiteral::Boolean(b) => (LiteralTag::Bool, LiteralValue::Bool(*b)),
        IrLiteral::Integer(v) => (LiteralTag::Integer, LiteralValue::U32(*v)),
        IrLiteral::Double(v) => (LiteralTag::Double, LiteralValue::F64(*v)),
        IrLiteral::String(s) => (LiteralTag::String, LiteralValue::String(s.clone())),
        IrLiteral::Method(name) => (LiteralTag::Method, LiteralValue::String(name.clone())),
        IrLiteral::GeneratorMethod(name) => {
            (LiteralTag::GeneratorMethod, LiteralValue::String(name.clone()))
        }
        IrLiteral::AsyncGeneratorMethod(name) => (
            LiteralTag::AsyncGeneratorMethod,
            LiteralValue::String(name.clone()),
        ),
        IrLiteral::Accessor => (LiteralTag::Accessor, LiteralValue::U8(0)),
        IrLiteral::MethodAffiliate(count) => {
            (LiteralTag::MethodAffiliate, LiteralValue::U16(*count))
        }
        IrLiteral::Getter(name) => (LiteralTag::Getter, LiteralValue::String(name.clone())),
        IrLiteral::Setter(name) => (LiteralTag::Setter, LiteralValue::String(name.clone())),
        IrLiteral::LiteralBufferIndex(index) => {
            (LiteralTag::LiteralBufferIndex, LiteralValue::U32(*index))
        }
        IrLiteral::LiteralArray(name) => {
            (LiteralTag::LiteralArray, LiteralValue::String(name.clone()))
        }
        IrLiteral::BuiltinTypeIndex(kind) => {
            (LiteralTag::BuiltinTypeIndex, LiteralValue::U8(*kind as u8))
        }
        IrLiteral::Null => (LiteralTag::NullValue, LiteralValue::U8(0)),
    };
    (tag, Literal::new(tag, value))
}

/// Encode a whole buffer: a `TAGVALUE` entry before every value.
pub fn encode_buffer(literals: &[IrLiteral]) -> LiteralArray {
    let mut array = LiteralArray::with_capacity(literals.len());
    for literal in literals {
        let (_, encoded) = encode(literal);
        array.push(encoded);
    }
    array
}

/// Inverse of [`encode`] for a single value entry.
///
/// Returns `None` for tags the encoder never produces.
pub fn decode(literal: &Literal) -> Option<IrLiteral> {
    let decoded = match (literal.tag, &literal.value) {
        (LiteralTag::Bool, LiteralValue::Bool(b)) => IrLiteral::Boolean(*b),
        (LiteralTag::Integer, LiteralValue::U32(v)) => IrLiteral::Integer(*v),
        (LiteralTag::Double, LiteralValue::F64(v)) => IrLiteral::Double(*v),
        (LiteralTag::String, LiteralValue::String(s)) => IrLiteral::String(s.clone()),
        (LiteralTag::Method, LiteralValue::String(s)) => IrLiteral::Method(s.clone()),
        (LiteralTag::GeneratorMethod, LiteralValue::String(s)) => {
            IrLiteral::GeneratorMethod(s.clone())
        }
        (LiteralTag::AsyncGeneratorMethod, LiteralValue::String(s)) => {
            IrLiteral::AsyncGeneratorMethod(s.clone())
        }
        (LiteralTag::Accessor, _) => IrLiteral::Accessor,
        (LiteralTag::MethodAffiliate, LiteralValue::U16(v)) => IrLiteral::MethodAffiliate(*v),
        (LiteralTag::Getter, LiteralValue::String(s)) => IrLiteral::Getter(s.clone()),
        (LiteralTag::Setter, LiteralValue::String(s)) => IrLiteral::Setter(s.clone()),
        (LiteralTag::LiteralBufferIndex, LiteralValue::U32(v)) => {
            IrLiteral::LiteralBufferIndex(*v)
        }
        (LiteralTag::LiteralArray, LiteralValue::String(s)) => IrLiteral::LiteralArray(s.clone()),
        (LiteralTag::BuiltinTypeIndex, LiteralValue::U8(0)) => {
            IrLiteral::BuiltinTypeIndex(BuiltinTypeIndex::NumberArray)
        }
        (LiteralTag::BuiltinTypeIndex, LiteralValue::U8(1)) => {
            IrLiteral::BuiltinTypeIndex(BuiltinTypeIndex::StringArray)
        }
        (LiteralTag::NullValue, _) => IrLiteral::Null,
        _ => return None,
    };
    Some(decoded)
}

/// Decode every value of a well-formed array.
pub fn decode_array(array: &LiteralArray) -> Option<Vec<IrLiteral>> {
    if !array.is_well_formed() {
        return None;
    }
    array.values().map(decode).collect()
}

#[cfg(test)]
mod tests;

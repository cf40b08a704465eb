use super::*;
use pretty_assertions::assert_eq;

#[test]
fn every_value_is_preceded_by_its_tag() {
    let array = encode_buffer(&[
        IrLiteral::Boolean(true),
        IrLiteral::String("x".into()),
        IrLiteral::Null,
    ]);

    assert_eq!(array.len(), 6);
    assert_eq!(
        array.literals[0],
        Literal::new(LiteralTag::TagValue, LiteralValue::U8(0x01))
    );
    assert_eq!(
        array.literals[2],
        Literal::new(LiteralTag::TagValue, LiteralValue::U8(0x05))
    );
    assert_eq!(
        array.literals[4],
        Literal::new(LiteralTag::TagValue, LiteralValue::U8(0xff))
    );
    assert!(array.is_well_formed());
}

#[test]
fn payload_widths_follow_the_tag() {
    assert_eq!(
        encode(&IrLiteral::Accessor),
        (
            LiteralTag::Accessor,
            Literal::new(LiteralTag::Accessor, LiteralValue::U8(0))
        )
    );
    assert_eq!(
        encode(&IrLiteral::MethodAffiliate(3)).1.value,
        LiteralValue::U16(3)
    );
    assert_eq!(
        encode(&IrLiteral::BuiltinTypeIndex(BuiltinTypeIndex::StringArray))
            .1
            .value,
        LiteralValue::U8(1)
    );
    assert_eq!(
        encode(&IrLiteral::LiteralBufferIndex(42)).0,
        LiteralTag::LiteralBufferIndex
    );
    assert_eq!(encode(&IrLiteral::Setter("s".into())).0.byte(), 0x1b);
}

#[test]
fn empty_buffer_encodes_to_empty_array() {
    let array = encode_buffer(&[]);
    assert!(array.is_empty());
    assert_eq!(decode_array(&array), Some(Vec::new()));
}

#[test]
fn decode_rejects_misaligned_arrays() {
    let mut array = encode_buffer(&[IrLiteral::Integer(1)]);
    array.literals.pop();
    assert_eq!(decode_array(&array), None);
}

// === Property tests ===

mod proptest_encoding {
    use super::super::{decode_array, encode_buffer};
    use crate::ir::{BuiltinTypeIndex, IrLiteral};
    use proptest::prelude::*;

    fn ir_literal() -> impl Strategy<Value = IrLiteral> {
        prop_oneof![
            any::<bool>().prop_map(IrLiteral::Boolean),
            any::<u32>().prop_map(IrLiteral::Integer),
            (-1.0e12f64..1.0e12).prop_map(IrLiteral::Double),
            "[a-z]{0,8}".prop_map(IrLiteral::String),
            "[a-z]{1,8}".prop_map(IrLiteral::Method),
            "[a-z]{1,8}".prop_map(IrLiteral::GeneratorMethod),
            "[a-z]{1,8}".prop_map(IrLiteral::AsyncGeneratorMethod),
            Just(IrLiteral::Accessor),
            any::<u16>().prop_map(IrLiteral::MethodAffiliate),
            "[a-z]{1,8}".prop_map(IrLiteral::Getter),
            "[a-z]{1,8}".prop_map(IrLiteral::Setter),
            any::<u32>().prop_map(IrLiteral::LiteralBufferIndex),
            "[a-z]{1,8}_[0-9]{1,3}".prop_map(IrLiteral::LiteralArray),
            Just(IrLiteral::BuiltinTypeIndex(BuiltinTypeIndex::NumberArray)),
            Just(IrLiteral::BuiltinTypeIndex(BuiltinTypeIndex::StringArray)),
            Just(IrLiteral::Null),
        ]
    }

    proptest! {
        #[test]
        fn buffers_are_well_formed(literals in proptest::collection::vec(ir_literal(), 0..32)) {
            let array = encode_buffer(&literals);
            prop_assert_eq!(array.len(), literals.len() * 2);
            prop_assert!(array.is_well_formed());
        }

        #[test]
        fn buffers_decode_to_source(literals in proptest::collection::vec(ir_literal(), 0..32)) {
            let array = encode_buffer(&literals);
            prop_assert_eq!(decode_array(&array), Some(literals));
        }
    }
}

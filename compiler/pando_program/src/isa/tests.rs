use super::*;

#[test]
fn mov_formats_are_ordered_narrowest_first() {
    let capacities: Vec<u64> = Opcode::Mov
        .formats()
        .iter()
        .map(Format::register_capacity)
        .collect();
    assert_eq!(capacities, vec![16, 256, 65536]);
}

#[test]
fn encoded_len_counts_opcode_and_operand_bytes() {
    let formats = Opcode::Mov.formats();
    assert_eq!(formats[0].encoded_len(), 2);
    assert_eq!(formats[1].encoded_len(), 3);
    assert_eq!(formats[2].encoded_len(), 5);

    assert_eq!(Opcode::ReturnUndefined.formats()[0].encoded_len(), 1);
    assert_eq!(Opcode::Fldai.formats()[0].encoded_len(), 9);
    assert_eq!(Opcode::DefineFunc.formats()[0].encoded_len(), 5);
}

#[test]
fn formats_without_registers_have_zero_capacity() {
    assert_eq!(Opcode::Ldai.formats()[0].register_capacity(), 0);
    assert_eq!(Opcode::Sta.formats()[0].register_capacity(), 256);
}

#[test]
fn labels_have_no_encoding() {
    assert!(Opcode::Invalid.formats().is_empty());
}

#[test]
fn return_family() {
    assert!(Opcode::Return.is_return());
    assert!(Opcode::ReturnUndefined.is_return());
    assert!(!Opcode::Throw.is_return());
    assert_eq!(Opcode::ReturnUndefined.mnemonic(), "returnundefined");
}

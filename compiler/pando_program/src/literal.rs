//! Literal arrays: constant buffers encoded as tag/value pairs.
//!
//! Every value in a literal array is preceded by a [`LiteralTag::TagValue`]
//! entry whose byte names the wire tag of the value that follows. The VM
//! loader walks arrays two entries at a time, so the pairing is part of the
//! wire format rather than a convenience of this crate.

use std::fmt;

/// Wire tag of a literal entry.
///
/// The discriminants are the bytes the loader matches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum LiteralTag {
    TagValue = 0x00,
    Bool = 0x01,
    Integer = 0x02,
    Float = 0x03,
    Double = 0x04,
    String = 0x05,
    Method = 0x06,
    GeneratorMethod = 0x07,
    Accessor = 0x08,
    MethodAffiliate = 0x09,
    AsyncGeneratorMethod = 0x16,
    LiteralBufferIndex = 0x17,
    LiteralArray = 0x18,
    BuiltinTypeIndex = 0x19,
    Getter = 0x1a,
    Setter = 0x1b,
    NullValue = 0xff,
}

impl LiteralTag {
    /// The wire byte for this tag.
    #[inline]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Decode a wire byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        let tag = match byte {
            0x00 => LiteralTag::TagValue,
            0x01 => LiteralTag::Bool,
            0x02 => LiteralTag::Integer,
            0x03 => LiteralTag::Float,
            0x04 => LiteralTag::Double,
            0x05 => LiteralTag::String,
            0x06 => LiteralTag::Method,
            0x07 => LiteralTag::GeneratorMethod,
            0x08 => LiteralTag::Accessor,
            0x09 => LiteralTag::MethodAffiliate,
            0x16 => LiteralTag::AsyncGeneratorMethod,
            0x17 => LiteralTag::LiteralBufferIndex,
            0x18 => LiteralTag::LiteralArray,
            0x19 => LiteralTag::BuiltinTypeIndex,
            0x1a => LiteralTag::Getter,
            0x1b => LiteralTag::Setter,
            0xff => LiteralTag::NullValue,
            _ => return None,
        };
        Some(tag)
    }
}

/// Payload of a literal entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum LiteralValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    F64(f64),
    /// Strings, method names and literal-array names.
    String(String),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Bool(b) => write!(f, "{b}"),
            LiteralValue::U8(v) => write!(f, "{v}"),
            LiteralValue::U16(v) => write!(f, "{v}"),
            LiteralValue::U32(v) => write!(f, "{v}"),
            LiteralValue::F64(v) => write!(f, "{v}"),
            LiteralValue::String(s) => write!(f, "\"{s}\""),
        }
    }
}

/// One entry of a [`LiteralArray`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Literal {
    pub tag: LiteralTag,
    pub value: LiteralValue,
}

impl Literal {
    #[inline]
    pub fn new(tag: LiteralTag, value: LiteralValue) -> Self {
        Literal { tag, value }
    }

    /// The `TAGVALUE` entry announcing a literal tagged `tag`.
    #[inline]
    pub fn tag_value(tag: LiteralTag) -> Self {
        Literal {
            tag: LiteralTag::TagValue,
            value: LiteralValue::U8(tag.byte()),
        }
    }

    /// True if this is a `TAGVALUE` entry announcing `next`.
    #[inline]
    pub fn announces(&self, next: &Literal) -> bool {
        self.tag == LiteralTag::TagValue && self.value == LiteralValue::U8(next.tag.byte())
    }
}

/// An ordered constant buffer referenced by name from instructions and
/// record fields.
///
/// # Invariant
/// `literals.len()` is even and entry `2k` announces the tag of entry `2k + 1`.
/// [`LiteralArray::push`] maintains this; [`LiteralArray::is_well_formed`]
/// checks arrays assembled by hand.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct LiteralArray {
    pub literals: Vec<Literal>,
}

impl LiteralArray {
    /// Wrap an already encoded entry list.
    pub fn new(literals: Vec<Literal>) -> Self {
        LiteralArray { literals }
    }

    /// Reserve room for `values` tag/value pairs.
    pub fn with_capacity(values: usize) -> Self {
        LiteralArray {
            literals: Vec::with_capacity(values * 2),
        }
    }

    /// Append `literal` preceded by its `TAGVALUE` entry.
    pub fn push(&mut self, literal: Literal) {
        self.literals.push(Literal::tag_value(literal.tag));
        self.literals.push(literal);
    }

    /// Number of raw entries (twice the number of values).
    #[inline]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// The value entries, skipping every `TAGVALUE`.
    pub fn values(&self) -> impl Iterator<Item = &Literal> {
        self.literals.chunks_exact(2).map(|pair| &pair[1])
    }

    /// Check the tag/value pairing invariant.
    pub fn is_well_formed(&self) -> bool {
        self.literals.len() % 2 == 0
            && self
                .literals
                .chunks_exact(2)
                .all(|pair| pair[0].announces(&pair[1]))
    }
}

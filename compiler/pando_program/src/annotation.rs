//! Annotation metadata attached to functions.

use std::fmt;

use crate::TypeDescriptor;

/// A constant value stored in a record field or annotation element.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalarValue {
    U1(bool),
    U8(u8),
    U32(u32),
    F64(f64),
    String(String),
    /// Reference to a literal array by name.
    LiteralArray(String),
    /// Reference to a type.
    Type(TypeDescriptor),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::U1(v) => write!(f, "u1:{}", u8::from(*v)),
            ScalarValue::U8(v) => write!(f, "u8:{v}"),
            ScalarValue::U32(v) => write!(f, "u32:{v}"),
            ScalarValue::F64(v) => write!(f, "f64:{v:?}"),
            ScalarValue::String(s) => write!(f, "string:\"{s}\""),
            ScalarValue::LiteralArray(name) => write!(f, "literalarray:{name}"),
            ScalarValue::Type(ty) => write!(f, "type:{ty}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotationElement {
    pub name: String,
    pub value: ScalarValue,
}

/// A named annotation with ordered elements.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotationData {
    pub name: String,
    pub elements: Vec<AnnotationElement>,
}

impl AnnotationData {
    pub fn new(name: impl Into<String>) -> Self {
        AnnotationData {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: ScalarValue) {
        self.elements.push(AnnotationElement {
            name: name.into(),
            value,
        });
    }

    #[must_use]
    pub fn with_element(mut self, name: impl Into<String>, value: ScalarValue) -> Self {
        self.push(name, value);
        self
    }

    /// First element called `name`.
    pub fn element(&self, name: &str) -> Option<&ScalarValue> {
        self.elements
            .iter()
            .find(|element| element.name == name)
            .map(|element| &element.value)
    }
}

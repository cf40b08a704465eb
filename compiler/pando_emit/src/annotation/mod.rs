//! User-written annotations.
//!
//! Two directions meet here: annotation *usages* on method definitions
//! become [`AnnotationData`](pando_program::AnnotationData) on the emitted
//! function ([`usage`]), and annotation *declarations* become annotation
//! records describing their properties ([`interface`]). Both share the
//! array materializer below.

pub mod interface;
pub(crate) mod usage;

use pando_program::{LiteralArray, ScalarValue};

use crate::ir::IrLiteral;
use crate::literal_encoder::encode_buffer;
use crate::naming::next_literal_array_name;

/// An annotation applied to a method, as written in source.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationUsage {
    pub name: String,
    /// Declared in another module.
    pub imported: bool,
    /// `None` for a bare `@Name`, `Some` for the call form `@Name({...})`.
    pub arguments: Option<Vec<AnnotationProperty>>,
}

impl AnnotationUsage {
    pub fn bare(name: impl Into<String>) -> Self {
        AnnotationUsage {
            name: name.into(),
            imported: false,
            arguments: None,
        }
    }

    pub fn call(name: impl Into<String>, arguments: Vec<AnnotationProperty>) -> Self {
        AnnotationUsage {
            name: name.into(),
            imported: false,
            arguments: Some(arguments),
        }
    }

    #[must_use]
    pub fn imported(mut self) -> Self {
        self.imported = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationProperty {
    pub name: String,
    pub value: AnnotationExpr,
}

impl AnnotationProperty {
    pub fn new(name: impl Into<String>, value: AnnotationExpr) -> Self {
        AnnotationProperty {
            name: name.into(),
            value,
        }
    }
}

/// Constant expressions allowed in annotation arguments and initializers.
#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationExpr {
    Number(f64),
    Boolean(bool),
    String(String),
    /// Unary minus applied to a number literal; holds the magnitude.
    NegativeNumber(f64),
    Array(Vec<AnnotationExpr>),
    EmptyArray,
}

impl AnnotationExpr {
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, AnnotationExpr::Array(_) | AnnotationExpr::EmptyArray)
    }
}

/// Store `expr` as an element or field value.
///
/// Arrays are materialized into `arrays` (inner arrays first) and referenced
/// by the name of the outermost one.
pub(crate) fn scalar_value(
    expr: &AnnotationExpr,
    owner: &str,
    arrays: &mut Vec<(String, LiteralArray)>,
) -> ScalarValue {
    match expr {
        AnnotationExpr::Number(v) => ScalarValue::F64(*v),
        AnnotationExpr::NegativeNumber(v) => ScalarValue::F64(-*v),
        AnnotationExpr::Boolean(b) => ScalarValue::U1(*b),
        AnnotationExpr::String(s) => ScalarValue::String(s.clone()),
        AnnotationExpr::Array(items) => {
            ScalarValue::LiteralArray(materialize_array(items, owner, arrays))
        }
        AnnotationExpr::EmptyArray => {
            ScalarValue::LiteralArray(materialize_array(&[], owner, arrays))
        }
    }
}

/// Encode `items` into a fresh literal array named under `owner`.
///
/// Nested arrays get their own (earlier) names and are referenced by
/// `LITERALARRAY` entries. Returns the name of the array for `items`.
pub(crate) fn materialize_array(
    items: &[AnnotationExpr],
    owner: &str,
    arrays: &mut Vec<(String, LiteralArray)>,
) -> String {
    let literals: Vec<IrLiteral> = items
        .iter()
        .map(|item| match item {
            AnnotationExpr::Number(v) => IrLiteral::Double(*v),
            AnnotationExpr::NegativeNumber(v) => IrLiteral::Double(-*v),
            AnnotationExpr::Boolean(b) => IrLiteral::Boolean(*b),
            AnnotationExpr::String(s) => IrLiteral::String(s.clone()),
            AnnotationExpr::Array(inner) => {
                IrLiteral::LiteralArray(materialize_array(inner, owner, arrays))
            }
            AnnotationExpr::EmptyArray => {
                IrLiteral::LiteralArray(materialize_array(&[], owner, arrays))
            }
        })
        .collect();

    let name = next_literal_array_name(owner);
    tracing::trace!(%name, values = literals.len(), "materialized annotation array");
    arrays.push((name.clone(), encode_buffer(&literals)));
    name
}

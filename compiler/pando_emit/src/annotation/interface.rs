//! Annotation declarations.
//!
//! `@interface Anno { a: number = 1; b: string[] = [] }` becomes a record
//! flagged `ANNOTATION` with one field per property. Field types follow the
//! wire coercions below; initializers become constant field values.

use pando_program::{
    AccessFlags, Field, LiteralArray, Program, Record, ScalarValue, TypeDescriptor,
};

use super::{materialize_array, AnnotationExpr};
use crate::context::EmitContext;
use crate::error::internal_error;
use crate::names::STRING_CLASS_RECORD;

/// A declared annotation type.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationInterface {
    pub name: String,
    pub properties: Vec<AnnotationPropertyDecl>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationPropertyDecl {
    pub name: String,
    pub ty: DeclaredType,
    pub init: Option<PropertyInit>,
}

impl AnnotationPropertyDecl {
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        AnnotationPropertyDecl {
            name: name.into(),
            ty,
            init: None,
        }
    }

    #[must_use]
    pub fn with_init(mut self, init: PropertyInit) -> Self {
        self.init = Some(init);
        self
    }
}

/// Whether an enum's members are numbers or strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnumKind {
    Numeric,
    String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub kind: EnumKind,
}

/// Property type as written in the declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum DeclaredType {
    Number,
    Boolean,
    String,
    Enum(EnumType),
    /// `element` with `rank` pairs of brackets.
    Array {
        element: Box<DeclaredType>,
        rank: usize,
    },
    /// Anything else the front end let through, by source spelling.
    Unsupported(String),
}

impl DeclaredType {
    pub fn array(element: DeclaredType, rank: usize) -> Self {
        DeclaredType::Array {
            element: Box::new(element),
            rank,
        }
    }
}

/// How an enum-array property was initialized.
#[derive(Clone, Debug, PartialEq)]
pub enum EnumArrayInit {
    /// No initializer.
    Absent,
    /// `= []`.
    Empty,
    /// Declared but left for the user to supply.
    Uninitialized,
    Initialized(Vec<AnnotationExpr>),
}

/// Property initializer.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyInit {
    Expr(AnnotationExpr),
    /// `<member> as number`; carries the member's constant text.
    AsNumber(String),
    EnumArray(EnumArrayInit),
}

/// Build the record for `iface`.
///
/// Literal arrays for array initializers and the string class stub go
/// straight into `program`; the record itself is returned to the caller.
pub(crate) fn build_interface_record(
    iface: &AnnotationInterface,
    ctx: &EmitContext,
    program: &mut Program,
) -> Record {
    let mut builder = InterfaceBuilder {
        ctx,
        program,
        arrays: Vec::new(),
    };
    let mut record =
        Record::new(ctx.qualify(&iface.name), ctx.lang).with_flags(AccessFlags::ANNOTATION);
    for property in &iface.properties {
        record.push_field(builder.field(&iface.name, property));
    }

    for (name, array) in builder.arrays {
        builder.program.insert_literal_array(name, array);
    }
    tracing::debug!(record = %record.name, fields = record.fields.len(), "annotation interface");
    record
}

struct InterfaceBuilder<'a> {
    ctx: &'a EmitContext,
    program: &'a mut Program,
    arrays: Vec<(String, LiteralArray)>,
}

impl InterfaceBuilder<'_> {
    fn field(&mut self, iface: &str, property: &AnnotationPropertyDecl) -> Field {
        match &property.ty {
            DeclaredType::Array { element, rank } => {
                self.array_field(iface, property, element, *rank)
            }
            scalar => {
                let (ty, value) = self.scalar_field(iface, property, scalar);
                let field = Field::new(property.name.clone(), ty);
                match value {
                    Some(value) => field.with_value(value),
                    None => field,
                }
            }
        }
    }

    fn scalar_field(
        &mut self,
        iface: &str,
        property: &AnnotationPropertyDecl,
        ty: &DeclaredType,
    ) -> (TypeDescriptor, Option<ScalarValue>) {
        let init = property.init.as_ref();
        match ty {
            DeclaredType::Number => {
                let value = init.map(|init| match init {
                    PropertyInit::Expr(AnnotationExpr::Number(v)) => ScalarValue::F64(*v),
                    PropertyInit::Expr(AnnotationExpr::NegativeNumber(v)) => ScalarValue::F64(-*v),
                    other => mismatched(iface, property, other),
                });
                (TypeDescriptor::new(TypeDescriptor::F64), value)
            }
            DeclaredType::Boolean => {
                let value = init.map(|init| match init {
                    PropertyInit::Expr(AnnotationExpr::Boolean(b)) => ScalarValue::U1(*b),
                    other => mismatched(iface, property, other),
                });
                (TypeDescriptor::new(TypeDescriptor::U1), value)
            }
            DeclaredType::String => {
                let value = init.map(|init| match init {
                    PropertyInit::Expr(AnnotationExpr::String(s)) => ScalarValue::String(s.clone()),
                    other => mismatched(iface, property, other),
                });
                (self.string_type(), value)
            }
            DeclaredType::Enum(enum_ty) => match init {
                Some(PropertyInit::Expr(AnnotationExpr::Number(v))) => (
                    TypeDescriptor::new(TypeDescriptor::F64),
                    Some(ScalarValue::F64(*v)),
                ),
                Some(PropertyInit::Expr(AnnotationExpr::NegativeNumber(v))) => (
                    TypeDescriptor::new(TypeDescriptor::F64),
                    Some(ScalarValue::F64(-*v)),
                ),
                Some(PropertyInit::Expr(AnnotationExpr::String(s)) | PropertyInit::AsNumber(s)) => {
                    (self.string_type(), Some(ScalarValue::String(s.clone())))
                }
                None => (self.enum_element_type(enum_ty), None),
                Some(other) => mismatched(iface, property, other),
            },
            DeclaredType::Array { .. } | DeclaredType::Unsupported(_) => {
                unsupported(iface, property)
            }
        }
    }

    fn array_field(
        &mut self,
        iface: &str,
        property: &AnnotationPropertyDecl,
        element: &DeclaredType,
        rank: usize,
    ) -> Field {
        let component = match element {
            DeclaredType::Number => TypeDescriptor::new(TypeDescriptor::F64),
            DeclaredType::Boolean => TypeDescriptor::new(TypeDescriptor::U1),
            DeclaredType::String => self.string_type(),
            DeclaredType::Enum(enum_ty) => self.enum_element_type(enum_ty),
            DeclaredType::Array { .. } | DeclaredType::Unsupported(_) => {
                unsupported(iface, property)
            }
        };
        let field = Field::new(
            property.name.clone(),
            TypeDescriptor::array(component.component, rank),
        );

        let ctx = self.ctx;
        let owner = ctx.record_name.as_str();
        let value = match (element, property.init.as_ref()) {
            (_, None) => None,
            (DeclaredType::Enum(enum_ty), Some(PropertyInit::EnumArray(init))) => match init {
                EnumArrayInit::Absent => None,
                EnumArrayInit::Empty => Some(ScalarValue::LiteralArray(materialize_array(
                    &[],
                    owner,
                    &mut self.arrays,
                ))),
                EnumArrayInit::Uninitialized => {
                    Some(ScalarValue::Type(TypeDescriptor::new(enum_ty.name.clone())))
                }
                EnumArrayInit::Initialized(values) => Some(ScalarValue::LiteralArray(
                    materialize_array(values, owner, &mut self.arrays),
                )),
            },
            (_, Some(PropertyInit::Expr(AnnotationExpr::Array(items)))) => Some(
                ScalarValue::LiteralArray(materialize_array(items, owner, &mut self.arrays)),
            ),
            (_, Some(PropertyInit::Expr(AnnotationExpr::EmptyArray))) => Some(
                ScalarValue::LiteralArray(materialize_array(&[], owner, &mut self.arrays)),
            ),
            (_, Some(other)) => mismatched(iface, property, other),
        };

        match value {
            Some(value) => field.with_value(value),
            None => field,
        }
    }

    fn enum_element_type(&mut self, enum_ty: &EnumType) -> TypeDescriptor {
        match enum_ty.kind {
            EnumKind::Numeric => TypeDescriptor::new(TypeDescriptor::F64),
            EnumKind::String => self.string_type(),
        }
    }

    /// The string class type, registering its external stub on first use.
    fn string_type(&mut self) -> TypeDescriptor {
        if !self.program.has_record(STRING_CLASS_RECORD) {
            self.program.insert_record(
                Record::new(STRING_CLASS_RECORD, self.ctx.lang)
                    .with_flags(AccessFlags::PUBLIC | AccessFlags::EXTERNAL),
            );
        }
        TypeDescriptor::new(STRING_CLASS_RECORD)
    }
}

fn unsupported(iface: &str, property: &AnnotationPropertyDecl) -> ! {
    internal_error(format_args!(
        "unsupported type {:?} for annotation property {iface}.{}",
        property.ty, property.name
    ))
}

fn mismatched(iface: &str, property: &AnnotationPropertyDecl, init: &PropertyInit) -> ! {
    internal_error(format_args!(
        "initializer {init:?} does not match type {:?} of annotation property {iface}.{}",
        property.ty, property.name
    ))
}

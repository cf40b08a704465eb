//! Records: declared types and synthetic marker containers.

use std::fmt;

use bitflags::bitflags;

use crate::{ScalarValue, TypeDescriptor};

/// Source language a record or function belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceLang {
    #[default]
    EcmaScript,
    /// Shared by every language in one artifact.
    Neutral,
}

impl fmt::Display for SourceLang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLang::EcmaScript => f.write_str("ECMAScript"),
            SourceLang::Neutral => f.write_str("PandoAssembly"),
        }
    }
}

bitflags! {
    /// Record access flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
    pub struct AccessFlags: u32 {
        const PUBLIC = 0x0001;
        const ANNOTATION = 0x2000;
        /// Declared in another compilation unit; carries no definition.
        const EXTERNAL = 0x0001_0000;
    }
}

/// One record field.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    pub name: String,
    pub ty: TypeDescriptor,
    pub value: Option<ScalarValue>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Field {
            name: name.into(),
            ty,
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: ScalarValue) -> Self {
        self.value = Some(value);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    pub name: String,
    pub lang: SourceLang,
    pub flags: AccessFlags,
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(name: impl Into<String>, lang: SourceLang) -> Self {
        Record {
            name: name.into(),
            lang,
            flags: AccessFlags::empty(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: AccessFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn push_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.flags.contains(AccessFlags::EXTERNAL)
    }
}

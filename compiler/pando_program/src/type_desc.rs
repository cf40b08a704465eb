//! Wire type descriptors.

use std::fmt;

/// A type as written into the artifact: a component name plus array rank.
///
/// `f64` with rank 2 is `f64[][]`. Dynamic values use the placeholder `any`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDescriptor {
    pub component: String,
    pub rank: usize,
}

impl TypeDescriptor {
    pub const ANY: &'static str = "any";
    pub const U1: &'static str = "u1";
    pub const U8: &'static str = "u8";
    pub const U32: &'static str = "u32";
    pub const F64: &'static str = "f64";

    pub fn new(component: impl Into<String>) -> Self {
        TypeDescriptor {
            component: component.into(),
            rank: 0,
        }
    }

    pub fn array(component: impl Into<String>, rank: usize) -> Self {
        TypeDescriptor {
            component: component.into(),
            rank,
        }
    }

    /// The dynamic placeholder type.
    pub fn any() -> Self {
        Self::new(Self::ANY)
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        self.rank > 0
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.component)?;
        for _ in 0..self.rank {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

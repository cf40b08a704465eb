//! Emitted functions.

use rustc_hash::FxHashSet;

use crate::{AnnotationData, Instruction, SourceLang, TypeDescriptor};

/// Function kind as understood by the VM loader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum FunctionKind {
    #[default]
    None = 0,
    Function = 1,
    /// Arrow functions and methods: cannot be called with `new`.
    NonConstructor = 2,
    Generator = 3,
    Async = 4,
    AsyncGenerator = 5,
    AsyncNonConstructor = 6,
    /// May be dispatched to a separate worker context.
    Concurrent = 7,
}

/// One exception-handling region, by label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct CatchBlock {
    /// Exception record caught; empty for a catch-all.
    pub exception_record: String,
    pub try_begin_label: String,
    pub try_end_label: String,
    pub catch_begin_label: String,
    pub catch_end_label: String,
}

/// Debug record for one local variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalVariable {
    pub name: String,
    pub signature: String,
    pub signature_type: String,
    pub reg: i32,
    /// Index of the first instruction where the variable is live.
    pub start: u32,
    /// Number of instructions the variable is live for.
    pub length: u32,
}

/// A function as stored in the program's function table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub name: String,
    pub lang: SourceLang,
    pub params: Vec<TypeDescriptor>,
    pub return_type: TypeDescriptor,
    pub regs_num: u32,
    pub kind: FunctionKind,
    /// Inline-cache slots to reserve.
    pub slots_num: u32,
    pub ins: Vec<Instruction>,
    pub catch_blocks: Vec<CatchBlock>,
    pub local_variables: Vec<LocalVariable>,
    pub source_file: String,
    pub source_code: Option<String>,
    /// Module indices referenced by a [`FunctionKind::Concurrent`] function.
    pub concurrent_module_requests: Vec<u32>,
    pub expected_property_count: u32,
    annotations: Vec<AnnotationData>,
    /// Names in `annotations`, for O(1) re-entrancy checks.
    attached: FxHashSet<String>,
}

impl Function {
    /// A function with `param_count` dynamic parameters and nothing else.
    pub fn new(name: impl Into<String>, lang: SourceLang, param_count: usize) -> Self {
        Function {
            name: name.into(),
            lang,
            params: vec![TypeDescriptor::any(); param_count],
            return_type: TypeDescriptor::any(),
            regs_num: 0,
            kind: FunctionKind::None,
            slots_num: 0,
            ins: Vec::new(),
            catch_blocks: Vec::new(),
            local_variables: Vec::new(),
            source_file: String::new(),
            source_code: None,
            concurrent_module_requests: Vec::new(),
            expected_property_count: 0,
            annotations: Vec::new(),
            attached: FxHashSet::default(),
        }
    }

    /// Attach an annotation unconditionally.
    pub fn add_annotation(&mut self, annotation: AnnotationData) {
        self.attached.insert(annotation.name.clone());
        self.annotations.push(annotation);
    }

    /// Attach an annotation unless one with the same name is already present.
    ///
    /// Returns `true` if it was attached.
    pub fn attach_once(&mut self, annotation: AnnotationData) -> bool {
        if self.attached.contains(&annotation.name) {
            return false;
        }
        self.add_annotation(annotation);
        true
    }

    /// Attached annotations in attach order.
    #[inline]
    pub fn annotations(&self) -> &[AnnotationData] {
        &self.annotations
    }

    #[inline]
    pub fn has_annotation(&self, name: &str) -> bool {
        self.attached.contains(name)
    }

    pub fn annotation(&self, name: &str) -> Option<&AnnotationData> {
        self.annotations.iter().find(|anno| anno.name == name)
    }

    #[inline]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}

//! Emission configuration shared by every function of one source file.

use std::fmt;
use std::sync::Arc;

use pando_program::SourceLang;

use crate::patch::PatchHook;

/// How the output of one source file is packaged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmitMode {
    /// JSON asset: the file content is stored verbatim, no code is emitted.
    Passthrough { content: String },
    /// Merged compilation: everything belongs to one per-file record and
    /// generated names are qualified with the record name.
    Merged,
    /// One program per file with free-standing marker records.
    Standalone,
}

impl EmitMode {
    #[inline]
    pub fn is_merged(&self) -> bool {
        matches!(self, EmitMode::Merged)
    }

    #[inline]
    pub fn is_passthrough(&self) -> bool {
        matches!(self, EmitMode::Passthrough { .. })
    }
}

/// How the source file is loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    #[default]
    Script,
    Module,
    CommonJs,
}

/// Per-file emission settings.
#[derive(Clone)]
pub struct EmitContext {
    pub mode: EmitMode,
    /// Name of the per-file record, also the prefix of generated
    /// literal-array names.
    pub record_name: String,
    pub source_file: String,
    pub lang: SourceLang,
    pub script_kind: ScriptKind,
    pub pkg_name: Option<String>,
    /// Emit local-variable records and instruction byte spans.
    pub debug: bool,
    /// Embed the source text in the program-level function.
    pub record_debug_source: bool,
    pub is_shared_module: bool,
    pub has_top_level_await: bool,
    pub patch: Option<Arc<dyn PatchHook>>,
}

impl EmitContext {
    pub fn new(mode: EmitMode, record_name: impl Into<String>) -> Self {
        EmitContext {
            mode,
            record_name: record_name.into(),
            source_file: String::new(),
            lang: SourceLang::EcmaScript,
            script_kind: ScriptKind::Script,
            pkg_name: None,
            debug: false,
            record_debug_source: false,
            is_shared_module: false,
            has_top_level_await: false,
            patch: None,
        }
    }

    #[must_use]
    pub fn with_source_file(mut self, path: impl Into<String>) -> Self {
        self.source_file = path.into();
        self
    }

    #[must_use]
    pub fn with_lang(mut self, lang: SourceLang) -> Self {
        self.lang = lang;
        self
    }

    #[must_use]
    pub fn with_script_kind(mut self, kind: ScriptKind) -> Self {
        self.script_kind = kind;
        self
    }

    #[must_use]
    pub fn with_pkg_name(mut self, pkg_name: impl Into<String>) -> Self {
        self.pkg_name = Some(pkg_name.into());
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_record_debug_source(mut self, record: bool) -> Self {
        self.record_debug_source = record;
        self
    }

    #[must_use]
    pub fn with_shared_module(mut self, shared: bool) -> Self {
        self.is_shared_module = shared;
        self
    }

    #[must_use]
    pub fn with_top_level_await(mut self, tla: bool) -> Self {
        self.has_top_level_await = tla;
        self
    }

    #[must_use]
    pub fn with_patch_hook(mut self, hook: Arc<dyn PatchHook>) -> Self {
        self.patch = Some(hook);
        self
    }

    #[inline]
    pub fn is_merged(&self) -> bool {
        self.mode.is_merged()
    }

    /// `name` qualified with the record name in merged mode.
    pub fn qualify(&self, name: &str) -> String {
        if self.is_merged() {
            format!("{}.{name}", self.record_name)
        } else {
            name.to_owned()
        }
    }

    /// Name under which literal buffer `index` is stored.
    pub fn literal_buffer_name(&self, index: u32) -> String {
        format!("{}_{index}", self.record_name)
    }
}

impl fmt::Debug for EmitContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmitContext")
            .field("mode", &self.mode)
            .field("record_name", &self.record_name)
            .field("source_file", &self.source_file)
            .field("lang", &self.lang)
            .field("script_kind", &self.script_kind)
            .field("pkg_name", &self.pkg_name)
            .field("debug", &self.debug)
            .field("record_debug_source", &self.record_debug_source)
            .field("is_shared_module", &self.is_shared_module)
            .field("has_top_level_await", &self.has_top_level_await)
            .field("patch", &self.patch.is_some())
            .finish()
    }
}

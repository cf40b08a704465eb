//! Emission errors.
//!
//! Only failures caused by collaborators outside this crate are
//! recoverable: a patch hook rejecting its input, or the dump sink failing.
//! Broken invariants inside the emitter go through [`internal_error`].

use std::fmt;
use std::io;

/// Boxed error returned by a [`PatchHook`](crate::PatchHook).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// A patch hook rejected its input.
    #[error("patch hook failed during {stage}")]
    Patch {
        stage: &'static str,
        #[source]
        source: BoxError,
    },

    /// Writing the text dump failed.
    #[error("failed to write program dump")]
    Dump(#[from] io::Error),
}

impl EmitError {
    pub(crate) fn patch(stage: &'static str, source: BoxError) -> Self {
        EmitError::Patch { stage, source }
    }
}

/// Report a broken emitter invariant and abort.
#[cold]
#[track_caller]
pub fn internal_error(args: fmt::Arguments<'_>) -> ! {
    tracing::error!(target: "pando_emit", "internal error: {args}");
    panic!("internal error: {args}");
}

//! Incremental patch hook.
//!
//! Patch tooling observes emission to compare a new build against a
//! previous one. The emitter only calls the hook at fixed points; what the
//! hook does with the data is its own business.

use pando_program::{Function, LiteralArray, Program};

use crate::error::BoxError;

/// Callbacks invoked while a program is assembled.
///
/// Every method defaults to a no-op. The hook is shared by all worker
/// threads, so `process_function` may be called concurrently.
pub trait PatchHook: Send + Sync {
    /// Called once per function before the synthetic annotations are
    /// attached. `literal_buffers` are the function's encoded buffers keyed
    /// by buffer index.
    fn process_function(
        &self,
        function: &mut Function,
        literal_buffers: &[(u32, LiteralArray)],
    ) -> Result<(), BoxError> {
        let _ = (function, literal_buffers);
        Ok(())
    }

    /// Called for each source text module record added to the program.
    fn process_module(
        &self,
        record_name: &str,
        module_buffer: &LiteralArray,
    ) -> Result<(), BoxError> {
        let _ = (record_name, module_buffer);
        Ok(())
    }

    /// Called when a JSON asset is passed through.
    fn process_json_content_record(
        &self,
        record_name: &str,
        content: &str,
    ) -> Result<(), BoxError> {
        let _ = (record_name, content);
        Ok(())
    }

    /// Called with the complete program right before it is handed back.
    fn finalize(&self, program: &mut Program) -> Result<(), BoxError> {
        let _ = program;
        Ok(())
    }
}

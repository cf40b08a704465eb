//! Program assembly.
//!
//! One [`Emitter`] per source file (or per merged compilation) owns the
//! [`Program`] under construction. Functions are emitted in parallel and
//! merged one at a time under a single mutex; module metadata and
//! annotation declarations go through the same lock. [`Emitter::finalize`]
//! consumes the emitter and hands the program back.

mod records;

use std::io;

use pando_program::{Literal, LiteralArray, LiteralTag, LiteralValue, Program, Record};
use parking_lot::Mutex;
use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::annotation::interface::{build_interface_record, AnnotationInterface};
use crate::context::{EmitContext, EmitMode};
use crate::error::{internal_error, EmitError};
use crate::function::{EmittedFunction, FunctionEmitter};
use crate::ir::FunctionIr;
use crate::module_record::{ModuleRecord, ModuleRequestPhase};
use crate::names::{
    MODULE_RECORD, MODULE_RECORD_IDX_FIELD, MODULE_REQUEST_PHASE_IDX_FIELD,
    MODULE_REQUEST_PHASE_RECORD, SCOPE_NAMES_FIELD, SCOPE_NAMES_RECORD,
};
use crate::naming::next_literal_array_name;
use crate::source::SourceUnit;

use records::literal_array_field;

struct EmitterState {
    program: Program,
    /// Per-file record (merged and passthrough modes), inserted on finalize.
    file_record: Option<Record>,
    constant_local_export_slots: FxHashSet<u32>,
}

pub struct Emitter {
    ctx: EmitContext,
    state: Mutex<EmitterState>,
}

impl Emitter {
    pub fn new(ctx: EmitContext) -> Result<Self, EmitError> {
        let mut program = Program::new(ctx.lang);
        records::register_placeholders(&mut program, &ctx);

        let file_record = match &ctx.mode {
            EmitMode::Passthrough { content } => {
                if let Some(hook) = &ctx.patch {
                    hook.process_json_content_record(&ctx.record_name, content)
                        .map_err(|err| EmitError::patch("process_json_content_record", err))?;
                }
                Some(records::json_record(&ctx, content))
            }
            EmitMode::Merged => Some(records::merged_file_record(&ctx)),
            EmitMode::Standalone => {
                records::register_standalone_markers(&mut program, &ctx);
                None
            }
        };
        tracing::debug!(record = %ctx.record_name, mode = ?ctx.mode, "emitter created");

        Ok(Emitter {
            ctx,
            state: Mutex::new(EmitterState {
                program,
                file_record,
                constant_local_export_slots: FxHashSet::default(),
            }),
        })
    }

    #[inline]
    pub fn context(&self) -> &EmitContext {
        &self.ctx
    }

    /// Move one emitted function and everything it references into the
    /// program.
    pub fn add_function(&self, emitted: EmittedFunction) {
        if self.ctx.mode.is_passthrough() {
            return;
        }
        let EmittedFunction {
            function,
            literal_buffers,
            literal_arrays,
            external_records,
            strings,
        } = emitted;

        let mut state = self.state.lock();
        let program = &mut state.program;
        for s in strings {
            program.insert_string(s);
        }
        for (index, array) in literal_buffers {
            program.insert_literal_array(self.ctx.literal_buffer_name(index), array);
        }
        for (name, array) in literal_arrays {
            program.insert_literal_array(name, array);
        }
        for record in external_records {
            program.insert_record(record);
        }
        let name = function.name.clone();
        if program.insert_function(function) {
            tracing::trace!(function = %name, "function merged");
        } else {
            tracing::debug!(function = %name, "duplicate function ignored");
        }
    }

    /// Store the names of lexical scopes, indexed by slot.
    ///
    /// Every slot in `0..scopes.len()` must be named exactly once.
    pub fn add_scope_names_record(&self, scopes: &[(String, u32)]) {
        if self.ctx.mode.is_passthrough() {
            return;
        }
        let mut by_slot: Vec<Option<&str>> = vec![None; scopes.len()];
        for (name, slot) in scopes {
            match by_slot.get_mut(*slot as usize) {
                Some(entry) => *entry = Some(name.as_str()),
                None => internal_error(format_args!(
                    "scope name slot {slot} out of range for {} scopes",
                    scopes.len()
                )),
            }
        }

        let mut array = LiteralArray::with_capacity(scopes.len());
        for (slot, name) in by_slot.into_iter().enumerate() {
            let Some(name) = name else {
                internal_error(format_args!("scope name slot {slot} is unnamed"));
            };
            array.push(Literal::new(
                LiteralTag::String,
                LiteralValue::String(name.to_owned()),
            ));
        }

        let name = next_literal_array_name(&self.ctx.record_name);
        tracing::debug!(array = %name, scopes = scopes.len(), "scope names record");
        let mut state = self.state.lock();
        state.program.insert_literal_array(name.clone(), array);
        self.attach_literal_array(&mut state, SCOPE_NAMES_FIELD, SCOPE_NAMES_RECORD, name);
    }

    /// Store a module's import/export table.
    pub fn add_source_text_module_record(&self, module: &ModuleRecord) -> Result<(), EmitError> {
        if self.ctx.mode.is_passthrough() {
            return Ok(());
        }
        let name = self.ctx.literal_buffer_name(module.index);
        tracing::debug!(array = %name, "source text module record");

        let mut state = self.state.lock();
        state
            .program
            .insert_literal_array(name.clone(), module.buffer.clone());
        self.attach_literal_array(&mut state, MODULE_RECORD_IDX_FIELD, MODULE_RECORD, name);
        if let Some(hook) = &self.ctx.patch {
            hook.process_module(&self.ctx.record_name, &module.buffer)
                .map_err(|err| EmitError::patch("process_module", err))?;
        }
        state
            .constant_local_export_slots
            .extend(module.constant_local_export_slots.iter().copied());
        Ok(())
    }

    /// Store the evaluation phase of each module request.
    pub fn add_module_request_phase_record(&self, phase: &ModuleRequestPhase) {
        if self.ctx.mode.is_passthrough() {
            return;
        }
        let name = self.ctx.literal_buffer_name(phase.index);
        tracing::debug!(array = %name, "module request phase record");

        let mut state = self.state.lock();
        state
            .program
            .insert_literal_array(name.clone(), phase.buffer.clone());
        self.attach_literal_array(
            &mut state,
            MODULE_REQUEST_PHASE_IDX_FIELD,
            MODULE_REQUEST_PHASE_RECORD,
            name,
        );
    }

    /// Add the record describing a declared annotation type.
    pub fn add_annotation_interface(&self, iface: &AnnotationInterface) {
        if self.ctx.mode.is_passthrough() {
            return;
        }
        let mut state = self.state.lock();
        let record = build_interface_record(iface, &self.ctx, &mut state.program);
        state.program.insert_record(record);
    }

    /// Emit and merge `functions` on the rayon pool.
    ///
    /// Stops at the first patch hook error.
    #[tracing::instrument(level = "debug", skip_all, fields(
        record = %self.ctx.record_name,
        functions = functions.len(),
    ))]
    pub fn emit_functions(
        &self,
        functions: Vec<FunctionIr>,
        source: &SourceUnit,
    ) -> Result<(), EmitError> {
        if self.ctx.mode.is_passthrough() {
            return Ok(());
        }
        functions.into_par_iter().try_for_each(|ir| {
            let emitted = FunctionEmitter::new(ir, source, &self.ctx).generate()?;
            self.add_function(emitted);
            Ok(())
        })
    }

    /// Slots of constant local exports seen in module records so far.
    pub fn constant_local_export_slots(&self) -> FxHashSet<u32> {
        self.state.lock().constant_local_export_slots.clone()
    }

    /// Inspect the program under construction.
    pub fn with_program<R>(&self, f: impl FnOnce(&Program) -> R) -> R {
        f(&self.state.lock().program)
    }

    /// Hand the finished program back, optionally writing its text dump.
    #[tracing::instrument(level = "debug", skip_all, fields(record = %self.ctx.record_name))]
    pub fn finalize(self, dump: Option<&mut dyn io::Write>) -> Result<Program, EmitError> {
        let Emitter { ctx, state } = self;
        let EmitterState {
            mut program,
            file_record,
            ..
        } = state.into_inner();

        if let Some(record) = file_record {
            program.insert_record(record);
        }

        if let Some(out) = dump {
            let mut text = String::new();
            program.dump(&mut text).map_err(io::Error::other)?;
            out.write_all(text.as_bytes())?;
            out.flush()?;
        }

        if let Some(hook) = &ctx.patch {
            hook.finalize(&mut program)
                .map_err(|err| EmitError::patch("finalize", err))?;
        }

        tracing::debug!(
            functions = program.function_count(),
            records = program.record_count(),
            literal_arrays = program.literal_array_count(),
            "program finalized"
        );
        Ok(program)
    }

    /// Point `field` of the per-file record (merged) or a field of the
    /// shared record `standalone_record` (standalone) at `array`.
    fn attach_literal_array(
        &self,
        state: &mut EmitterState,
        field: &str,
        standalone_record: &str,
        array: String,
    ) {
        match state.file_record.as_mut() {
            Some(record) => record.push_field(literal_array_field(field, array)),
            None => records::push_standalone_field(
                &mut state.program,
                self.ctx.lang,
                standalone_record,
                literal_array_field(self.ctx.source_file.clone(), array),
            ),
        }
    }
}

#[cfg(test)]
mod tests;

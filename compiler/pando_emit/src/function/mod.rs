//! Per-function emission.
//!
//! [`FunctionEmitter`] turns one [`FunctionIr`] into an [`EmittedFunction`]:
//! the finished [`Function`] plus everything it drags into the program
//! (encoded literal buffers, annotation arrays, external stub records,
//! referenced strings). It touches no shared state besides the literal-array
//! counter, so any number of emitters can run in parallel.

mod debug_info;

use pando_program::{
    AnnotationData, CatchBlock, Function, FunctionKind, LiteralArray, Record, ScalarValue,
};

use crate::annotation::usage::lower_usages;
use crate::context::EmitContext;
use crate::error::EmitError;
use crate::ir::{FunctionIr, FunctionRoot, IrCatchBlock};
use crate::literal_encoder::encode_buffer;
use crate::names::{
    CONCURRENT_MODULE_REQUESTS_ANNOTATION, CONCURRENT_MODULE_REQUEST_ELEMENT,
    EXPECTED_PROPERTY_COUNT_ANNOTATION, EXPECTED_PROPERTY_COUNT_ELEMENT, SLOT_NUMBER_ANNOTATION,
    SLOT_NUMBER_ELEMENT, SOURCE_NOT_SUPPORTED,
};
use crate::source::SourceUnit;

/// Output of [`FunctionEmitter::generate`], ready to merge.
#[derive(Debug)]
pub struct EmittedFunction {
    pub function: Function,
    /// Encoded literal buffers keyed by buffer index.
    pub literal_buffers: Vec<(u32, LiteralArray)>,
    /// Arrays created for annotation arguments, already named.
    pub literal_arrays: Vec<(String, LiteralArray)>,
    pub external_records: Vec<Record>,
    pub strings: Vec<String>,
}

pub struct FunctionEmitter<'a> {
    ir: FunctionIr,
    source: &'a SourceUnit,
    ctx: &'a EmitContext,
}

impl<'a> FunctionEmitter<'a> {
    pub fn new(ir: FunctionIr, source: &'a SourceUnit, ctx: &'a EmitContext) -> Self {
        FunctionEmitter { ir, source, ctx }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(
        function = %self.ir.name,
        insns = self.ir.insns.len(),
    ))]
    pub fn generate(self) -> Result<EmittedFunction, EmitError> {
        let FunctionEmitter { ir, source, ctx } = self;

        let mut function = Function::new(ir.name.clone(), ctx.lang, ir.param_count);
        function.regs_num = ir.total_regs;
        function.kind = ir.kind;
        function.slots_num = ir.slot_count;
        function.expected_property_count = ir.expected_property_count;

        function.ins = debug_info::translate(&ir, source, ctx.debug);
        if ctx.debug {
            function.local_variables = debug_info::local_variables(&ir);
        }

        function.source_file.clone_from(&source.path);
        if ir.root == FunctionRoot::Program {
            function.source_code = Some(if ctx.record_debug_source {
                source.text.clone()
            } else {
                SOURCE_NOT_SUPPORTED.to_owned()
            });
        }

        function.catch_blocks = ir.catch_blocks.iter().map(catch_block).collect();

        let literal_buffers: Vec<(u32, LiteralArray)> = ir
            .literal_buffers
            .iter()
            .map(|buffer| (buffer.index, encode_buffer(&buffer.literals)))
            .collect();

        if function.kind == FunctionKind::Concurrent {
            function
                .concurrent_module_requests
                .clone_from(&ir.concurrent_module_requests);
        }

        let mut literal_arrays = Vec::new();
        let mut external_records = Vec::new();
        if let FunctionRoot::Function(node) = ir.root {
            if let Some(usages) = source.tree.method_annotations(node) {
                let lowered = lower_usages(usages, ctx);
                for annotation in lowered.annotations {
                    function.add_annotation(annotation);
                }
                literal_arrays = lowered.literal_arrays;
                external_records = lowered.external_records;
            }
        }

        if let Some(hook) = &ctx.patch {
            hook.process_function(&mut function, &literal_buffers)
                .map_err(|err| EmitError::patch("process_function", err))?;
        }

        attach_expected_property_count(&mut function, ir.expected_property_count);
        attach_slot_number(&mut function, ir.slot_count);
        if ctx.is_merged() && function.kind == FunctionKind::Concurrent {
            attach_concurrent_module_requests(&mut function);
        }

        tracing::trace!(
            ins = function.ins.len(),
            buffers = literal_buffers.len(),
            annotations = function.annotations().len(),
            "function emitted"
        );

        Ok(EmittedFunction {
            function,
            literal_buffers,
            literal_arrays,
            external_records,
            strings: ir.strings,
        })
    }
}

fn catch_block(block: &IrCatchBlock) -> CatchBlock {
    CatchBlock {
        exception_record: block.exception_record.clone().unwrap_or_default(),
        try_begin_label: block.try_begin.clone(),
        try_end_label: block.try_end.clone(),
        catch_begin_label: block.catch_begin.clone(),
        catch_end_label: block.catch_end.clone(),
    }
}

/// Attach the inline-cache slot count unless already present.
pub fn attach_slot_number(function: &mut Function, slots: u32) -> bool {
    function.attach_once(
        AnnotationData::new(SLOT_NUMBER_ANNOTATION)
            .with_element(SLOT_NUMBER_ELEMENT, ScalarValue::U32(slots)),
    )
}

/// Attach the expected property count. A zero hint attaches nothing.
pub fn attach_expected_property_count(function: &mut Function, count: u32) -> bool {
    if count == 0 {
        return false;
    }
    function.attach_once(
        AnnotationData::new(EXPECTED_PROPERTY_COUNT_ANNOTATION)
            .with_element(EXPECTED_PROPERTY_COUNT_ELEMENT, ScalarValue::U32(count)),
    )
}

/// Attach one element per module index the function depends on.
pub fn attach_concurrent_module_requests(function: &mut Function) -> bool {
    let mut annotation = AnnotationData::new(CONCURRENT_MODULE_REQUESTS_ANNOTATION);
    for &index in &function.concurrent_module_requests {
        annotation.push(CONCURRENT_MODULE_REQUEST_ELEMENT, ScalarValue::U32(index));
    }
    function.attach_once(annotation)
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;
use crate::annotation::interface::{AnnotationPropertyDecl, DeclaredType};
use crate::context::ScriptKind;
use crate::error::BoxError;
use crate::ir::{IrLiteral, LiteralBuffer};
use crate::names::{
    COMMONJS_RECORD, CONCURRENT_MODULE_REQUESTS_ANNOTATION, EXPECTED_PROPERTY_COUNT_ANNOTATION,
    HAS_TOP_LEVEL_AWAIT_FIELD, HAS_TOP_LEVEL_AWAIT_RECORD, IS_COMMONJS_FIELD,
    IS_SHARED_MODULE_FIELD, JSON_FILE_CONTENT_FIELD, SHARED_MODULE_RECORD, SLOT_NUMBER_ANNOTATION,
};
use crate::patch::PatchHook;
use crate::test_helpers::{method_source, program_ir};
use pando_program::{AccessFlags, ScalarValue, SourceLang};
use pretty_assertions::assert_eq;

fn emitter(ctx: EmitContext) -> Emitter {
    match Emitter::new(ctx) {
        Ok(emitter) => emitter,
        Err(err) => panic!("emitter construction failed: {err}"),
    }
}

fn finalize(emitter: Emitter) -> Program {
    match emitter.finalize(None) {
        Ok(program) => program,
        Err(err) => panic!("finalize failed: {err}"),
    }
}

fn merged() -> EmitContext {
    EmitContext::new(EmitMode::Merged, "rec").with_source_file("a.js")
}

fn standalone() -> EmitContext {
    EmitContext::new(EmitMode::Standalone, "rec").with_source_file("a.js")
}

fn field_value(program: &Program, record: &str, field: &str) -> Option<ScalarValue> {
    program
        .record(record)
        .and_then(|r| r.field(field))
        .and_then(|f| f.value.clone())
}

#[test]
fn placeholders_are_registered() {
    let program = finalize(emitter(standalone()));
    let slot = program.record(SLOT_NUMBER_ANNOTATION);
    assert_eq!(slot.map(|r| r.lang), Some(SourceLang::Neutral));
    assert!(slot.is_some_and(|r| r.flags.contains(AccessFlags::ANNOTATION)));
    assert!(program.has_record(EXPECTED_PROPERTY_COUNT_ANNOTATION));
    assert!(!program.has_record(CONCURRENT_MODULE_REQUESTS_ANNOTATION));

    let program = finalize(emitter(merged()));
    assert!(program.has_record(CONCURRENT_MODULE_REQUESTS_ANNOTATION));
}

#[test]
fn merged_file_record_carries_markers() {
    let ctx = merged()
        .with_pkg_name("pkg")
        .with_script_kind(ScriptKind::Module)
        .with_top_level_await(true)
        .with_shared_module(true);
    let program = finalize(emitter(ctx));

    assert_eq!(field_value(&program, "rec", "pkgName@pkg"), Some(ScalarValue::U8(0)));
    assert_eq!(field_value(&program, "rec", IS_COMMONJS_FIELD), Some(ScalarValue::U8(0)));
    assert_eq!(
        field_value(&program, "rec", HAS_TOP_LEVEL_AWAIT_FIELD),
        Some(ScalarValue::U8(1))
    );
    assert_eq!(
        field_value(&program, "rec", IS_SHARED_MODULE_FIELD),
        Some(ScalarValue::U8(1))
    );
    assert!(!program.has_record(SHARED_MODULE_RECORD));
}

#[test]
fn merged_script_has_no_top_level_await_field() {
    let ctx = merged().with_script_kind(ScriptKind::CommonJs);
    let program = finalize(emitter(ctx));

    assert_eq!(field_value(&program, "rec", IS_COMMONJS_FIELD), Some(ScalarValue::U8(1)));
    assert!(program
        .record("rec")
        .and_then(|r| r.field(HAS_TOP_LEVEL_AWAIT_FIELD))
        .is_none());
}

#[test]
fn standalone_uses_free_standing_records() {
    let ctx = standalone()
        .with_script_kind(ScriptKind::CommonJs)
        .with_shared_module(true);
    let program = finalize(emitter(ctx));

    assert!(!program.has_record("rec"));
    assert_eq!(
        field_value(&program, COMMONJS_RECORD, "isCommonJs"),
        Some(ScalarValue::U8(1))
    );
    assert!(program.has_record(SHARED_MODULE_RECORD));
    assert!(!program.has_record(HAS_TOP_LEVEL_AWAIT_RECORD));
}

#[test]
fn passthrough_stores_json_and_ignores_functions() {
    let ctx = EmitContext::new(
        EmitMode::Passthrough {
            content: "{\"a\":1}".into(),
        },
        "data",
    );
    let (source, _) = method_source(Vec::new());
    let emitter = emitter(ctx);
    assert!(emitter.emit_functions(vec![program_ir("main")], &source).is_ok());
    let program = finalize(emitter);

    assert_eq!(program.function_count(), 0);
    assert_eq!(
        field_value(&program, "data", JSON_FILE_CONTENT_FIELD),
        Some(ScalarValue::String("{\"a\":1}".into()))
    );
}

#[test]
fn merged_function_brings_its_tables() {
    let (source, _) = method_source(Vec::new());
    let ctx = merged();
    let mut ir = program_ir("main");
    ir.strings = vec!["hello".into()];
    ir.literal_buffers.push(LiteralBuffer {
        index: 12,
        literals: vec![IrLiteral::Boolean(true)],
    });
    let emitted = FunctionEmitter::new(ir, &source, &ctx).generate();
    let emitter = emitter(ctx.clone());
    match emitted {
        Ok(emitted) => emitter.add_function(emitted),
        Err(err) => panic!("{err}"),
    }
    let program = finalize(emitter);

    assert!(program.function("main").is_some());
    assert!(program.contains_string("hello"));
    assert_eq!(program.literal_array("rec_12").map(LiteralArray::len), Some(2));
}

#[test]
fn concurrent_merge_keeps_every_function() {
    const FUNCTIONS: usize = 64;
    let (source, _) = method_source(Vec::new());
    let emitter = emitter(standalone());

    let functions = (0..FUNCTIONS)
        .map(|i| {
            let mut ir = program_ir(&format!("f{i}"));
            ir.literal_buffers.push(LiteralBuffer {
                index: 1000 + u32::try_from(i).unwrap_or_default(),
                literals: vec![IrLiteral::Integer(1)],
            });
            ir
        })
        .collect();
    assert!(emitter.emit_functions(functions, &source).is_ok());
    let program = finalize(emitter);

    assert_eq!(program.function_count(), FUNCTIONS);
    assert_eq!(program.literal_array_count(), FUNCTIONS);
    assert!(program.functions().all(|f| {
        f.annotations()
            .iter()
            .filter(|a| a.name == SLOT_NUMBER_ANNOTATION)
            .count()
            == 1
    }));
}

#[test]
fn scope_names_are_ordered_by_slot() {
    let emitter = emitter(merged());
    emitter.add_scope_names_record(&[("b".into(), 1), ("a".into(), 0)]);
    let program = finalize(emitter);

    let Some(ScalarValue::LiteralArray(name)) = field_value(&program, "rec", "scopeNames") else {
        panic!("scopeNames field missing");
    };
    assert!(name.starts_with("rec_"));
    let names: Vec<_> = program
        .literal_array(&name)
        .map(|a| a.values().map(|l| l.value.to_string()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["\"a\"", "\"b\""]);
    assert_eq!(program.literal_array(&name).map(LiteralArray::len), Some(4));
}

#[test]
fn standalone_scope_names_are_keyed_by_source_file() {
    let emitter = emitter(standalone());
    emitter.add_scope_names_record(&[("a".into(), 0)]);
    let program = finalize(emitter);

    assert!(matches!(
        field_value(&program, SCOPE_NAMES_RECORD, "a.js"),
        Some(ScalarValue::LiteralArray(_))
    ));
}

#[test]
#[should_panic(expected = "out of range")]
fn scope_slot_out_of_range_is_fatal() {
    let emitter = emitter(merged());
    emitter.add_scope_names_record(&[("a".into(), 3)]);
}

#[derive(Default)]
struct CountingHook {
    modules: AtomicUsize,
    finalized: AtomicUsize,
}

impl PatchHook for CountingHook {
    fn process_module(&self, record_name: &str, _buffer: &LiteralArray) -> Result<(), BoxError> {
        assert_eq!(record_name, "rec");
        self.modules.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn finalize(&self, program: &mut Program) -> Result<(), BoxError> {
        program.insert_string("patched");
        self.finalized.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn module_records_reach_hook_and_record() {
    let hook = Arc::new(CountingHook::default());
    let emitter = emitter(merged().with_patch_hook(hook.clone()));

    let mut module = ModuleRecord {
        index: 5,
        ..ModuleRecord::default()
    };
    module.constant_local_export_slots.extend([1, 4]);
    assert!(emitter.add_source_text_module_record(&module).is_ok());
    emitter.add_module_request_phase_record(&ModuleRequestPhase {
        index: 6,
        buffer: LiteralArray::default(),
    });
    assert_eq!(
        emitter.constant_local_export_slots(),
        [1, 4].into_iter().collect::<FxHashSet<u32>>()
    );
    let program = finalize(emitter);

    assert_eq!(hook.modules.load(Ordering::SeqCst), 1);
    assert_eq!(hook.finalized.load(Ordering::SeqCst), 1);
    assert!(program.contains_string("patched"));
    assert_eq!(
        field_value(&program, "rec", MODULE_RECORD_IDX_FIELD),
        Some(ScalarValue::LiteralArray("rec_5".into()))
    );
    assert_eq!(
        field_value(&program, "rec", MODULE_REQUEST_PHASE_IDX_FIELD),
        Some(ScalarValue::LiteralArray("rec_6".into()))
    );
    assert!(program.literal_array("rec_5").is_some());
}

#[test]
fn standalone_module_record() {
    let emitter = emitter(standalone());
    let module = ModuleRecord {
        index: 9,
        ..ModuleRecord::default()
    };
    assert!(emitter.add_source_text_module_record(&module).is_ok());
    let program = finalize(emitter);

    assert_eq!(
        field_value(&program, MODULE_RECORD, "a.js"),
        Some(ScalarValue::LiteralArray("rec_9".into()))
    );
}

#[test]
fn annotation_interface_becomes_record() {
    let emitter = emitter(merged());
    emitter.add_annotation_interface(&AnnotationInterface {
        name: "Anno".into(),
        properties: vec![AnnotationPropertyDecl::new("n", DeclaredType::Number)],
    });
    let program = finalize(emitter);

    let record = program.record("rec.Anno");
    assert!(record.is_some_and(|r| r.flags.contains(AccessFlags::ANNOTATION)));
    assert!(record.and_then(|r| r.field("n")).is_some());
}

struct FailingFinalize;

impl PatchHook for FailingFinalize {
    fn finalize(&self, _program: &mut Program) -> Result<(), BoxError> {
        Err("stale".into())
    }
}

#[test]
fn finalize_hook_error_propagates() {
    let emitter = emitter(standalone().with_patch_hook(Arc::new(FailingFinalize)));
    assert!(matches!(
        emitter.finalize(None),
        Err(EmitError::Patch {
            stage: "finalize",
            ..
        })
    ));
}

#[test]
fn finalize_writes_dump() {
    let (source, _) = method_source(Vec::new());
    let emitter = emitter(standalone());
    assert!(emitter.emit_functions(vec![program_ir("main")], &source).is_ok());

    let mut out = Vec::new();
    let sink: &mut dyn io::Write = &mut out;
    assert!(emitter.finalize(Some(sink)).is_ok());

    let text = String::from_utf8(out).unwrap_or_default();
    assert_eq!(
        text,
        ".language ECMAScript\n\nslotNum = 0x0\n.function any main() {\n\treturnundefined\n}\n\n\n"
    );
}

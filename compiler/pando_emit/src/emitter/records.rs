//! Marker records describing the source file as a whole.

use pando_program::{AccessFlags, Field, Program, Record, ScalarValue, SourceLang, TypeDescriptor};

use crate::context::{EmitContext, ScriptKind};
use crate::names::{
    COMMONJS_RECORD, COMMONJS_RECORD_FIELD, CONCURRENT_MODULE_REQUESTS_ANNOTATION,
    EXPECTED_PROPERTY_COUNT_ANNOTATION, HAS_TOP_LEVEL_AWAIT_FIELD, HAS_TOP_LEVEL_AWAIT_RECORD,
    IS_COMMONJS_FIELD, IS_SHARED_MODULE_FIELD, JSON_FILE_CONTENT_FIELD, PKG_NAME_FIELD_PREFIX,
    SHARED_MODULE_RECORD, SLOT_NUMBER_ANNOTATION,
};

fn u8_field(name: impl Into<String>, value: u8) -> Field {
    Field::new(name, TypeDescriptor::new(TypeDescriptor::U8)).with_value(ScalarValue::U8(value))
}

/// Field pointing at a literal array.
pub(super) fn literal_array_field(name: impl Into<String>, array: String) -> Field {
    Field::new(name, TypeDescriptor::new(TypeDescriptor::U32))
        .with_value(ScalarValue::LiteralArray(array))
}

/// Annotation records the loader expects to exist before any function
/// refers to them.
pub(super) fn register_placeholders(program: &mut Program, ctx: &EmitContext) {
    let annotation = |name: &str, lang| Record::new(name, lang).with_flags(AccessFlags::ANNOTATION);

    program.insert_record(annotation(EXPECTED_PROPERTY_COUNT_ANNOTATION, ctx.lang));
    program.insert_record(annotation(SLOT_NUMBER_ANNOTATION, SourceLang::Neutral));
    if ctx.is_merged() {
        program.insert_record(annotation(CONCURRENT_MODULE_REQUESTS_ANNOTATION, ctx.lang));
    }
}

/// The record holding a passed-through JSON asset.
pub(super) fn json_record(ctx: &EmitContext, content: &str) -> Record {
    Record::new(ctx.record_name.clone(), ctx.lang)
        .with_flags(AccessFlags::PUBLIC)
        .with_field(
            Field::new(
                JSON_FILE_CONTENT_FIELD,
                TypeDescriptor::new(TypeDescriptor::U32),
            )
            .with_value(ScalarValue::String(content.to_owned())),
        )
}

/// The per-file record of merged compilation, with its marker fields.
pub(super) fn merged_file_record(ctx: &EmitContext) -> Record {
    let mut record = Record::new(ctx.record_name.clone(), ctx.lang).with_flags(AccessFlags::PUBLIC);

    if let Some(pkg) = &ctx.pkg_name {
        record.push_field(u8_field(format!("{PKG_NAME_FIELD_PREFIX}{pkg}"), 0));
    }
    record.push_field(u8_field(
        IS_COMMONJS_FIELD,
        u8::from(ctx.script_kind == ScriptKind::CommonJs),
    ));
    if ctx.script_kind == ScriptKind::Module {
        record.push_field(u8_field(
            HAS_TOP_LEVEL_AWAIT_FIELD,
            u8::from(ctx.has_top_level_await),
        ));
    }
    if ctx.is_shared_module {
        record.push_field(u8_field(IS_SHARED_MODULE_FIELD, 1));
    }
    record
}

/// Free-standing marker records of standalone compilation.
pub(super) fn register_standalone_markers(program: &mut Program, ctx: &EmitContext) {
    let marker = |record: &str, field: &str| {
        Record::new(record, ctx.lang)
            .with_flags(AccessFlags::PUBLIC)
            .with_field(u8_field(field, 1))
    };

    if ctx.script_kind == ScriptKind::CommonJs {
        program.insert_record(marker(COMMONJS_RECORD, COMMONJS_RECORD_FIELD));
    }
    if ctx.script_kind == ScriptKind::Module && ctx.has_top_level_await {
        program.insert_record(marker(HAS_TOP_LEVEL_AWAIT_RECORD, HAS_TOP_LEVEL_AWAIT_FIELD));
    }
    if ctx.is_shared_module {
        program.insert_record(marker(SHARED_MODULE_RECORD, IS_SHARED_MODULE_FIELD));
    }
}

/// Add `field` to the shared record `record`, creating it on first use.
pub(super) fn push_standalone_field(
    program: &mut Program,
    lang: SourceLang,
    record: &str,
    field: Field,
) {
    if !program.has_record(record) {
        program.insert_record(Record::new(record, lang).with_flags(AccessFlags::PUBLIC));
    }
    if let Some(record) = program.record_mut(record) {
        record.push_field(field);
    }
}

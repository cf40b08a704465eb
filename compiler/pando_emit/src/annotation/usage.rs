//! Annotation usages on method bodies.

use pando_program::{AccessFlags, AnnotationData, LiteralArray, Record};

use super::{scalar_value, AnnotationUsage};
use crate::context::EmitContext;

/// What the usages of one method turn into.
#[derive(Debug, Default)]
pub(crate) struct LoweredUsages {
    pub annotations: Vec<AnnotationData>,
    pub literal_arrays: Vec<(String, LiteralArray)>,
    /// Stub records for annotations declared in other modules.
    pub external_records: Vec<Record>,
}

pub(crate) fn lower_usages(usages: &[AnnotationUsage], ctx: &EmitContext) -> LoweredUsages {
    let mut out = LoweredUsages::default();

    for usage in usages {
        let name = ctx.qualify(&usage.name);
        if usage.imported {
            out.external_records.push(
                Record::new(name.clone(), ctx.lang)
                    .with_flags(AccessFlags::ANNOTATION | AccessFlags::EXTERNAL),
            );
        }

        let mut data = AnnotationData::new(name);
        for property in usage.arguments.iter().flatten() {
            let value = scalar_value(&property.value, &ctx.record_name, &mut out.literal_arrays);
            data.push(property.name.clone(), value);
        }
        out.annotations.push(data);
    }

    out
}

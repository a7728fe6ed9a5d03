//! Records (`struct-like` marker) and named tuples (`fixed-tuple` marker).
//!
//! Both are registered on their structural marker, so one handler serves
//! every record type. Field lists come from the descriptor being converted.

use strata_api::{
    ConversionError, Data, ErrorCollector, FieldDef, PathElem, RecordData, TypeDesc, Value,
};
use strata_engine::{
    Context, Handler, Next, OmitDefaults, RecordLayout, RecordOptions, Structurer, UnknownFields,
    Unstructurer,
};

fn declared_fields(desc: &TypeDesc) -> Result<&[FieldDef], ConversionError> {
    desc.fields().ok_or_else(|| {
        ConversionError::shape_mismatch(format!("`{desc}` does not declare any fields"))
    })
}

fn missing(options: &RecordOptions, field: &FieldDef) -> ConversionError {
    let external = options.external_name(field);
    if external == field.name {
        ConversionError::missing_field("Missing field")
    } else {
        ConversionError::missing_field(format!("Missing field (`{external}` in the input)"))
    }
}

/// Declared default of an absent field, if defaults may be filled in.
fn fill(options: &RecordOptions, field: &FieldDef) -> Option<Data> {
    if options.fill_defaults {
        field.default.clone()
    } else {
        None
    }
}

fn from_mapping(
    ctx: &Context<'_, Structurer>,
    options: &RecordOptions,
    entries: &[(Value, Value)],
) -> Result<Data, ConversionError> {
    let desc = ctx.desc().resolve_alias();
    let fields = declared_fields(desc)?;

    let mut errors = ErrorCollector::new();
    let mut out = Vec::with_capacity(fields.len());
    let mut known = Vec::with_capacity(fields.len());
    for field in fields {
        let external = options.external_name(field);
        let raw = entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(external.as_str()))
            .map(|(_, v)| v);
        known.push(external);

        let segment = PathElem::Field(field.name.clone());
        match raw {
            Some(raw) => {
                if let Some(data) = errors.collect(segment, ctx.structure_into(&field.ty, raw)) {
                    out.push((field.name.clone(), data));
                }
            }
            None => match fill(options, field) {
                Some(default) => out.push((field.name.clone(), default)),
                None => errors.push(segment, missing(options, field)),
            },
        }
    }

    if options.unknown_fields == UnknownFields::Reject {
        for (key, _) in entries {
            let is_known = key.as_str().is_some_and(|k| known.iter().any(|n| n == k));
            if !is_known {
                errors.push(
                    PathElem::Entry(key.clone()),
                    ConversionError::shape_mismatch("Unexpected field"),
                );
            }
        }
    }

    errors.finish(|| format!("Failed to structure a mapping into {desc}"))?;
    Ok(Data::Record(RecordData::new(desc.clone(), out)))
}

fn from_sequence(
    ctx: &Context<'_, Structurer>,
    options: &RecordOptions,
    items: &[Value],
) -> Result<Data, ConversionError> {
    let desc = ctx.desc().resolve_alias();
    let fields = declared_fields(desc)?;
    if items.len() > fields.len() {
        return Err(ConversionError::shape_mismatch(format!(
            "Too many fields to structure into {desc}: got {}, need at most {}",
            items.len(),
            fields.len()
        )));
    }

    let mut errors = ErrorCollector::new();
    let mut out = Vec::with_capacity(fields.len());
    for (field, raw) in fields.iter().zip(items) {
        let segment = PathElem::Field(field.name.clone());
        if let Some(data) = errors.collect(segment, ctx.structure_into(&field.ty, raw)) {
            out.push((field.name.clone(), data));
        }
    }
    for field in &fields[items.len()..] {
        match fill(options, field) {
            Some(default) => out.push((field.name.clone(), default)),
            None => errors.push(
                PathElem::Field(field.name.clone()),
                ConversionError::missing_field("Missing field"),
            ),
        }
    }

    errors.finish(|| format!("Failed to structure a sequence into {desc}"))?;
    Ok(Data::Record(RecordData::new(desc.clone(), out)))
}

/// Unstructure every declared field, keyed by external name or positionally.
fn to_layout(
    ctx: &Context<'_, Unstructurer>,
    options: &RecordOptions,
    layout: RecordLayout,
    record: &RecordData,
) -> Result<Value, ConversionError> {
    let desc = ctx.desc();
    let fields = declared_fields(desc)?;

    let mut errors = ErrorCollector::new();
    let mut entries = Vec::with_capacity(fields.len());
    let mut items = Vec::with_capacity(fields.len());
    for field in fields {
        let segment = PathElem::Field(field.name.clone());
        let Some(data) = record.get(&field.name) else {
            errors.push(segment, ConversionError::missing_field("Missing field"));
            continue;
        };
        match layout {
            RecordLayout::Mapping => {
                if options.omit_defaults == OmitDefaults::WhenEqual
                    && field.default.as_ref() == Some(data)
                {
                    continue;
                }
                if let Some(value) = errors.collect(segment, ctx.unstructure_as(&field.ty, data)) {
                    entries.push((Value::Str(options.external_name(field)), value));
                }
            }
            RecordLayout::Sequence => {
                if let Some(value) = errors.collect(segment, ctx.unstructure_as(&field.ty, data)) {
                    items.push(value);
                }
            }
        }
    }

    errors.finish(|| format!("Cannot unstructure as {desc}"))?;
    Ok(match layout {
        RecordLayout::Mapping => Value::Map(entries),
        RecordLayout::Sequence => Value::Seq(items),
    })
}

/// Any record type: structured from the configured layout, unstructured to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordHandler {
    options: RecordOptions,
}

impl RecordHandler {
    pub fn new(options: RecordOptions) -> Self {
        Self { options }
    }
}

impl Handler<Structurer> for RecordHandler {
    fn handle(
        &self,
        ctx: &Context<'_, Structurer>,
        raw: &Value,
        _next: Next<'_, Structurer>,
    ) -> Result<Data, ConversionError> {
        match (self.options.layout, raw) {
            (RecordLayout::Mapping, Value::Map(entries)) => {
                from_mapping(ctx, &self.options, entries)
            }
            (RecordLayout::Sequence, Value::Seq(items)) => from_sequence(ctx, &self.options, items),
            (RecordLayout::Mapping, _) => Err(ConversionError::shape_mismatch(format!(
                "Can only structure a mapping into {}",
                ctx.desc()
            ))),
            (RecordLayout::Sequence, _) => Err(ConversionError::shape_mismatch(format!(
                "Can only structure a sequence into {}",
                ctx.desc()
            ))),
        }
    }
}

impl Handler<Unstructurer> for RecordHandler {
    fn handle(
        &self,
        ctx: &Context<'_, Unstructurer>,
        data: &Data,
        _next: Next<'_, Unstructurer>,
    ) -> Result<Value, ConversionError> {
        let Data::Record(record) = data else {
            return Err(ConversionError::shape_mismatch(format!(
                "The value must be of type `{}`",
                ctx.desc().resolve_alias()
            )));
        };
        to_layout(ctx, &self.options, self.options.layout, record)
    }
}

/// Any named tuple type: structured from a sequence or a mapping, unstructured
/// to a sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedTupleHandler {
    options: RecordOptions,
}

impl NamedTupleHandler {
    pub fn new(options: RecordOptions) -> Self {
        Self { options }
    }
}

impl Handler<Structurer> for NamedTupleHandler {
    fn handle(
        &self,
        ctx: &Context<'_, Structurer>,
        raw: &Value,
        _next: Next<'_, Structurer>,
    ) -> Result<Data, ConversionError> {
        match raw {
            Value::Seq(items) => from_sequence(ctx, &self.options, items),
            Value::Map(entries) => from_mapping(ctx, &self.options, entries),
            _ => Err(ConversionError::shape_mismatch(format!(
                "Can only structure a sequence or a mapping into {}",
                ctx.desc()
            ))),
        }
    }
}

impl Handler<Unstructurer> for NamedTupleHandler {
    fn handle(
        &self,
        ctx: &Context<'_, Unstructurer>,
        data: &Data,
        _next: Next<'_, Unstructurer>,
    ) -> Result<Value, ConversionError> {
        match data {
            Data::Record(record) => to_layout(ctx, &self.options, RecordLayout::Sequence, record),
            other => Err(ConversionError::shape_mismatch(format!(
                "Can only unstructure a named tuple as {}, got `{}`",
                ctx.desc(),
                other.kind_name()
            ))),
        }
    }
}

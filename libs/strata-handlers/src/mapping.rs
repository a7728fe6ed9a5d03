use strata_api::{ConversionError, Data, ErrorCollector, PathElem, Value};
use strata_engine::{Context, Handler, Next, Structurer, Unstructurer};

use crate::type_args;

/// `dict[K, V]`: keys converted as `K`, values as `V`.
///
/// A failing key is reported under `key(k)`, a failing value under the bare
/// key. Entries keep their input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DictHandler;

impl Handler<Structurer> for DictHandler {
    fn handle(
        &self,
        ctx: &Context<'_, Structurer>,
        raw: &Value,
        _next: Next<'_, Structurer>,
    ) -> Result<Data, ConversionError> {
        let Value::Map(entries) = raw else {
            return Err(ConversionError::shape_mismatch(
                "Can only structure a mapping into a dict generic",
            ));
        };
        let [key_ty, value_ty] = type_args::<2>(ctx.desc())?;

        let mut errors = ErrorCollector::new();
        let mut out = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let k = errors.collect(PathElem::Key(key.clone()), ctx.structure_into(key_ty, key));
            let v = errors.collect(
                PathElem::Entry(key.clone()),
                ctx.structure_into(value_ty, value),
            );
            if let (Some(k), Some(v)) = (k, v) {
                out.push((k, v));
            }
        }
        errors.finish(|| format!("Cannot structure into {}", ctx.desc()))?;
        Ok(Data::Dict(out))
    }
}

impl Handler<Unstructurer> for DictHandler {
    fn handle(
        &self,
        ctx: &Context<'_, Unstructurer>,
        data: &Data,
        _next: Next<'_, Unstructurer>,
    ) -> Result<Value, ConversionError> {
        let Data::Dict(entries) = data else {
            return Err(ConversionError::shape_mismatch(
                "Can only unstructure a dict as a dict generic",
            ));
        };
        let [key_ty, value_ty] = type_args::<2>(ctx.desc())?;

        let mut errors = ErrorCollector::new();
        let mut out = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let k = errors.collect(
                PathElem::Key(key.path_label()),
                ctx.unstructure_as(key_ty, key),
            );
            let v = errors.collect(
                PathElem::Entry(key.path_label()),
                ctx.unstructure_as(value_ty, value),
            );
            if let (Some(k), Some(v)) = (k, v) {
                out.push((k, v));
            }
        }
        errors.finish(|| format!("Cannot unstructure as {}", ctx.desc()))?;
        Ok(Value::Map(out))
    }
}

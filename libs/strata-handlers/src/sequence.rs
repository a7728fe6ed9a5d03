use strata_api::{ConversionError, Data, ErrorCollector, PathElem, Value};
use strata_engine::{Context, Handler, Next, Structurer, Unstructurer};

use crate::type_args;

/// `list[T]`: every element converted as `T`, all failing indices reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListHandler;

impl Handler<Structurer> for ListHandler {
    fn handle(
        &self,
        ctx: &Context<'_, Structurer>,
        raw: &Value,
        _next: Next<'_, Structurer>,
    ) -> Result<Data, ConversionError> {
        let Value::Seq(items) = raw else {
            return Err(ConversionError::shape_mismatch(
                "Can only structure a sequence into a list generic",
            ));
        };
        let [elem] = type_args::<1>(ctx.desc())?;

        let mut errors = ErrorCollector::new();
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            if let Some(data) = errors.collect(PathElem::Index(i), ctx.structure_into(elem, item)) {
                out.push(data);
            }
        }
        errors.finish(|| format!("Cannot structure into {}", ctx.desc()))?;
        Ok(Data::List(out))
    }
}

impl Handler<Unstructurer> for ListHandler {
    fn handle(
        &self,
        ctx: &Context<'_, Unstructurer>,
        data: &Data,
        _next: Next<'_, Unstructurer>,
    ) -> Result<Value, ConversionError> {
        let Data::List(items) = data else {
            return Err(ConversionError::shape_mismatch(
                "Can only unstructure a list as a list generic",
            ));
        };
        let [elem] = type_args::<1>(ctx.desc())?;

        let mut errors = ErrorCollector::new();
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let result = ctx.unstructure_as(elem, item);
            if let Some(value) = errors.collect(PathElem::Index(i), result) {
                out.push(value);
            }
        }
        errors.finish(|| format!("Cannot unstructure as {}", ctx.desc()))?;
        Ok(Value::Seq(out))
    }
}

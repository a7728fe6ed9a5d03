use strata_api::{ConversionError, Data, ErrorCollector, PathElem, Value};
use strata_engine::{Context, Handler, Next, Structurer, Unstructurer};

/// `tuple[T1, ..., Tn]`: exact arity, element `i` converted as `Ti`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TupleHandler;

fn check_arity(action: &str, got: usize, need: usize) -> Result<(), ConversionError> {
    if got < need {
        return Err(ConversionError::shape_mismatch(format!(
            "Not enough elements to {action} a tuple: got {got}, need {need}"
        )));
    }
    if got > need {
        return Err(ConversionError::shape_mismatch(format!(
            "Too many elements to {action} a tuple: got {got}, need {need}"
        )));
    }
    Ok(())
}

impl Handler<Structurer> for TupleHandler {
    fn handle(
        &self,
        ctx: &Context<'_, Structurer>,
        raw: &Value,
        _next: Next<'_, Structurer>,
    ) -> Result<Data, ConversionError> {
        let Value::Seq(items) = raw else {
            return Err(ConversionError::shape_mismatch(
                "Can only structure a sequence into a tuple generic",
            ));
        };
        let elem_types = ctx.desc().type_args();
        check_arity("structure into", items.len(), elem_types.len())?;

        let mut errors = ErrorCollector::new();
        let mut out = Vec::with_capacity(items.len());
        for (i, (item, ty)) in items.iter().zip(elem_types).enumerate() {
            if let Some(data) = errors.collect(PathElem::Index(i), ctx.structure_into(ty, item)) {
                out.push(data);
            }
        }
        errors.finish(|| format!("Cannot structure into {}", ctx.desc()))?;
        Ok(Data::Tuple(out))
    }
}

impl Handler<Unstructurer> for TupleHandler {
    fn handle(
        &self,
        ctx: &Context<'_, Unstructurer>,
        data: &Data,
        _next: Next<'_, Unstructurer>,
    ) -> Result<Value, ConversionError> {
        let Data::Tuple(items) = data else {
            return Err(ConversionError::shape_mismatch(
                "Can only unstructure a tuple as a tuple generic",
            ));
        };
        let elem_types = ctx.desc().type_args();
        check_arity("unstructure as", items.len(), elem_types.len())?;

        let mut errors = ErrorCollector::new();
        let mut out = Vec::with_capacity(items.len());
        for (i, (item, ty)) in items.iter().zip(elem_types).enumerate() {
            if let Some(value) = errors.collect(PathElem::Index(i), ctx.unstructure_as(ty, item)) {
                out.push(value);
            }
        }
        errors.finish(|| format!("Cannot unstructure as {}", ctx.desc()))?;
        Ok(Value::Seq(out))
    }
}

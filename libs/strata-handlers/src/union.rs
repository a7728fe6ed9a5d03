use strata_api::{ConversionError, Data, ErrorCollector, PathElem, Value};
use strata_engine::{Context, Handler, Next, Structurer, Unstructurer};

/// `Union[V1, ..., Vn]`: variants tried in declared order, first success wins.
///
/// When every variant fails, each failure is kept under its `<variant>` segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnionHandler;

impl Handler<Structurer> for UnionHandler {
    fn handle(
        &self,
        ctx: &Context<'_, Structurer>,
        raw: &Value,
        _next: Next<'_, Structurer>,
    ) -> Result<Data, ConversionError> {
        let mut errors = ErrorCollector::new();
        for variant in ctx.desc().type_args() {
            match ctx.structure_into(variant, raw) {
                Ok(data) => return Ok(data),
                Err(err) => {
                    tracing::trace!(union = %ctx.desc(), variant = %variant, "variant rejected");
                    errors.push(PathElem::Variant(variant.clone()), err);
                }
            }
        }
        Err(errors.into_error(format!("Cannot structure into {}", ctx.desc())))
    }
}

impl Handler<Unstructurer> for UnionHandler {
    fn handle(
        &self,
        ctx: &Context<'_, Unstructurer>,
        data: &Data,
        _next: Next<'_, Unstructurer>,
    ) -> Result<Value, ConversionError> {
        let mut errors = ErrorCollector::new();
        for variant in ctx.desc().type_args() {
            // Variants the value is not an instance of fail the instance check
            // of `unstructure_as` and are recorded like any other failure.
            match ctx.unstructure_as(variant, data) {
                Ok(value) => return Ok(value),
                Err(err) => errors.push(PathElem::Variant(variant.clone()), err),
            }
        }
        Err(errors.into_error(format!("Cannot unstructure as {}", ctx.desc())))
    }
}

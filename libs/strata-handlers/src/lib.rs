//! Built-in handlers and the standard registries.
//!
//! Every handler here implements both `Handler<Structurer>` and
//! `Handler<Unstructurer>` and only uses the public engine contracts.

pub mod mapping;
pub mod primitive;
pub mod record;
pub mod sequence;
pub mod tuple;
pub mod union;

use strata_api::{ConversionError, Marker, TypeDesc};
use strata_engine::{
    Dispatch, EngineConfig, EngineError, Handler, RegistryBuilder, Structurer, Unstructurer,
};

pub use mapping::DictHandler;
pub use primitive::Primitive;
pub use record::{NamedTupleHandler, RecordHandler};
pub use sequence::ListHandler;
pub use tuple::TupleHandler;
pub use union::UnionHandler;

/// Exactly `N` generic arguments of `desc`.
pub(crate) fn type_args<const N: usize>(
    desc: &TypeDesc,
) -> Result<&[TypeDesc; N], ConversionError> {
    let args = desc.type_args();
    args.try_into().map_err(|_| {
        ConversionError::shape_mismatch(format!(
            "`{desc}` needs {N} type argument(s), got {}",
            args.len()
        ))
    })
}

/// Registry builder with every built-in handler, configured by `config`.
///
/// Further chains can be added before building; a chain registered for a
/// built-in descriptor replaces the built-in one.
pub fn standard_builder<D>(config: &EngineConfig) -> RegistryBuilder<D>
where
    D: Dispatch,
    Primitive: Handler<D>,
    ListHandler: Handler<D>,
    DictHandler: Handler<D>,
    TupleHandler: Handler<D>,
    UnionHandler: Handler<D>,
    RecordHandler: Handler<D>,
    NamedTupleHandler: Handler<D>,
{
    let options = config.records;
    let mut builder = RegistryBuilder::new().delegation(config.dispatch.delegation);
    for primitive in Primitive::ALL {
        builder = builder.handler(primitive.descriptor(), primitive);
    }
    builder
        .handler(TypeDesc::list(), ListHandler)
        .handler(TypeDesc::dict(), DictHandler)
        .handler(TypeDesc::tuple(), TupleHandler)
        .handler(TypeDesc::union(), UnionHandler)
        .handler(TypeDesc::Marker(Marker::StructLike), RecordHandler::new(options))
        .handler(TypeDesc::Marker(Marker::FixedTuple), NamedTupleHandler::new(options))
}

pub fn standard_structurer(config: &EngineConfig) -> Result<Structurer, EngineError> {
    Ok(Structurer::new(standard_builder(config).build()?))
}

pub fn standard_unstructurer(config: &EngineConfig) -> Result<Unstructurer, EngineError> {
    Ok(Unstructurer::new(standard_builder(config).build()?))
}

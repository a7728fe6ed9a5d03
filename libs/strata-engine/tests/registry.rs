use std::sync::Arc;

use strata_api::{ConversionError, Data, TypeDesc, Value};
use strata_engine::{
    Context, Delegation, Handler, HandlerKind, Next, Registry, Structurer, handler_fn,
};

struct Const(i64);

impl Handler<Structurer> for Const {
    fn handle(
        &self,
        _ctx: &Context<'_, Structurer>,
        _raw: &Value,
        _next: Next<'_, Structurer>,
    ) -> Result<Data, ConversionError> {
        Ok(Data::Int(self.0))
    }
}

#[test]
fn resolve_is_exact() {
    let port = TypeDesc::build("Port").base(TypeDesc::int()).finish();
    let registry = Registry::<Structurer>::builder()
        .handler(TypeDesc::int(), Const(1))
        .build()
        .unwrap();
    assert!(registry.resolve(&TypeDesc::int()).is_some());
    assert!(registry.resolve(&port).is_none());
    assert!(registry.contains(&TypeDesc::int()));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.delegation(), Delegation::Chain);
}

#[test]
fn later_registration_replaces_earlier() {
    let structurer = Structurer::new(
        Structurer::builder()
            .handler(TypeDesc::int(), Const(1))
            .handler(TypeDesc::int(), Const(2))
            .build()
            .unwrap(),
    );
    assert_eq!(
        structurer.structure_into(&TypeDesc::int(), &Value::Null).unwrap(),
        Data::Int(2)
    );
}

#[test]
fn wrap_prepends_to_existing_chain() {
    let plus_one = handler_fn(HandlerKind::Deferring, |_, raw, next: Next<'_, Structurer>| {
        match next.run(raw)? {
            Data::Int(i) => Ok(Data::Int(i + 1)),
            other => Ok(other),
        }
    });
    let structurer = Structurer::new(
        Structurer::builder()
            .handler(TypeDesc::int(), Const(1))
            .wrap(TypeDesc::int(), plus_one.clone())
            .wrap(TypeDesc::int(), plus_one)
            .build()
            .unwrap(),
    );
    assert_eq!(
        structurer.structure_into(&TypeDesc::int(), &Value::Null).unwrap(),
        Data::Int(3)
    );
}

#[test]
fn from_chains_validates_each_entry() {
    let ok: Vec<Arc<dyn Handler<Structurer>>> = vec![Arc::new(Const(1))];
    let err = Registry::<Structurer>::from_chains(
        [(TypeDesc::int(), ok), (TypeDesc::str(), Vec::new())],
        Delegation::Chain,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "invalid handler chain for 'str': empty handler chain");
}

#[test]
fn debug_lists_descriptors() {
    let registry = Structurer::builder()
        .handler(TypeDesc::str(), Const(0))
        .handler(TypeDesc::int(), Const(0))
        .build()
        .unwrap();
    assert_eq!(
        format!("{registry:?}"),
        "Registry { descriptors: [\"int\", \"str\"], delegation: Chain }"
    );
}

use strata_api::{FieldDef, TypeDesc, Value};
use strata_engine::EngineConfig;
use strata_handlers::standard_structurer;

#[test]
fn error_tree_renders_every_failure() {
    let inner = TypeDesc::record(
        "Inner",
        vec![
            FieldDef::new("d", TypeDesc::dict_of(TypeDesc::int(), TypeDesc::str())),
            FieldDef::new("l", TypeDesc::list_of(TypeDesc::int())),
        ],
    );
    let outer = TypeDesc::record(
        "Outer",
        vec![
            FieldDef::new("x", TypeDesc::int()),
            FieldDef::new("y", inner),
        ],
    );
    let raw = Value::map([
        ("x", Value::from("a")),
        (
            "y",
            Value::map([
                (
                    "d",
                    Value::Map(vec![
                        (Value::from("a"), Value::from("b")),
                        (Value::Int(1), Value::Int(2)),
                    ]),
                ),
                ("l", Value::Seq(vec![Value::Int(1), Value::from("a")])),
            ]),
        ),
    ]);

    let structurer = standard_structurer(&EngineConfig::default()).unwrap();
    let err = structurer.structure_into(&outer, &raw).unwrap_err();
    let expected = "Failed to structure a mapping into Outer
  x: The value must be an integer
  y: Failed to structure a mapping into Inner
    y.d: Cannot structure into dict[int, str]
      y.d.key(a): The value must be an integer
      y.d.1: The value must be a string
    y.l: Cannot structure into list[int]
      y.l[1]: The value must be an integer";
    assert_eq!(err.to_string(), expected);
}

#[test]
fn nested_lookup_failure_is_collected() {
    let structurer = standard_structurer(&EngineConfig::default()).unwrap();
    let opaque = TypeDesc::build("Opaque").finish();
    let desc = TypeDesc::list_of(opaque);
    let err = structurer
        .structure_into(&desc, &Value::Seq(vec![Value::Null]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot structure into list[Opaque]
  [0]: No handlers registered to structure into `Opaque`"
    );
}

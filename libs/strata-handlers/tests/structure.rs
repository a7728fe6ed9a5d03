use pretty_assertions::assert_eq;
use strata_api::{Data, ErrorKind, FieldDef, PathElem, RecordData, TypeDesc, Value};
use strata_engine::{EngineConfig, RecordLayout, Structurer, UnknownFields};
use strata_handlers::standard_structurer;

fn structurer() -> Structurer {
    standard_structurer(&EngineConfig::default()).unwrap()
}

fn with_records(f: impl FnOnce(&mut EngineConfig)) -> Structurer {
    let mut config = EngineConfig::default();
    f(&mut config);
    standard_structurer(&config).unwrap()
}

fn point() -> TypeDesc {
    TypeDesc::record(
        "Point",
        vec![
            FieldDef::new("x", TypeDesc::int()),
            FieldDef::new("y", TypeDesc::str()),
        ],
    )
}

fn segments(err: &strata_api::ConversionError) -> Vec<String> {
    err.children().iter().map(|(p, _)| p.to_string()).collect()
}

#[test]
fn primitives() {
    let s = structurer();
    assert_eq!(s.structure_into(&TypeDesc::none(), &Value::Null).unwrap(), Data::None);
    assert_eq!(s.structure_into(&TypeDesc::float(), &Value::Int(1)).unwrap(), Data::Float(1.0));
    assert_eq!(
        s.structure_into(&TypeDesc::bytes(), &Value::Bytes(vec![1, 2])).unwrap(),
        Data::Bytes(vec![1, 2])
    );

    let err = s.structure_into(&TypeDesc::int(), &Value::Bool(true)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    assert_eq!(err.message(), "The value must be an integer");

    let err = s.structure_into(&TypeDesc::none(), &Value::Int(0)).unwrap_err();
    assert_eq!(err.message(), "The value must be `None`");
}

#[test]
fn list_collects_every_failing_index() {
    let ints = TypeDesc::list_of(TypeDesc::int());
    let raw = Value::Seq(vec![Value::from("a"), Value::Int(1), Value::Null]);
    let err = structurer().structure_into(&ints, &raw).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Aggregate);
    assert_eq!(err.message(), "Cannot structure into list[int]");
    assert_eq!(segments(&err), ["[0]", "[2]"]);
}

#[test]
fn list_requires_a_sequence() {
    let ints = TypeDesc::list_of(TypeDesc::int());
    let err = structurer().structure_into(&ints, &Value::Int(1)).unwrap_err();
    assert_eq!(err.message(), "Can only structure a sequence into a list generic");

    let err = structurer().structure_into(&TypeDesc::list(), &Value::Seq(vec![])).unwrap_err();
    assert_eq!(err.message(), "`list` needs 1 type argument(s), got 0");
}

#[test]
fn dict_reports_keys_and_values_separately() {
    let desc = TypeDesc::dict_of(TypeDesc::int(), TypeDesc::str());
    let raw = Value::Map(vec![
        (Value::from("a"), Value::from("b")),
        (Value::Int(1), Value::Int(2)),
        (Value::Int(3), Value::from("ok")),
    ]);
    let err = structurer().structure_into(&desc, &raw).unwrap_err();
    assert_eq!(segments(&err), ["key(a)", "1"]);
    assert_eq!(
        err.child(&PathElem::Key(Value::from("a"))).unwrap().message(),
        "The value must be an integer"
    );
    assert_eq!(
        err.child(&PathElem::Entry(Value::Int(1))).unwrap().message(),
        "The value must be a string"
    );
}

#[test]
fn dict_keeps_entry_order() {
    let desc = TypeDesc::dict_of(TypeDesc::str(), TypeDesc::int());
    let raw = Value::map([("b", Value::Int(2)), ("a", Value::Int(1))]);
    assert_eq!(
        structurer().structure_into(&desc, &raw).unwrap(),
        Data::Dict(vec![
            (Data::from("b"), Data::Int(2)),
            (Data::from("a"), Data::Int(1)),
        ])
    );
}

#[test]
fn tuple_arity_and_elements() {
    let desc = TypeDesc::tuple_of(vec![TypeDesc::int(), TypeDesc::str()]);
    let s = structurer();
    assert_eq!(
        s.structure_into(&desc, &Value::Seq(vec![Value::Int(1), Value::from("a")])).unwrap(),
        Data::Tuple(vec![Data::Int(1), Data::from("a")])
    );

    let err = s.structure_into(&desc, &Value::Seq(vec![Value::Int(1)])).unwrap_err();
    assert_eq!(err.message(), "Not enough elements to structure into a tuple: got 1, need 2");

    let three = Value::Seq(vec![Value::Int(1), Value::from("a"), Value::Null]);
    let err = s.structure_into(&desc, &three).unwrap_err();
    assert_eq!(err.message(), "Too many elements to structure into a tuple: got 3, need 2");

    let err = s
        .structure_into(&desc, &Value::Seq(vec![Value::from("a"), Value::Int(1)]))
        .unwrap_err();
    assert_eq!(segments(&err), ["[0]", "[1]"]);
}

#[test]
fn union_tries_every_variant() {
    let desc = TypeDesc::union_of(vec![TypeDesc::int(), TypeDesc::str()]);
    let s = structurer();
    assert_eq!(s.structure_into(&desc, &Value::from("a")).unwrap(), Data::from("a"));

    let err = s.structure_into(&desc, &Value::Null).unwrap_err();
    assert_eq!(err.message(), "Cannot structure into Union[int, str]");
    assert_eq!(segments(&err), ["<int>", "<str>"]);
    assert_eq!(
        err.child(&PathElem::Variant(TypeDesc::int())).unwrap().message(),
        "The value must be an integer"
    );
    assert_eq!(
        err.child(&PathElem::Variant(TypeDesc::str())).unwrap().message(),
        "The value must be a string"
    );
}

#[test]
fn optional_accepts_null() {
    let desc = TypeDesc::optional(TypeDesc::int());
    assert_eq!(structurer().structure_into(&desc, &Value::Null).unwrap(), Data::None);
    assert_eq!(structurer().structure_into(&desc, &Value::Int(4)).unwrap(), Data::Int(4));
}

#[test]
fn record_from_mapping() {
    let raw = Value::map([("x", Value::Int(1)), ("y", Value::from("a"))]);
    assert_eq!(
        structurer().structure_into(&point(), &raw).unwrap(),
        Data::Record(RecordData::new(
            point(),
            vec![("x".into(), Data::Int(1)), ("y".into(), Data::from("a"))]
        ))
    );
}

#[test]
fn missing_field_differs_from_wrong_field() {
    let s = structurer();
    let y = PathElem::Field("y".into());

    let err = s.structure_into(&point(), &Value::map([("x", Value::Int(1))])).unwrap_err();
    assert_eq!(err.message(), "Failed to structure a mapping into Point");
    let missing = err.child(&y).unwrap();
    assert!(missing.is_shape_mismatch());
    assert_eq!(missing.kind(), ErrorKind::MissingField);
    assert_eq!(missing.message(), "Missing field");

    let raw = Value::map([("x", Value::Int(1)), ("y", Value::Int(2))]);
    let err = s.structure_into(&point(), &raw).unwrap_err();
    let wrong = err.child(&y).unwrap();
    assert_eq!(wrong.kind(), ErrorKind::ShapeMismatch);
    assert_eq!(wrong.message(), "The value must be a string");
}

#[test]
fn record_defaults_fill_missing_fields() {
    let desc = TypeDesc::record(
        "Config",
        vec![
            FieldDef::new("host", TypeDesc::str()),
            FieldDef::new("port", TypeDesc::int()).with_default(8080i64),
        ],
    );
    let raw = Value::map([("host", Value::from("localhost"))]);

    let data = structurer().structure_into(&desc, &raw).unwrap();
    assert_eq!(data.as_record().unwrap().get("port"), Some(&Data::Int(8080)));

    let strict = with_records(|c| c.records.fill_defaults = false);
    let err = strict.structure_into(&desc, &raw).unwrap_err();
    assert_eq!(segments(&err), ["port"]);
}

#[test]
fn unknown_fields_policy() {
    let raw = Value::map([
        ("x", Value::Int(1)),
        ("y", Value::from("a")),
        ("z", Value::Null),
    ]);
    assert!(structurer().structure_into(&point(), &raw).is_ok());

    let strict = with_records(|c| c.records.unknown_fields = UnknownFields::Reject);
    let err = strict.structure_into(&point(), &raw).unwrap_err();
    assert_eq!(segments(&err), ["z"]);
    assert_eq!(err.children()[0].1.message(), "Unexpected field");
}

#[test]
fn renamed_fields_are_read_by_external_name() {
    let desc = TypeDesc::record(
        "Event",
        vec![FieldDef::new("created_at", TypeDesc::int()).renamed("ts")],
    );
    let s = structurer();
    let data = s.structure_into(&desc, &Value::map([("ts", Value::Int(5))])).unwrap();
    assert_eq!(data.as_record().unwrap().get("created_at"), Some(&Data::Int(5)));

    let err = s.structure_into(&desc, &Value::map([("created_at", Value::Int(5))])).unwrap_err();
    assert_eq!(
        err.child(&PathElem::Field("created_at".into())).unwrap().message(),
        "Missing field (`ts` in the input)"
    );
}

#[test]
fn record_from_sequence_layout() {
    let s = with_records(|c| c.records.layout = RecordLayout::Sequence);
    let data = s
        .structure_into(&point(), &Value::Seq(vec![Value::Int(1), Value::from("a")]))
        .unwrap();
    assert_eq!(data.as_record().unwrap().get("y"), Some(&Data::from("a")));

    let err = s.structure_into(&point(), &Value::Seq(vec![Value::Int(1)])).unwrap_err();
    assert_eq!(err.message(), "Failed to structure a sequence into Point");
    assert_eq!(segments(&err), ["y"]);

    let err = s
        .structure_into(&point(), &Value::map([("x", Value::Int(1))]))
        .unwrap_err();
    assert_eq!(err.message(), "Can only structure a sequence into Point");
}

#[test]
fn named_tuple_from_sequence_or_mapping() {
    let pair = TypeDesc::named_tuple(
        "Pair",
        vec![
            FieldDef::new("left", TypeDesc::int()),
            FieldDef::new("right", TypeDesc::int()).with_default(0i64),
        ],
    );
    let s = structurer();
    let from_seq = s.structure_into(&pair, &Value::Seq(vec![Value::Int(1)])).unwrap();
    let from_map = s.structure_into(&pair, &Value::map([("left", Value::Int(1))])).unwrap();
    assert_eq!(from_seq, from_map);
    assert_eq!(from_seq.as_record().unwrap().get("right"), Some(&Data::Int(0)));

    let err = s
        .structure_into(&pair, &Value::Seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)]))
        .unwrap_err();
    assert_eq!(err.message(), "Too many fields to structure into Pair: got 3, need at most 2");
}

#[test]
fn subtype_without_own_fields_uses_inherited_ones() {
    let labelled = TypeDesc::build("LabelledPoint").base(point()).finish();
    let raw = Value::map([("x", Value::Int(1)), ("y", Value::from("a"))]);
    let data = structurer().structure_into(&labelled, &raw).unwrap();
    assert_eq!(data.as_record().unwrap().ty(), &labelled);
}

#[test]
fn alias_of_record_structures_target() {
    let location = TypeDesc::alias("Location", point());
    let raw = Value::map([("x", Value::Int(1)), ("y", Value::from("a"))]);
    let data = structurer().structure_into(&location, &raw).unwrap();
    assert_eq!(data.as_record().unwrap().ty(), &point());
}

use pretty_assertions::assert_eq;
use strata_api::{Data, ErrorKind, PathElem, RecordData, Typed, TypeDesc};

#[derive(Typed, Debug, PartialEq)]
#[strata(name = "User")]
struct User {
    name: String,

    #[strata(default)]
    admin: bool,

    #[strata(rename = "e-mail")]
    email: Option<String>,
}

#[test]
fn descriptor_is_cached_and_named() {
    assert_eq!(User::descriptor(), User::descriptor());
    assert_eq!(User::descriptor().to_string(), "User");
    assert_eq!(
        User::descriptor().fields().unwrap()[2].rename(),
        Some("e-mail")
    );
    assert_eq!(User::descriptor().fields().unwrap()[1].default, Some(Data::Bool(false)));
}

#[test]
fn to_data_keeps_declaration_order() {
    let user = User {
        name: "ann".into(),
        admin: true,
        email: None,
    };
    let data = user.to_data();
    let record = data.as_record().unwrap();
    assert_eq!(record.ty(), &User::descriptor());
    let names: Vec<_> = record.fields().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["name", "admin", "email"]);
    assert_eq!(User::from_data(data).unwrap(), user);
}

#[test]
fn from_data_collects_every_field() {
    let data = Data::Record(RecordData::new(
        User::descriptor(),
        vec![("admin".into(), Data::Int(1))],
    ));
    let err = User::from_data(data).unwrap_err();
    assert_eq!(err.message(), "Cannot convert into `User`");
    let segments: Vec<_> = err.children().iter().map(|(p, _)| p.clone()).collect();
    assert_eq!(
        segments,
        [
            PathElem::Field("name".into()),
            PathElem::Field("admin".into()),
            PathElem::Field("email".into()),
        ]
    );
    assert_eq!(err.children()[0].1.kind(), ErrorKind::MissingField);
}

#[test]
fn from_data_rejects_other_records() {
    let other = TypeDesc::record("Group", vec![]);
    let err = User::from_data(Data::Record(RecordData::new(other, vec![]))).unwrap_err();
    assert_eq!(err.message(), "Expected a value of type `User`, got `record`");
}

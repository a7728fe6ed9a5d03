use crate::descriptor::TypeDesc;
use crate::value::Value;

/// Typed in-memory value.
///
/// The shape is checked against a [`TypeDesc`] by
/// [`TypeDesc::is_instance_of`]. Rust types enter and leave this model
/// through [`crate::typed::Typed`].
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Data>),
    Tuple(Vec<Data>),
    /// Ordered key-value pairs.
    Dict(Vec<(Data, Data)>),
    Record(RecordData),
}

impl Data {
    /// Short name of the value's shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Data::None => "none",
            Data::Bool(_) => "bool",
            Data::Int(_) => "int",
            Data::Float(_) => "float",
            Data::Str(_) => "str",
            Data::Bytes(_) => "bytes",
            Data::List(_) => "list",
            Data::Tuple(_) => "tuple",
            Data::Dict(_) => "dict",
            Data::Record(_) => "record",
        }
    }

    /// Label for this value as a mapping key in error paths. Scalars keep
    /// their value, anything else shows its kind.
    pub fn path_label(&self) -> Value {
        match self {
            Data::None => Value::Null,
            Data::Bool(b) => Value::Bool(*b),
            Data::Int(i) => Value::Int(*i),
            Data::Float(x) => Value::Float(*x),
            Data::Str(s) => Value::Str(s.clone()),
            Data::Bytes(b) => Value::Bytes(b.clone()),
            other => Value::Str(format!("<{}>", other.kind_name())),
        }
    }

    pub fn as_record(&self) -> Option<&RecordData> {
        match self {
            Data::Record(r) => Some(r),
            _ => None,
        }
    }
}

/// Instance of a record or named-tuple type.
///
/// `ty` is the concrete type, never an alias. Fields are kept in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordData {
    ty: TypeDesc,
    fields: Vec<(String, Data)>,
}

impl RecordData {
    pub fn new(ty: TypeDesc, fields: Vec<(String, Data)>) -> Self {
        Self { ty, fields }
    }

    pub fn ty(&self) -> &TypeDesc {
        &self.ty
    }

    pub fn fields(&self) -> &[(String, Data)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Data> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Remove a field by name, for consuming conversions.
    pub fn take(&mut self, name: &str) -> Option<Data> {
        let pos = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(pos).1)
    }

    pub fn into_fields(self) -> Vec<(String, Data)> {
        self.fields
    }
}

impl From<bool> for Data {
    fn from(b: bool) -> Self {
        Data::Bool(b)
    }
}

impl From<i64> for Data {
    fn from(i: i64) -> Self {
        Data::Int(i)
    }
}

impl From<f64> for Data {
    fn from(x: f64) -> Self {
        Data::Float(x)
    }
}

impl From<&str> for Data {
    fn from(s: &str) -> Self {
        Data::Str(s.to_string())
    }
}

impl From<String> for Data {
    fn from(s: String) -> Self {
        Data::Str(s)
    }
}

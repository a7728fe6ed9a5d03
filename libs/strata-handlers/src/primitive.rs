use strata_api::{ConversionError, Data, TypeDesc, Value};
use strata_engine::{Context, Handler, Next, Structurer, Unstructurer};

/// Scalar types that map one-to-one between the two representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    None,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
}

impl Primitive {
    pub const ALL: [Primitive; 6] = [
        Primitive::None,
        Primitive::Bool,
        Primitive::Int,
        Primitive::Float,
        Primitive::Str,
        Primitive::Bytes,
    ];

    pub fn descriptor(self) -> TypeDesc {
        match self {
            Primitive::None => TypeDesc::none(),
            Primitive::Bool => TypeDesc::bool(),
            Primitive::Int => TypeDesc::int(),
            Primitive::Float => TypeDesc::float(),
            Primitive::Str => TypeDesc::str(),
            Primitive::Bytes => TypeDesc::bytes(),
        }
    }

    fn expected(self) -> &'static str {
        match self {
            Primitive::None => "`None`",
            Primitive::Bool => "a boolean",
            Primitive::Int => "an integer",
            Primitive::Float => "a floating-point number",
            Primitive::Str => "a string",
            Primitive::Bytes => "a bytestring",
        }
    }

    fn structure(self, raw: &Value) -> Option<Data> {
        match (self, raw) {
            (Primitive::None, Value::Null) => Some(Data::None),
            (Primitive::Bool, Value::Bool(b)) => Some(Data::Bool(*b)),
            (Primitive::Int, Value::Int(i)) => Some(Data::Int(*i)),
            (Primitive::Float, Value::Float(x)) => Some(Data::Float(*x)),
            (Primitive::Float, Value::Int(i)) => Some(Data::Float(*i as f64)),
            (Primitive::Str, Value::Str(s)) => Some(Data::Str(s.clone())),
            (Primitive::Bytes, Value::Bytes(b)) => Some(Data::Bytes(b.clone())),
            _ => None,
        }
    }

    fn unstructure(self, data: &Data) -> Option<Value> {
        match (self, data) {
            (Primitive::None, Data::None) => Some(Value::Null),
            (Primitive::Bool, Data::Bool(b)) => Some(Value::Bool(*b)),
            (Primitive::Int, Data::Int(i)) => Some(Value::Int(*i)),
            (Primitive::Float, Data::Float(x)) => Some(Value::Float(*x)),
            (Primitive::Str, Data::Str(s)) => Some(Value::Str(s.clone())),
            (Primitive::Bytes, Data::Bytes(b)) => Some(Value::Bytes(b.clone())),
            _ => None,
        }
    }
}

impl Handler<Structurer> for Primitive {
    fn handle(
        &self,
        _ctx: &Context<'_, Structurer>,
        raw: &Value,
        _next: Next<'_, Structurer>,
    ) -> Result<Data, ConversionError> {
        self.structure(raw).ok_or_else(|| {
            ConversionError::shape_mismatch(format!("The value must be {}", self.expected()))
        })
    }
}

impl Handler<Unstructurer> for Primitive {
    fn handle(
        &self,
        _ctx: &Context<'_, Unstructurer>,
        data: &Data,
        _next: Next<'_, Unstructurer>,
    ) -> Result<Value, ConversionError> {
        self.unstructure(data).ok_or_else(|| {
            ConversionError::shape_mismatch(format!(
                "The value must be of type `{}`",
                self.descriptor()
            ))
        })
    }
}

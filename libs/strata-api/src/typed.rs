//! Bridge between Rust types and the dynamic [`Data`] model.

use std::collections::BTreeMap;

use crate::data::{Data, RecordData};
use crate::descriptor::TypeDesc;
use crate::error::{ConversionError, ErrorCollector};
use crate::path::PathElem;
use crate::value::Value;

/// A Rust type with a descriptor and a lossless mapping to [`Data`].
///
/// Derivable for structs with named fields via `#[derive(Typed)]`.
pub trait Typed: Sized {
    fn descriptor() -> TypeDesc;
    fn to_data(&self) -> Data;
    fn from_data(data: Data) -> Result<Self, ConversionError>;
}

fn unexpected(desc: &TypeDesc, data: &Data) -> ConversionError {
    ConversionError::shape_mismatch(format!(
        "Expected a value of type `{desc}`, got `{}`",
        data.kind_name()
    ))
}

/// Unwrap a record of exactly type `desc`.
pub fn expect_record(data: Data, desc: &TypeDesc) -> Result<RecordData, ConversionError> {
    match data {
        Data::Record(record) if record.ty() == desc => Ok(record),
        other => Err(unexpected(desc, &other)),
    }
}

/// Remove field `name` from `record` and convert it.
pub fn take_field<T: Typed>(record: &mut RecordData, name: &str) -> Result<T, ConversionError> {
    match record.take(name) {
        Some(data) => T::from_data(data),
        None => Err(ConversionError::missing_field("Missing field")),
    }
}

fn element<T: Typed>(errors: &mut ErrorCollector, i: usize, item: Option<Data>) -> Option<T> {
    errors.collect(PathElem::Index(i), T::from_data(item?))
}

fn cannot_convert(desc: &TypeDesc) -> String {
    format!("Cannot convert into `{desc}`")
}

macro_rules! scalar_typed {
    ($ty:ty, $desc:ident, $variant:ident) => {
        impl Typed for $ty {
            fn descriptor() -> TypeDesc {
                TypeDesc::$desc()
            }

            fn to_data(&self) -> Data {
                Data::$variant(self.clone())
            }

            fn from_data(data: Data) -> Result<Self, ConversionError> {
                match data {
                    Data::$variant(v) => Ok(v),
                    other => Err(unexpected(&Self::descriptor(), &other)),
                }
            }
        }
    };
}

scalar_typed!(bool, bool, Bool);
scalar_typed!(i64, int, Int);
scalar_typed!(f64, float, Float);
scalar_typed!(String, str, Str);

impl<T: Typed> Typed for Vec<T> {
    fn descriptor() -> TypeDesc {
        TypeDesc::list_of(T::descriptor())
    }

    fn to_data(&self) -> Data {
        Data::List(self.iter().map(T::to_data).collect())
    }

    fn from_data(data: Data) -> Result<Self, ConversionError> {
        let Data::List(items) = data else {
            return Err(unexpected(&Self::descriptor(), &data));
        };
        let mut errors = ErrorCollector::new();
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            if let Some(v) = errors.collect(PathElem::Index(i), T::from_data(item)) {
                out.push(v);
            }
        }
        errors.finish(|| cannot_convert(&Self::descriptor()))?;
        Ok(out)
    }
}

impl<T: Typed> Typed for Option<T> {
    fn descriptor() -> TypeDesc {
        TypeDesc::optional(T::descriptor())
    }

    fn to_data(&self) -> Data {
        match self {
            Some(v) => v.to_data(),
            None => Data::None,
        }
    }

    fn from_data(data: Data) -> Result<Self, ConversionError> {
        match data {
            Data::None => Ok(None),
            other => T::from_data(other).map(Some),
        }
    }
}

impl<V: Typed> Typed for BTreeMap<String, V> {
    fn descriptor() -> TypeDesc {
        TypeDesc::dict_of(TypeDesc::str(), V::descriptor())
    }

    fn to_data(&self) -> Data {
        Data::Dict(
            self.iter()
                .map(|(k, v)| (Data::Str(k.clone()), v.to_data()))
                .collect(),
        )
    }

    fn from_data(data: Data) -> Result<Self, ConversionError> {
        let Data::Dict(entries) = data else {
            return Err(unexpected(&Self::descriptor(), &data));
        };
        let mut errors = ErrorCollector::new();
        let mut out = BTreeMap::new();
        for (key, value) in entries {
            let Data::Str(key) = key else {
                errors.push(
                    PathElem::Key(key.path_label()),
                    ConversionError::shape_mismatch("Mapping keys must be strings"),
                );
                continue;
            };
            let segment = PathElem::Entry(Value::Str(key.clone()));
            if let Some(v) = errors.collect(segment, V::from_data(value)) {
                out.insert(key, v);
            }
        }
        errors.finish(|| cannot_convert(&Self::descriptor()))?;
        Ok(out)
    }
}

impl<A: Typed, B: Typed> Typed for (A, B) {
    fn descriptor() -> TypeDesc {
        TypeDesc::tuple_of(vec![A::descriptor(), B::descriptor()])
    }

    fn to_data(&self) -> Data {
        Data::Tuple(vec![self.0.to_data(), self.1.to_data()])
    }

    fn from_data(data: Data) -> Result<Self, ConversionError> {
        match data {
            Data::Tuple(items) if items.len() == 2 => {
                let mut items = items.into_iter();
                let mut errors = ErrorCollector::new();
                let a = element::<A>(&mut errors, 0, items.next());
                let b = element::<B>(&mut errors, 1, items.next());
                match (a, b) {
                    (Some(a), Some(b)) => Ok((a, b)),
                    _ => Err(errors.into_error(cannot_convert(&Self::descriptor()))),
                }
            }
            other => Err(unexpected(&Self::descriptor(), &other)),
        }
    }
}

impl<A: Typed, B: Typed, C: Typed> Typed for (A, B, C) {
    fn descriptor() -> TypeDesc {
        TypeDesc::tuple_of(vec![A::descriptor(), B::descriptor(), C::descriptor()])
    }

    fn to_data(&self) -> Data {
        Data::Tuple(vec![self.0.to_data(), self.1.to_data(), self.2.to_data()])
    }

    fn from_data(data: Data) -> Result<Self, ConversionError> {
        match data {
            Data::Tuple(items) if items.len() == 3 => {
                let mut items = items.into_iter();
                let mut errors = ErrorCollector::new();
                let a = element::<A>(&mut errors, 0, items.next());
                let b = element::<B>(&mut errors, 1, items.next());
                let c = element::<C>(&mut errors, 2, items.next());
                match (a, b, c) {
                    (Some(a), Some(b), Some(c)) => Ok((a, b, c)),
                    _ => Err(errors.into_error(cannot_convert(&Self::descriptor()))),
                }
            }
            other => Err(unexpected(&Self::descriptor(), &other)),
        }
    }
}

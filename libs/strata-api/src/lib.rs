pub mod data;
pub mod descriptor;
pub mod error;
pub mod field;
pub mod path;
pub mod typed;
pub mod value;

pub use strata_api_derive::Typed;

pub use data::{Data, RecordData};
pub use descriptor::{Marker, Shape, TypeDesc};
pub use error::{ConversionError, ErrorCollector, ErrorKind};
pub use field::FieldDef;
pub use path::PathElem;
pub use typed::Typed;
pub use value::Value;

//! Conversion engine: handler registries, lookup-order dispatch and the
//! handler chain protocol, in both directions.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod structurer;
pub mod unstructurer;

pub use config::{
    Delegation, DispatchConfig, EngineConfig, FieldNaming, OmitDefaults, RecordLayout,
    RecordOptions, UnknownFields,
};
pub use dispatch::{Context, Dispatch, Handler, HandlerKind, Next, handler_fn};
pub use error::EngineError;
pub use registry::{Registry, RegistryBuilder};
pub use structurer::Structurer;
pub use unstructurer::Unstructurer;

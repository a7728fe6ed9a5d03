use strata_api::{ConversionError, Data, TypeDesc, Typed, Value};

use crate::dispatch::{Context, Dispatch, run_chain};
use crate::registry::{Registry, RegistryBuilder};

/// Converts typed data into intermediate values, driven by a source descriptor.
#[derive(Debug)]
pub struct Unstructurer {
    registry: Registry<Unstructurer>,
}

impl Unstructurer {
    pub fn new(registry: Registry<Unstructurer>) -> Self {
        Self { registry }
    }

    pub fn builder() -> RegistryBuilder<Unstructurer> {
        RegistryBuilder::new()
    }

    /// Unstructure `data` as a value of type `desc`.
    ///
    /// `desc` must be compatible with the shape of `data`. Aliases and generic
    /// arguments cannot be recovered from the value, so the caller names them.
    pub fn unstructure_as(&self, desc: &TypeDesc, data: &Data) -> Result<Value, ConversionError> {
        if !desc.is_instance_of(data) {
            return Err(ConversionError::shape_mismatch(format!(
                "The value must be of type `{}`",
                desc.resolve_alias()
            )));
        }
        run_chain(self, desc, data)
    }

    /// Unstructure a Rust value through its [`Typed`] descriptor.
    pub fn unstructure<T: Typed>(&self, value: &T) -> Result<Value, ConversionError> {
        self.unstructure_as(&T::descriptor(), &value.to_data())
    }
}

impl Dispatch for Unstructurer {
    type Input = Data;
    type Output = Value;

    const ACTION: &'static str = "unstructure as";

    fn registry(&self) -> &Registry<Self> {
        &self.registry
    }

    fn convert(&self, desc: &TypeDesc, input: &Data) -> Result<Value, ConversionError> {
        self.unstructure_as(desc, input)
    }
}

impl Context<'_, Unstructurer> {
    pub fn unstructure_as(&self, desc: &TypeDesc, data: &Data) -> Result<Value, ConversionError> {
        self.dispatcher().unstructure_as(desc, data)
    }
}

use strata_api::{ConversionError, Data, TypeDesc, Typed, Value};

use crate::dispatch::{Context, Dispatch, run_chain};
use crate::registry::{Registry, RegistryBuilder};

/// Converts intermediate values into typed data, driven by a target descriptor.
#[derive(Debug)]
pub struct Structurer {
    registry: Registry<Structurer>,
}

impl Structurer {
    pub fn new(registry: Registry<Structurer>) -> Self {
        Self { registry }
    }

    pub fn builder() -> RegistryBuilder<Structurer> {
        RegistryBuilder::new()
    }

    /// Structure `raw` into a value of type `desc`.
    pub fn structure_into(&self, desc: &TypeDesc, raw: &Value) -> Result<Data, ConversionError> {
        let data = run_chain(self, desc, raw)?;
        if !desc.is_instance_of(&data) {
            return Err(ConversionError::shape_mismatch(format!(
                "Handler for `{desc}` produced a `{}` value",
                data.kind_name()
            )));
        }
        Ok(data)
    }

    /// Structure `raw` into a Rust value through its [`Typed`] descriptor.
    pub fn structure<T: Typed>(&self, raw: &Value) -> Result<T, ConversionError> {
        let data = self.structure_into(&T::descriptor(), raw)?;
        T::from_data(data)
    }
}

impl Dispatch for Structurer {
    type Input = Value;
    type Output = Data;

    const ACTION: &'static str = "structure into";

    fn registry(&self) -> &Registry<Self> {
        &self.registry
    }

    fn convert(&self, desc: &TypeDesc, input: &Value) -> Result<Data, ConversionError> {
        self.structure_into(desc, input)
    }
}

impl Context<'_, Structurer> {
    pub fn structure_into(&self, desc: &TypeDesc, raw: &Value) -> Result<Data, ConversionError> {
        self.dispatcher().structure_into(desc, raw)
    }
}

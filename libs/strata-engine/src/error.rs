use strata_api::TypeDesc;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A handler chain failed validation while building a registry.
    #[error("invalid handler chain for '{descriptor}': {reason}")]
    Registry { descriptor: TypeDesc, reason: String },

    #[error("config error: {0}")]
    Config(String),
}

impl EngineError {
    pub(crate) fn registry(descriptor: &TypeDesc, reason: impl Into<String>) -> Self {
        EngineError::Registry {
            descriptor: descriptor.clone(),
            reason: reason.into(),
        }
    }

    /// Add context to the error.
    ///
    /// For `Registry`, context is prepended to the reason.
    /// For `Config`, context is prepended to the message.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            EngineError::Registry { descriptor, reason } => EngineError::Registry {
                descriptor,
                reason: format!("{ctx}: {reason}"),
            },
            EngineError::Config(msg) => EngineError::Config(format!("{ctx}: {msg}")),
        }
    }
}

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use strata_api::TypeDesc;

use crate::config::Delegation;
use crate::dispatch::{Dispatch, Handler, HandlerKind};
use crate::error::EngineError;

/// Immutable map from descriptor to handler chain.
///
/// Built once through [`RegistryBuilder`]; every chain is validated against
/// the delegation policy at that point and never changes afterwards.
pub struct Registry<D: Dispatch> {
    chains: HashMap<TypeDesc, Vec<Arc<dyn Handler<D>>>>,
    delegation: Delegation,
}

impl<D: Dispatch> fmt::Debug for Registry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut descriptors: Vec<String> = self.chains.keys().map(TypeDesc::name).collect();
        descriptors.sort();
        f.debug_struct("Registry")
            .field("descriptors", &descriptors)
            .field("delegation", &self.delegation)
            .finish()
    }
}

impl<D: Dispatch> Registry<D> {
    pub fn builder() -> RegistryBuilder<D> {
        RegistryBuilder::new()
    }

    /// Build from a descriptor → chain mapping, validating every chain.
    pub fn from_chains(
        chains: impl IntoIterator<Item = (TypeDesc, Vec<Arc<dyn Handler<D>>>)>,
        delegation: Delegation,
    ) -> Result<Self, EngineError> {
        let mut map = HashMap::new();
        for (desc, chain) in chains {
            validate(&desc, &chain, delegation)?;
            if map.insert(desc.clone(), chain).is_some() {
                tracing::debug!(descriptor = %desc, "replaced handler chain");
            }
        }
        tracing::debug!(chains = map.len(), delegation = ?delegation, "handler registry built");
        Ok(Self {
            chains: map,
            delegation,
        })
    }

    /// Chain registered directly under `desc`. Ancestors are not consulted.
    pub fn resolve(&self, desc: &TypeDesc) -> Option<&[Arc<dyn Handler<D>>]> {
        self.chains.get(desc).map(Vec::as_slice)
    }

    pub fn contains(&self, desc: &TypeDesc) -> bool {
        self.chains.contains_key(desc)
    }

    pub fn delegation(&self) -> Delegation {
        self.delegation
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

fn validate<D: Dispatch>(
    desc: &TypeDesc,
    chain: &[Arc<dyn Handler<D>>],
    delegation: Delegation,
) -> Result<(), EngineError> {
    let Some((last, init)) = chain.split_last() else {
        return Err(EngineError::registry(desc, "empty handler chain"));
    };
    if let Some(pos) = init.iter().position(|h| h.kind() == HandlerKind::Terminal) {
        return Err(EngineError::registry(
            desc,
            format!(
                "terminal handler at position {pos} leaves {} handler(s) unreachable",
                chain.len() - pos - 1
            ),
        ));
    }
    if delegation == Delegation::Chain && last.kind() == HandlerKind::Deferring {
        return Err(EngineError::registry(
            desc,
            "chain ends in a deferring handler",
        ));
    }
    Ok(())
}

/// Collects handler chains before validation.
///
/// Registering a descriptor twice keeps the later chain.
pub struct RegistryBuilder<D: Dispatch> {
    chains: Vec<(TypeDesc, Vec<Arc<dyn Handler<D>>>)>,
    delegation: Delegation,
}

impl<D: Dispatch> Default for RegistryBuilder<D> {
    fn default() -> Self {
        Self {
            chains: Vec::new(),
            delegation: Delegation::default(),
        }
    }
}

impl<D: Dispatch> RegistryBuilder<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delegation(mut self, delegation: Delegation) -> Self {
        self.delegation = delegation;
        self
    }

    /// Register a single-handler chain.
    pub fn handler(self, desc: TypeDesc, handler: impl Handler<D> + 'static) -> Self {
        self.chain(desc, vec![Arc::new(handler)])
    }

    /// Register a chain, run front to back.
    pub fn chain(mut self, desc: TypeDesc, chain: Vec<Arc<dyn Handler<D>>>) -> Self {
        self.chains.push((desc, chain));
        self
    }

    /// Put `handler` in front of the chain registered so far for `desc`.
    ///
    /// Without an earlier registration this starts a new chain.
    pub fn wrap(mut self, desc: TypeDesc, handler: Arc<dyn Handler<D>>) -> Self {
        match self.chains.iter_mut().rev().find(|(d, _)| *d == desc) {
            Some((_, chain)) => chain.insert(0, handler),
            None => self.chains.push((desc, vec![handler])),
        }
        self
    }

    pub fn build(self) -> Result<Registry<D>, EngineError> {
        Registry::from_chains(self.chains, self.delegation)
    }
}

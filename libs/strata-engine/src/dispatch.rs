//! Dispatch protocol shared by the structurer and the unstructurer.
//!
//! A conversion walks the lookup order of the requested descriptor, picks the
//! first descriptor with a registered handler chain and runs that chain. Each
//! handler receives a [`Next`] continuation for the rest of its chain; nested
//! values are converted by re-entering the dispatcher through the [`Context`].

use std::sync::Arc;

use strata_api::{ConversionError, TypeDesc};

use crate::config::Delegation;
use crate::registry::Registry;

/// One direction of conversion: a registry of handler chains plus an entry point.
pub trait Dispatch: Sized + Send + Sync + 'static {
    type Input;
    type Output;

    /// Verb phrase used in lookup failure messages, e.g. `"structure into"`.
    const ACTION: &'static str;

    fn registry(&self) -> &Registry<Self>;

    /// Convert `input` as `desc`. Nested conversions come back through here.
    fn convert(&self, desc: &TypeDesc, input: &Self::Input)
    -> Result<Self::Output, ConversionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// Produces a result or fails without running the rest of its chain.
    Terminal,
    /// May run the rest of its chain through [`Next::run`] and post-process the result.
    Deferring,
}

/// Conversion logic bound to one descriptor in a [`Registry`].
pub trait Handler<D: Dispatch>: Send + Sync {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Terminal
    }

    fn handle(
        &self,
        ctx: &Context<'_, D>,
        input: &D::Input,
        next: Next<'_, D>,
    ) -> Result<D::Output, ConversionError>;
}

struct FnHandler<F> {
    kind: HandlerKind,
    f: F,
}

impl<D, F> Handler<D> for FnHandler<F>
where
    D: Dispatch,
    F: Fn(&Context<'_, D>, &D::Input, Next<'_, D>) -> Result<D::Output, ConversionError>
        + Send
        + Sync,
{
    fn kind(&self) -> HandlerKind {
        self.kind
    }

    fn handle(
        &self,
        ctx: &Context<'_, D>,
        input: &D::Input,
        next: Next<'_, D>,
    ) -> Result<D::Output, ConversionError> {
        (self.f)(ctx, input, next)
    }
}

/// Handler from a closure.
pub fn handler_fn<D, F>(kind: HandlerKind, f: F) -> Arc<dyn Handler<D>>
where
    D: Dispatch,
    F: Fn(&Context<'_, D>, &D::Input, Next<'_, D>) -> Result<D::Output, ConversionError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnHandler { kind, f })
}

/// Per-call view of the dispatcher and the descriptor being converted.
pub struct Context<'a, D> {
    dispatcher: &'a D,
    desc: &'a TypeDesc,
}

impl<D> Clone for Context<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Context<'_, D> {}

impl<'a, D: Dispatch> Context<'a, D> {
    pub fn dispatcher(&self) -> &'a D {
        self.dispatcher
    }

    /// The descriptor requested by the caller, not the one the chain was found under.
    pub fn desc(&self) -> &'a TypeDesc {
        self.desc
    }

    /// Convert a nested value.
    pub fn dispatch(
        &self,
        desc: &TypeDesc,
        input: &D::Input,
    ) -> Result<D::Output, ConversionError> {
        self.dispatcher.convert(desc, input)
    }
}

/// Continuation: the rest of the running handler chain.
pub struct Next<'a, D: Dispatch> {
    ctx: Context<'a, D>,
    chain: &'a [Arc<dyn Handler<D>>],
    rest: &'a [TypeDesc],
}

impl<'a, D: Dispatch> Next<'a, D> {
    /// Whether a handler of the current chain is still pending.
    pub fn has_handler(&self) -> bool {
        !self.chain.is_empty()
    }

    /// Run the rest of the chain on `input`.
    ///
    /// Past the last handler, the outcome depends on the registry's
    /// [`Delegation`] policy.
    pub fn run(self, input: &D::Input) -> Result<D::Output, ConversionError> {
        if let Some((head, tail)) = self.chain.split_first() {
            let next = Next {
                ctx: self.ctx,
                chain: tail,
                rest: self.rest,
            };
            return head.handle(&self.ctx, input, next);
        }

        let dispatcher: &'a D = self.ctx.dispatcher;
        let registry = dispatcher.registry();
        if registry.delegation() == Delegation::LookupOrder {
            for (i, desc) in self.rest.iter().enumerate() {
                if let Some(chain) = registry.resolve(desc) {
                    tracing::trace!(
                        target_desc = %self.ctx.desc,
                        via = %desc,
                        "delegating along lookup order"
                    );
                    let next = Next {
                        ctx: self.ctx,
                        chain,
                        rest: &self.rest[i + 1..],
                    };
                    return next.run(input);
                }
            }
        }

        Err(ConversionError::lookup_failure(format!(
            "Could not find a non-deferring handler to {} `{}`",
            D::ACTION,
            self.ctx.desc
        )))
    }
}

/// Walk the lookup order of `desc` and run the first registered chain.
pub fn run_chain<D: Dispatch>(
    dispatcher: &D,
    desc: &TypeDesc,
    input: &D::Input,
) -> Result<D::Output, ConversionError> {
    let order = desc.lookup_order();
    let registry = dispatcher.registry();
    for (i, candidate) in order.iter().enumerate() {
        if let Some(chain) = registry.resolve(candidate) {
            tracing::trace!(
                target_desc = %desc,
                via = %candidate,
                handlers = chain.len(),
                "dispatching"
            );
            let next = Next {
                ctx: Context { dispatcher, desc },
                chain,
                rest: &order[i + 1..],
            };
            return next.run(input);
        }
    }

    tracing::debug!(target_desc = %desc, probed = order.len(), "no handler chain registered");
    Err(ConversionError::lookup_failure(format!(
        "No handlers registered to {} `{desc}`",
        D::ACTION
    )))
}

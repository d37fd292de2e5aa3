use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, info_span, warn};

use crate::context::ExecutionContext;
use crate::error::{KernelError, Result};
use crate::filter::InterceptingFilter;

/// Unit of application logic resolved by handler identity.
///
/// A handler writes its results into the context's view accumulator and
/// output state; it returns nothing else.
pub trait Handler: Send + Sync {
    fn execute(&self, ctx: &mut ExecutionContext) -> anyhow::Result<()>;
}

impl<F> Handler for F
where
    F: Fn(&mut ExecutionContext) -> anyhow::Result<()> + Send + Sync,
{
    fn execute(&self, ctx: &mut ExecutionContext) -> anyhow::Result<()> {
        self(ctx)
    }
}

/// Runs the intercepting-filter chain around the handler named by the
/// context's route.
///
/// # Filter order
///
/// Pre-phase filters run in declared order and stop at the first one that
/// halts the context. Post-phase filters run in the same declared order after
/// the handler; for a halted context only filters reporting
/// [`InterceptingFilter::always_run`] are invoked.
#[derive(Clone, Default)]
pub struct Dispatcher {
    handlers: HashMap<String, Arc<dyn Handler>>,
    filters: Vec<Arc<dyn InterceptingFilter>>,
}

impl Dispatcher {
    /// Create a new empty dispatcher
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its identity. An existing registration with
    /// the same identity is replaced.
    pub fn register_handler<H>(&mut self, identity: &str, handler: H)
    where
        H: Handler + 'static,
    {
        if self
            .handlers
            .insert(identity.to_string(), Arc::new(handler))
            .is_some()
        {
            warn!(handler = %identity, "Replaced existing handler");
        }
        info!(
            handler = %identity,
            total_handlers = self.handlers.len(),
            "Handler registered"
        );
    }

    /// Append a filter to the chain.
    pub fn add_filter(&mut self, filter: Arc<dyn InterceptingFilter>) {
        debug!(filter = %filter.name(), position = self.filters.len(), "Filter added");
        self.filters.push(filter);
    }

    #[must_use]
    pub fn has_handler(&self, identity: &str) -> bool {
        self.handlers.contains_key(identity)
    }

    /// Registered handler identities, sorted.
    #[must_use]
    pub fn handler_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Run filters and handler against `ctx`.
    ///
    /// Callers inspect the context afterwards; nothing is returned on success.
    ///
    /// # Errors
    ///
    /// - [`KernelError::HandlerResolution`] when the route's handler identity is
    ///   not registered and the context was not halted.
    /// - [`KernelError::Collaborator`] wrapping the first filter or handler
    ///   failure. Remaining filters are not run.
    pub fn dispatch(&self, ctx: &mut ExecutionContext) -> Result<()> {
        let span = info_span!(
            "dispatch",
            context_id = %ctx.id(),
            route = %ctx.route_key(),
            handler = %ctx.route().handler(),
            strategy = %ctx.strategy()
        );
        let _guard = span.enter();

        debug!(filter_count = self.filters.len(), "Pre-phase filters");
        for (idx, filter) in self.filters.iter().enumerate() {
            filter
                .before(ctx)
                .map_err(|e| filter_failure(filter.as_ref(), "before", e))?;
            if ctx.is_halted() {
                info!(
                    filter_idx = idx,
                    filter = %filter.name(),
                    reason = ctx.halt_reason().unwrap_or_default(),
                    "Filter halted dispatch"
                );
                break;
            }
        }

        let latency = if ctx.is_halted() {
            Duration::ZERO
        } else {
            self.invoke_handler(ctx)?
        };

        let halted = ctx.is_halted();
        debug!(
            filter_count = self.filters.len(),
            halted,
            latency_ms = latency.as_millis() as u64,
            "Post-phase filters"
        );
        for filter in &self.filters {
            if halted && !filter.always_run() {
                continue;
            }
            filter
                .after(ctx, latency)
                .map_err(|e| filter_failure(filter.as_ref(), "after", e))?;
        }
        Ok(())
    }

    fn invoke_handler(&self, ctx: &mut ExecutionContext) -> Result<Duration> {
        let identity = ctx.route().handler().to_string();
        let Some(handler) = self.handlers.get(&identity) else {
            error!(
                handler = %identity,
                available_handlers = ?self.handler_names(),
                "Handler not found"
            );
            return Err(KernelError::HandlerResolution {
                route: ctx.route_key().to_string(),
                handler: identity,
            });
        };

        let start = Instant::now();
        let outcome = handler.execute(ctx);
        let elapsed = start.elapsed();
        match outcome {
            Ok(()) => {
                info!(
                    handler = %identity,
                    latency_ms = elapsed.as_millis() as u64,
                    "Handler completed"
                );
                Ok(elapsed)
            }
            Err(e) => {
                error!(
                    handler = %identity,
                    latency_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "Handler failed"
                );
                Err(KernelError::collaborator(format!("handler '{identity}'"), e))
            }
        }
    }
}

fn filter_failure(filter: &dyn InterceptingFilter, phase: &str, e: anyhow::Error) -> KernelError {
    error!(filter = %filter.name(), phase, error = %e, "Filter failed");
    KernelError::collaborator(format!("filter '{}' ({phase})", filter.name()), e)
}

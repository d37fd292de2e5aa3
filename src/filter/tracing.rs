use std::time::Duration;

use tracing::{debug, info};

use super::InterceptingFilter;
use crate::context::ExecutionContext;

/// Logs each dispatch on entry and completion.
pub struct TracingFilter;

impl InterceptingFilter for TracingFilter {
    fn name(&self) -> &str {
        "tracing"
    }

    fn before(&self, ctx: &mut ExecutionContext) -> anyhow::Result<()> {
        debug!(
            context_id = %ctx.id(),
            route = %ctx.route_key(),
            method = %ctx.input().method(),
            acl_codes = ?ctx.acl_codes(),
            "Dispatch started"
        );
        Ok(())
    }

    fn after(&self, ctx: &mut ExecutionContext, latency: Duration) -> anyhow::Result<()> {
        info!(
            context_id = %ctx.id(),
            route = %ctx.route_key(),
            status = ctx.status(),
            halted = ctx.is_halted(),
            latency_ms = latency.as_millis() as u64,
            "Dispatch finished"
        );
        Ok(())
    }

    fn always_run(&self) -> bool {
        true
    }
}

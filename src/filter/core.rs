use std::time::Duration;

use crate::context::ExecutionContext;

/// Pre/post hook around the handler.
///
/// A filter halts the chain by calling [`ExecutionContext::halt`] from
/// `before`. Errors abort the dispatch and surface as collaborator errors.
pub trait InterceptingFilter: Send + Sync {
    /// Name used in config lists and log fields.
    fn name(&self) -> &str;

    fn before(&self, _ctx: &mut ExecutionContext) -> anyhow::Result<()> {
        Ok(())
    }

    /// `latency` is the handler's run time, zero when it was skipped.
    fn after(&self, _ctx: &mut ExecutionContext, _latency: Duration) -> anyhow::Result<()> {
        Ok(())
    }

    /// Whether `after` still runs for a halted context.
    fn always_run(&self) -> bool {
        false
    }
}

use serde_json::json;
use tracing::warn;

use super::InterceptingFilter;
use crate::context::{ExecutionContext, STATUS_KEY};

/// Rejects contexts whose ACL codes do not satisfy the route's access policy.
///
/// A public route (empty policy) always passes. Otherwise the context must
/// hold at least one of the listed codes; a rejected context is halted with
/// status 403.
pub struct AclFilter;

impl InterceptingFilter for AclFilter {
    fn name(&self) -> &str {
        "acl"
    }

    fn before(&self, ctx: &mut ExecutionContext) -> anyhow::Result<()> {
        let route = ctx.route();
        if route.is_public() {
            return Ok(());
        }
        if route.access_policy().iter().any(|code| ctx.has_acl_code(code)) {
            return Ok(());
        }
        warn!(
            route = %route.key(),
            required = ?route.access_policy(),
            held = ?ctx.acl_codes(),
            "Access denied"
        );
        let reason = format!("access denied to route '{}'", route.key());
        ctx.set(STATUS_KEY, json!(403));
        ctx.halt(reason);
        Ok(())
    }
}

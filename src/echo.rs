use serde_json::json;

use crate::context::ExecutionContext;

/// Handler that writes its own context back into the view.
///
/// The CLI binds it to every configured handler identity so routes can be
/// exercised before real handlers exist.
pub fn echo_handler(ctx: &mut ExecutionContext) -> anyhow::Result<()> {
    let handler = ctx.route().handler().to_string();
    let route = ctx.route_key().to_string();
    let strategy = ctx.strategy().to_string();
    let method = ctx.input().method().to_string();
    let input = ctx.input().to_value();
    let acl_codes = json!(ctx.acl_codes());

    let view = ctx.view_mut();
    view.assign("handler", json!(handler));
    view.assign("route", json!(route));
    view.assign("strategy", json!(strategy));
    view.assign("method", json!(method));
    view.assign("acl-codes", acl_codes);
    view.assign("input", input);
    Ok(())
}

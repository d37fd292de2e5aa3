use std::time::Duration;

use super::InterceptingFilter;
use crate::context::ExecutionContext;

/// Emits a `content-type` response header for the context.
///
/// The route's declared return type decides when present, the strategy
/// otherwise. Halted contexts render a JSON error payload, so they get
/// `application/json` whatever the route declares.
pub struct OutputFilter;

impl OutputFilter {
    /// Content type for a declared return type or strategy tag.
    #[must_use]
    pub fn content_type(tag: &str) -> Option<&'static str> {
        match tag {
            "console" | "text" => Some("text/plain; charset=utf-8"),
            "html" => Some("text/html; charset=utf-8"),
            "ajax" | "api" | "service" | "json" => Some("application/json"),
            _ => None,
        }
    }
}

impl InterceptingFilter for OutputFilter {
    fn name(&self) -> &str {
        "output"
    }

    fn after(&self, ctx: &mut ExecutionContext, _latency: Duration) -> anyhow::Result<()> {
        let content_type = if ctx.is_halted() {
            Self::content_type("json")
        } else {
            ctx.route()
                .return_type()
                .and_then(Self::content_type)
                .or_else(|| Self::content_type(ctx.strategy()))
        };
        let already_set = ctx
            .response_headers()
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("content-type"));
        if let (Some(content_type), false) = (content_type, already_set) {
            ctx.add_response_header("content-type", content_type);
        }
        Ok(())
    }

    fn always_run(&self) -> bool {
        true
    }
}

use serde_json::Value;
use tracing::{debug, warn};

use super::console::ConsoleOutputAdapter;
use super::core::{RenderAdapter, RenderedOutput};
use super::http::{HttpFormat, HttpOutputAdapter};
use crate::context::ExecutionContext;
use crate::error::{KernelError, Result};

/// Selects a render adapter and feeds it context output.
pub struct OutputEngine {
    adapter: Box<dyn RenderAdapter>,
}

impl OutputEngine {
    #[must_use]
    pub fn new(adapter: Box<dyn RenderAdapter>) -> Self {
        Self { adapter }
    }

    /// Engine for an application type hint.
    ///
    /// `None` falls back to console; this is the only silent default.
    pub fn from_app_type(app_type: Option<&str>) -> Result<Self> {
        let adapter: Box<dyn RenderAdapter> = match app_type {
            None => {
                debug!("No app type given, using console output");
                Box::new(ConsoleOutputAdapter)
            }
            Some("app-console") => Box::new(ConsoleOutputAdapter),
            Some("app-page") => Box::new(HttpOutputAdapter::new(HttpFormat::Html)),
            Some("app-api" | "app-service") => Box::new(HttpOutputAdapter::new(HttpFormat::Json)),
            Some(other) => {
                return Err(KernelError::Configuration(format!(
                    "no output adapter for application type '{other}'; supported: \
                     app-page, app-api, app-service, app-console"
                )))
            }
        };
        Ok(Self::new(adapter))
    }

    /// Engine for a context strategy tag.
    pub fn for_strategy(strategy: &str) -> Result<Self> {
        let adapter: Box<dyn RenderAdapter> = match strategy {
            "console" => Box::new(ConsoleOutputAdapter),
            "html" => Box::new(HttpOutputAdapter::new(HttpFormat::Html)),
            "ajax" | "api" | "service" => Box::new(HttpOutputAdapter::new(HttpFormat::Json)),
            other => {
                return Err(KernelError::Configuration(format!(
                    "no output adapter for strategy '{other}'"
                )))
            }
        };
        Ok(Self::new(adapter))
    }

    #[must_use]
    pub fn adapter(&self) -> &dyn RenderAdapter {
        self.adapter.as_ref()
    }

    /// Render a dispatched context.
    ///
    /// A halted context renders as an error carrying its halt reason. When the
    /// adapter accepts headers, the context's `output-headers` and `status`
    /// are applied on top of the adapter's own. An error payload keeps the
    /// adapter's `content-type`.
    pub fn render(&self, ctx: &ExecutionContext) -> Result<RenderedOutput> {
        let halted = ctx.is_halted();
        let mut out = match ctx.halt_reason() {
            Some(reason) => {
                warn!(route = %ctx.route_key(), reason, "Rendering halted context");
                self.adapter.render_error(reason)
            }
            None => self.render_raw(&ctx.view().build())?,
        };
        if self.adapter.accepts_headers() {
            for (name, value) in ctx.response_headers() {
                if halted && name.eq_ignore_ascii_case("content-type") {
                    continue;
                }
                out.set_header(&name, &value);
            }
            if let Some(status) = ctx.status() {
                out.status = Some(status);
            }
        }
        debug!(
            adapter = %self.adapter.name(),
            route = %ctx.route_key(),
            status = out.status,
            bytes = out.body.len(),
            "Context rendered"
        );
        Ok(out)
    }

    pub fn render_raw(&self, data: &Value) -> Result<RenderedOutput> {
        self.adapter.output(data).map_err(|e| {
            KernelError::collaborator(format!("render adapter '{}'", self.adapter.name()), e)
        })
    }

    #[must_use]
    pub fn render_error(&self, message: &str) -> RenderedOutput {
        self.adapter.render_error(message)
    }
}

use serde_json::{json, Value};

use super::core::{RenderAdapter, RenderedOutput};

/// Body format for [`HttpOutputAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpFormat {
    /// Serialized JSON body (`ajax`, `api`, `service`).
    Json,
    /// String body passed through (`html`).
    Html,
}

/// Network-response rendering shared by page, api and service strategies.
#[derive(Debug, Clone, Copy)]
pub struct HttpOutputAdapter {
    format: HttpFormat,
}

impl HttpOutputAdapter {
    #[must_use]
    pub fn new(format: HttpFormat) -> Self {
        Self { format }
    }

    #[must_use]
    pub fn format(&self) -> HttpFormat {
        self.format
    }
}

impl RenderAdapter for HttpOutputAdapter {
    fn name(&self) -> &str {
        "http"
    }

    fn output(&self, data: &Value) -> anyhow::Result<RenderedOutput> {
        let mut out = match (self.format, data) {
            (HttpFormat::Html, Value::String(s)) => RenderedOutput::text(s.clone()),
            (HttpFormat::Html, other) => RenderedOutput::text(other.to_string()),
            (HttpFormat::Json, other) => RenderedOutput::text(serde_json::to_string(other)?),
        };
        out.status = Some(200);
        let content_type = match self.format {
            HttpFormat::Json => "application/json",
            HttpFormat::Html => "text/html; charset=utf-8",
        };
        out.set_header("content-type", content_type);
        Ok(out)
    }

    fn render_error(&self, message: &str) -> RenderedOutput {
        let mut out = RenderedOutput::text(json!({ "error": message }).to_string()).with_status(500);
        out.set_header("content-type", "application/json");
        out
    }

    fn accepts_headers(&self) -> bool {
        true
    }
}

use serde::Serialize;
use serde_json::Value;

use crate::error::{KernelError, Result};

/// Finished output, ready for the transport.
///
/// `status` is only set by adapters that speak a status-bearing protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedOutput {
    pub status: Option<u16>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RenderedOutput {
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: None,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Header lookup, case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing any existing value with the same name.
    pub fn set_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Convert into an `http::Response`, defaulting the status to 200.
    pub fn into_http_response(self) -> Result<http::Response<String>> {
        let mut builder = http::Response::builder().status(self.status.unwrap_or(200));
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
            .body(self.body)
            .map_err(|e| KernelError::collaborator("http response", e.into()))
    }
}

/// Turns view data or an error message into transport-ready output.
pub trait RenderAdapter: Send + Sync {
    /// Short adapter name for logs (`console`, `http`).
    fn name(&self) -> &str;

    fn output(&self, data: &Value) -> anyhow::Result<RenderedOutput>;

    fn render_error(&self, message: &str) -> RenderedOutput;

    /// Whether response headers accumulated in a context are forwarded.
    fn accepts_headers(&self) -> bool {
        false
    }
}

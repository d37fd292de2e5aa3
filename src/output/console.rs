use serde_json::Value;

use super::core::{RenderAdapter, RenderedOutput};

/// Plain-text rendering for an interactive terminal.
///
/// Strings print verbatim, maps print one `key: value` line per entry and
/// lists one line per element.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutputAdapter;

impl ConsoleOutputAdapter {
    fn scalar(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl RenderAdapter for ConsoleOutputAdapter {
    fn name(&self) -> &str {
        "console"
    }

    fn output(&self, data: &Value) -> anyhow::Result<RenderedOutput> {
        let body = match data {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| format!("{k}: {}", Self::scalar(v)))
                .collect::<Vec<_>>()
                .join("\n"),
            Value::Array(items) => items
                .iter()
                .map(Self::scalar)
                .collect::<Vec<_>>()
                .join("\n"),
            other => Self::scalar(other),
        };
        Ok(RenderedOutput::text(body))
    }

    fn render_error(&self, message: &str) -> RenderedOutput {
        RenderedOutput::text(format!("Error: {message}"))
    }
}

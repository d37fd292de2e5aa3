use serde_json::Value;
use std::env;

use super::core::{InputChannel, ParamMap};
use crate::error::{KernelError, Result};

/// Server variable holding the raw request path.
pub const REQUEST_URI: &str = "REQUEST_URI";
/// Server variable holding the request method.
pub const REQUEST_METHOD: &str = "REQUEST_METHOD";
/// Server variable holding the raw query string.
pub const QUERY_STRING: &str = "QUERY_STRING";
/// Server variable carrying a correlation id from an upstream proxy.
pub const REQUEST_ID: &str = "HTTP_X_REQUEST_ID";

/// Read-only snapshot of the hosting transport's request sources.
///
/// The snapshot is taken once at the edge of the process and passed into the
/// context builder; nothing deeper in the pipeline reads the process
/// environment directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmbientRequest {
    server: ParamMap,
    get: ParamMap,
    post: ParamMap,
    files: ParamMap,
    cookie: ParamMap,
    argv: ParamMap,
}

impl AmbientRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process.
    ///
    /// Arguments become the `argv` channel keyed by position. CGI-style
    /// `REQUEST_URI`, `REQUEST_METHOD`, `QUERY_STRING` and
    /// `HTTP_X_REQUEST_ID` variables populate the server map, and the query
    /// string is parsed into the `get` channel.
    #[must_use]
    pub fn from_process() -> Self {
        let mut ambient = Self::new();
        for (index, arg) in env::args().enumerate() {
            ambient.argv.insert(index.to_string(), Value::String(arg));
        }
        for name in [REQUEST_URI, REQUEST_METHOD, QUERY_STRING, REQUEST_ID] {
            if let Ok(value) = env::var(name) {
                ambient.server.insert(name.to_string(), Value::String(value));
            }
        }
        if let Some(Value::String(query)) = ambient.server.get(QUERY_STRING) {
            ambient.get = url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
                .collect();
        }
        ambient
    }

    /// Set a raw server variable.
    #[must_use]
    pub fn with_server(mut self, name: &str, value: Value) -> Self {
        self.server.insert(name.to_string(), value);
        self
    }

    #[must_use]
    pub fn with_request_uri(self, uri: &str) -> Self {
        self.with_server(REQUEST_URI, Value::String(uri.to_string()))
    }

    #[must_use]
    pub fn with_method(self, method: &str) -> Self {
        self.with_server(REQUEST_METHOD, Value::String(method.to_string()))
    }

    /// Replace one channel's raw parameters.
    #[must_use]
    pub fn with_channel(mut self, channel: InputChannel, params: ParamMap) -> Self {
        *self.channel_mut(channel) = params;
        self
    }

    #[must_use]
    pub fn server(&self, name: &str) -> Option<&Value> {
        self.server.get(name)
    }

    #[must_use]
    pub fn channel(&self, channel: InputChannel) -> &ParamMap {
        match channel {
            InputChannel::Get => &self.get,
            InputChannel::Post => &self.post,
            InputChannel::Files => &self.files,
            InputChannel::Cookie => &self.cookie,
            InputChannel::Argv => &self.argv,
        }
    }

    fn channel_mut(&mut self, channel: InputChannel) -> &mut ParamMap {
        match channel {
            InputChannel::Get => &mut self.get,
            InputChannel::Post => &mut self.post,
            InputChannel::Files => &mut self.files,
            InputChannel::Cookie => &mut self.cookie,
            InputChannel::Argv => &mut self.argv,
        }
    }

    /// The raw request path string.
    ///
    /// Fails when the transport did not supply one or supplied a non-string.
    pub fn request_uri(&self) -> Result<&str> {
        match self.server.get(REQUEST_URI) {
            Some(Value::String(uri)) => Ok(uri),
            Some(other) => Err(KernelError::Configuration(format!(
                "{REQUEST_URI} must be a string, got {other}"
            ))),
            None => Err(KernelError::Configuration(format!(
                "{REQUEST_URI} is not set by the hosting transport"
            ))),
        }
    }

    /// Method label for input built from this snapshot.
    ///
    /// `REQUEST_METHOD` lower-cased when present; `cli` for a process with
    /// arguments and no request method; `get` otherwise.
    #[must_use]
    pub fn method(&self) -> String {
        match self.server.get(REQUEST_METHOD).and_then(Value::as_str) {
            Some(m) if !m.trim().is_empty() => m.trim().to_ascii_lowercase(),
            _ if !self.argv.is_empty() => "cli".to_string(),
            _ => "get".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_uri_missing() {
        let err = AmbientRequest::new().request_uri().unwrap_err();
        assert!(matches!(err, KernelError::Configuration(_)));
    }

    #[test]
    fn test_request_uri_not_a_string() {
        let ambient = AmbientRequest::new().with_server(REQUEST_URI, json!(["a"]));
        let err = ambient.request_uri().unwrap_err();
        assert!(matches!(err, KernelError::Configuration(_)));
    }

    #[test]
    fn test_method_resolution() {
        assert_eq!(AmbientRequest::new().with_method("POST").method(), "post");
        assert_eq!(AmbientRequest::new().method(), "get");
        let mut argv = ParamMap::new();
        argv.insert("0".into(), json!("bin"));
        assert_eq!(
            AmbientRequest::new()
                .with_channel(InputChannel::Argv, argv)
                .method(),
            "cli"
        );
    }

    #[test]
    fn test_from_process_has_argv() {
        let ambient = AmbientRequest::from_process();
        assert!(!ambient.channel(InputChannel::Argv).is_empty());
    }
}

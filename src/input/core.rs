use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{KernelError, Result};

/// Ordered key/value map used for every input channel.
///
/// Insertion order is preserved so that `get` parameters extracted from a
/// path keep the order they appeared in.
pub type ParamMap = IndexMap<String, Value>;

/// Full channel override accepted by `define_input`.
pub type InputOverride = IndexMap<InputChannel, ParamMap>;

/// The five fixed input channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputChannel {
    Get,
    Post,
    Files,
    Cookie,
    Argv,
}

impl InputChannel {
    /// Channels in canonical order.
    pub const ALL: [InputChannel; 5] = [
        InputChannel::Get,
        InputChannel::Post,
        InputChannel::Files,
        InputChannel::Cookie,
        InputChannel::Argv,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            InputChannel::Get => "get",
            InputChannel::Post => "post",
            InputChannel::Files => "files",
            InputChannel::Cookie => "cookie",
            InputChannel::Argv => "argv",
        }
    }
}

impl fmt::Display for InputChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputChannel {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(InputChannel::Get),
            "post" => Ok(InputChannel::Post),
            "files" => Ok(InputChannel::Files),
            "cookie" => Ok(InputChannel::Cookie),
            "argv" => Ok(InputChannel::Argv),
            other => Err(KernelError::InvalidArgument(format!(
                "unknown input channel '{other}'"
            ))),
        }
    }
}

/// Normalized five-channel request input.
///
/// Every channel is always present once a bundle exists, possibly as an empty
/// map. Bundles are immutable; the context builder assembles one and hands it
/// to the context read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputBundle {
    method: String,
    channels: IndexMap<InputChannel, ParamMap>,
}

impl Default for InputBundle {
    /// Method `get`, all five channels empty.
    fn default() -> Self {
        Self {
            method: "get".to_string(),
            channels: InputChannel::ALL
                .iter()
                .map(|ch| (*ch, ParamMap::new()))
                .collect(),
        }
    }
}

impl InputBundle {
    /// Create a bundle from an optional override map.
    ///
    /// Channels missing from `params` become empty maps. The method label is
    /// lower-cased; an empty label is rejected.
    pub fn new(method: &str, mut params: InputOverride) -> Result<Self> {
        let method = method.trim();
        if method.is_empty() {
            return Err(KernelError::InvalidArgument(
                "input method must be a non empty string".to_string(),
            ));
        }

        let channels = InputChannel::ALL
            .iter()
            .map(|ch| (*ch, params.shift_remove(ch).unwrap_or_default()))
            .collect();

        Ok(Self {
            method: method.to_ascii_lowercase(),
            channels,
        })
    }

    /// Bundle with all five channels empty.
    pub fn empty(method: &str) -> Result<Self> {
        Self::new(method, InputOverride::new())
    }

    /// Method label (`get`, `post`, `cli`, ...).
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub fn is_get(&self) -> bool {
        self.method == "get"
    }

    #[must_use]
    pub fn is_post(&self) -> bool {
        self.method == "post"
    }

    #[must_use]
    pub fn is_cli(&self) -> bool {
        self.method == "cli"
    }

    /// Look up a single parameter.
    #[must_use]
    pub fn get(&self, channel: InputChannel, key: &str) -> Option<&Value> {
        self.channels.get(&channel).and_then(|m| m.get(key))
    }

    /// Look up a parameter, falling back to `default` when absent.
    #[must_use]
    pub fn get_or(&self, channel: InputChannel, key: &str, default: Value) -> Value {
        self.get(channel, key).cloned().unwrap_or(default)
    }

    /// Whole map for one channel.
    #[must_use]
    pub fn channel(&self, channel: InputChannel) -> &ParamMap {
        // every channel is inserted by the constructor
        &self.channels[&channel]
    }

    /// All five channels in canonical order.
    #[must_use]
    pub fn all(&self) -> &IndexMap<InputChannel, ParamMap> {
        &self.channels
    }

    /// JSON view keyed by channel name, handy for echo handlers and logging.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let channels: serde_json::Map<String, Value> = self
            .channels
            .iter()
            .map(|(ch, params)| {
                let obj: serde_json::Map<String, Value> =
                    params.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                (ch.as_str().to_string(), Value::Object(obj))
            })
            .collect();
        Value::Object(channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(pairs: &[(&str, &str)]) -> ParamMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[test]
    fn test_empty_bundle_has_all_channels() {
        let bundle = InputBundle::empty("get").unwrap();
        assert_eq!(bundle.all().len(), 5);
        for ch in InputChannel::ALL {
            assert!(bundle.channel(ch).is_empty());
        }
        assert!(bundle.is_get());
        assert_eq!(bundle, InputBundle::default());
    }

    #[test]
    fn test_partial_override_fills_missing_channels() {
        let mut params = InputOverride::new();
        params.insert(InputChannel::Post, map(&[("a", "1")]));
        let bundle = InputBundle::new("POST", params).unwrap();
        assert_eq!(bundle.method(), "post");
        assert_eq!(bundle.get(InputChannel::Post, "a"), Some(&json!("1")));
        assert!(bundle.channel(InputChannel::Argv).is_empty());
        assert_eq!(bundle.all().len(), 5);
    }

    #[test]
    fn test_empty_method_rejected() {
        let err = InputBundle::empty("  ").unwrap_err();
        assert!(matches!(err, KernelError::InvalidArgument(_)));
    }

    #[test]
    fn test_get_or_default() {
        let bundle = InputBundle::empty("cli").unwrap();
        assert!(bundle.is_cli());
        assert_eq!(
            bundle.get_or(InputChannel::Get, "missing", json!("fallback")),
            json!("fallback")
        );
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!("COOKIE".parse::<InputChannel>().unwrap(), InputChannel::Cookie);
        assert!("header".parse::<InputChannel>().is_err());
    }

    #[test]
    fn test_to_value_channel_names() {
        let bundle = InputBundle::empty("get").unwrap();
        assert_eq!(
            bundle.to_value(),
            json!({"get": {}, "post": {}, "files": {}, "cookie": {}, "argv": {}})
        );
    }
}

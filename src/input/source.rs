use super::ambient::AmbientRequest;
use super::core::{InputBundle, InputChannel, InputOverride, ParamMap};
use crate::error::{KernelError, Result};
use crate::router::RequestUri;

/// Normalizes the five raw input origins into an [`InputBundle`].
///
/// # `get` precedence
///
/// When an explicit override and a uri both feed the `get` channel, override
/// entries are inserted first and uri-derived entries afterwards. On a key
/// collision the uri value wins; override-only keys keep their position ahead
/// of the uri keys.
pub struct ParameterSource;

impl ParameterSource {
    /// Build a bundle from an explicit method and override map.
    ///
    /// With `use_uri_for_get`, the uri's embedded parameters are merged into
    /// the `get` channel; a missing uri is a precondition failure.
    pub fn define(
        method: &str,
        mut params: InputOverride,
        use_uri_for_get: bool,
        uri: Option<&RequestUri>,
    ) -> Result<InputBundle> {
        if use_uri_for_get {
            let uri = uri.ok_or_else(|| {
                KernelError::Precondition(
                    "a uri must be set before it can be used as the get source".to_string(),
                )
            })?;
            merge_into(params.entry(InputChannel::Get).or_default(), uri.params());
        }
        InputBundle::new(method, params)
    }

    /// `get` from the uri, every other channel empty, method `get`.
    pub fn from_uri(uri: &RequestUri) -> Result<InputBundle> {
        Self::define("get", InputOverride::new(), true, Some(uri))
    }

    /// Build a bundle from the ambient request snapshot.
    ///
    /// `post`, `files`, `cookie` and `argv` are copied verbatim. `get` comes
    /// from `uri` when given, otherwise from the ambient query parameters.
    pub fn from_ambient(ambient: &AmbientRequest, uri: Option<&RequestUri>) -> Result<InputBundle> {
        let params: InputOverride = InputChannel::ALL
            .iter()
            .map(|ch| {
                let values = match (ch, uri) {
                    (InputChannel::Get, Some(uri)) => uri.params().clone(),
                    _ => ambient.channel(*ch).clone(),
                };
                (*ch, values)
            })
            .collect();
        InputBundle::new(&ambient.method(), params)
    }

    /// The uri to use for `get` derivation: `current` if already set,
    /// otherwise one parsed from the ambient raw request path.
    pub fn ambient_uri(ambient: &AmbientRequest, current: Option<&RequestUri>) -> Result<RequestUri> {
        match current {
            Some(uri) => Ok(uri.clone()),
            None => RequestUri::parse(ambient.request_uri()?),
        }
    }
}

fn merge_into(target: &mut ParamMap, source: &ParamMap) {
    for (k, v) in source {
        target.insert(k.clone(), v.clone());
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
    fn test_define_without_uri_precondition() {
        let err = ParameterSource::define("get", InputOverride::new(), true, None).unwrap_err();
        assert!(matches!(err, KernelError::Precondition(_)));
    }

    #[test]
    fn test_define_uri_wins_on_collision() {
        let uri = RequestUri::parse("r/shared/from-uri/only-uri/1").unwrap();
        let mut params = InputOverride::new();
        params.insert(
            InputChannel::Get,
            map(&[("only-override", "x"), ("shared", "from-override")]),
        );
        let bundle = ParameterSource::define("post", params, true, Some(&uri)).unwrap();
        let get = bundle.channel(InputChannel::Get);
        let keys: Vec<&str> = get.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["only-override", "shared", "only-uri"]);
        assert_eq!(get["shared"], json!("from-uri"));
        assert_eq!(bundle.method(), "post");
    }

    #[test]
    fn test_from_ambient_query_get() {
        let ambient = AmbientRequest::new()
            .with_method("GET")
            .with_channel(InputChannel::Get, map(&[("q", "rust")]))
            .with_channel(InputChannel::Cookie, map(&[("session", "abc")]));
        let bundle = ParameterSource::from_ambient(&ambient, None).unwrap();
        assert_eq!(bundle.get(InputChannel::Get, "q"), Some(&json!("rust")));
        assert_eq!(bundle.get(InputChannel::Cookie, "session"), Some(&json!("abc")));
        assert!(bundle.channel(InputChannel::Post).is_empty());
    }

    #[test]
    fn test_from_ambient_uri_replaces_query_get() {
        let ambient = AmbientRequest::new()
            .with_channel(InputChannel::Get, map(&[("q", "rust")]));
        let uri = RequestUri::parse("r/param1/value1").unwrap();
        let bundle = ParameterSource::from_ambient(&ambient, Some(&uri)).unwrap();
        assert_eq!(
            bundle.channel(InputChannel::Get),
            &map(&[("param1", "value1")])
        );
    }

    #[test]
    fn test_ambient_uri_prefers_current() {
        let ambient = AmbientRequest::new().with_request_uri("other/a/b");
        let current = RequestUri::parse("mine").unwrap();
        let uri = ParameterSource::ambient_uri(&ambient, Some(&current)).unwrap();
        assert_eq!(uri.route_key(), "mine");
        let uri = ParameterSource::ambient_uri(&ambient, None).unwrap();
        assert_eq!(uri.route_key(), "other");
    }
}

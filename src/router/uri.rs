use serde_json::Value;
use std::fmt;

use crate::error::{KernelError, Result};
use crate::input::ParamMap;

/// Query parameter that names the route when the path carries only params.
pub const ROUTE_KEY_PARAM: &str = "routekey";

/// Path-like request string split into a route key and its embedded params.
///
/// Two shapes are understood:
///
/// - `my-key/param1/value1/param2/value2`: the first segment is the route key,
///   the remaining segments alternate name/value.
/// - `param1/value1?routekey=my-key&param2=value2`: the `routekey` query
///   parameter names the route, every path segment is a name/value pair, and
///   the other query parameters follow.
///
/// Segments and query values are percent-decoded. A trailing name without a
/// value maps to the empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestUri {
    raw: String,
    route_key: String,
    params: ParamMap,
}

impl RequestUri {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(KernelError::invalid_route(raw, "uri string is empty"));
        }

        let (path, query) = match trimmed.split_once('?') {
            Some((p, q)) => (p, q),
            None => (trimmed, ""),
        };

        let mut segments = Vec::new();
        for seg in path.split('/').filter(|s| !s.is_empty()) {
            let decoded = urlencoding::decode(seg).map_err(|e| {
                KernelError::invalid_route(raw, format!("segment '{seg}' is not valid utf-8: {e}"))
            })?;
            segments.push(decoded.into_owned());
        }

        let mut route_key = None;
        let mut query_pairs = Vec::new();
        for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
            if k == ROUTE_KEY_PARAM {
                route_key = Some(v.into_owned());
            } else {
                query_pairs.push((k.into_owned(), v.into_owned()));
            }
        }

        let mut segments = segments.into_iter();
        let route_key = match route_key {
            Some(key) => key,
            None => segments
                .next()
                .ok_or_else(|| KernelError::invalid_route(raw, "no route key segment"))?,
        };
        let route_key = route_key.trim().to_string();
        if route_key.is_empty() {
            return Err(KernelError::invalid_route(raw, "route key is empty"));
        }

        let mut params = ParamMap::new();
        while let Some(name) = segments.next() {
            let value = segments.next().unwrap_or_default();
            params.insert(name, Value::String(value));
        }
        for (k, v) in query_pairs {
            params.insert(k, Value::String(v));
        }

        Ok(Self {
            raw: raw.to_string(),
            route_key,
            params,
        })
    }

    /// The string this uri was parsed from.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn route_key(&self) -> &str {
        &self.route_key
    }

    /// Parameters embedded in the path and query, in order of appearance.
    #[must_use]
    pub fn params(&self) -> &ParamMap {
        &self.params
    }
}

impl fmt::Display for RequestUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<&str> for RequestUri {
    type Error = KernelError;

    fn try_from(value: &str) -> Result<Self> {
        RequestUri::parse(value)
    }
}

impl TryFrom<String> for RequestUri {
    type Error = KernelError;

    fn try_from(value: String) -> Result<Self> {
        RequestUri::parse(&value)
    }
}

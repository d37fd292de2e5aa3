#![allow(dead_code)]

use brrtkernel::context::{ContextBuilder, ExecutionContext};
use brrtkernel::input::{AmbientRequest, ParamMap};
use brrtkernel::router::{RouteDetail, RouteMap, Router};
use serde_json::json;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Router with the route keys used across the integration tests.
pub fn test_router() -> Router {
    let mut routes = RouteMap::new();
    routes.insert("my-key".to_string(), RouteDetail::new("ActionA"));
    routes.insert(
        "secure".to_string(),
        RouteDetail::new("SecureAction").with_access_policy(["staff"]),
    );
    routes.insert(
        "page".to_string(),
        RouteDetail::new("PageAction").with_return_type("html"),
    );
    routes.insert("orphan".to_string(), RouteDetail::new("Unregistered"));
    Router::new(routes)
}

pub fn params(pairs: &[(&str, &str)]) -> ParamMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect()
}

/// Console context for `route` with no input.
pub fn simple_context(router: &Router, route: &str, strategy: &str) -> ExecutionContext {
    let ambient = AmbientRequest::new();
    ContextBuilder::new(router, &ambient)
        .set_strategy(strategy)
        .unwrap()
        .set_route(route)
        .unwrap()
        .no_input_required()
        .build_context()
        .unwrap()
}

/// Counts invocations; shared between a handler or filter and the test.
#[derive(Clone, Default)]
pub struct Spy(Arc<AtomicUsize>);

impl Spy {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Writes `content` to a temp file with the given extension.
pub fn temp_config(content: &str, ext: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("brrtk_test_")
        .suffix(&format!(".{ext}"))
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

use super::{RequestUri, RouteDetail, RouteMap, Router};
use crate::config::ConfigRegistry;
use crate::context::ViewTemplate;
use crate::error::KernelError;
use serde_json::json;
use std::sync::Arc;

fn router() -> Router {
    let mut routes = RouteMap::new();
    routes.insert("my-key".to_string(), RouteDetail::new("ActionA"));
    routes.insert(
        "admin".to_string(),
        RouteDetail::new("AdminAction")
            .with_access_policy(["admin"])
            .with_return_type("json"),
    );
    Router::new(routes)
}

#[test]
fn test_parse_key_then_pairs() {
    let uri = RequestUri::parse("my-key/param1/value1/param2/value2").unwrap();
    assert_eq!(uri.route_key(), "my-key");
    assert_eq!(
        serde_json::to_value(uri.params()).unwrap(),
        json!({"param1": "value1", "param2": "value2"})
    );
}

#[test]
fn test_parse_query_route_key() {
    let uri = RequestUri::parse("param1/value1?routekey=my-key&param2=value2").unwrap();
    assert_eq!(uri.route_key(), "my-key");
    let keys: Vec<&str> = uri.params().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["param1", "param2"]);
    assert_eq!(uri.params()["param2"], json!("value2"));
}

#[test]
fn test_parse_leading_slash_and_decoding() {
    let uri = RequestUri::parse("/my-key/name/John%20Doe").unwrap();
    assert_eq!(uri.route_key(), "my-key");
    assert_eq!(uri.params()["name"], json!("John Doe"));
}

#[test]
fn test_parse_trailing_name_without_value() {
    let uri = RequestUri::parse("my-key/flag").unwrap();
    assert_eq!(uri.params()["flag"], json!(""));
}

#[test]
fn test_parse_key_only() {
    let uri = RequestUri::parse("my-key").unwrap();
    assert_eq!(uri.route_key(), "my-key");
    assert!(uri.params().is_empty());
}

#[test]
fn test_parse_degenerate_strings() {
    for raw in ["", "   ", "/", "///", "?a=b", "?routekey="] {
        let err = RequestUri::parse(raw).unwrap_err();
        assert!(
            matches!(err, KernelError::InvalidRoute { .. }),
            "expected InvalidRoute for {raw:?}, got {err:?}"
        );
    }
}

#[test]
fn test_resolve_key() {
    let route = router().resolve("admin").unwrap();
    assert_eq!(route.key(), "admin");
    assert_eq!(route.handler(), "AdminAction");
    assert_eq!(route.access_policy(), ["admin".to_string()]);
    assert_eq!(route.return_type(), Some("json"));
    assert!(!route.is_public());
}

#[test]
fn test_resolve_path_string() {
    let route = router().resolve("my-key/param1/value1").unwrap();
    assert_eq!(route.key(), "my-key");
    assert!(route.is_public());
}

#[test]
fn test_resolve_unknown_key() {
    let err = router().resolve("nope").unwrap_err();
    assert!(matches!(err, KernelError::RouteNotFound { key } if key == "nope"));
}

#[test]
fn test_resolve_empty_key() {
    let err = router().resolve("").unwrap_err();
    assert!(matches!(err, KernelError::InvalidRoute { .. }));
}

#[test]
fn test_set_and_clear_route_map() {
    let router = router();
    let snapshot = router.route_map();
    router.clear_route_map();
    assert!(router.lookup("my-key").is_none());
    // an earlier snapshot is unaffected by the swap
    assert!(snapshot.contains_key("my-key"));

    router.add_route("late", RouteDetail::new("LateAction"));
    assert_eq!(router.resolve("late").unwrap().handler(), "LateAction");
}

#[test]
fn test_from_config_routes() {
    let config = ConfigRegistry::from_value(json!({
        "routes": {
            "my-key": {"handler": "ActionA"},
            "secure": {"handler": "ActionB", "access-policy": ["staff"], "return-type": "html"}
        }
    }))
    .unwrap();
    let router = Router::from_config(&config).unwrap();
    assert_eq!(router.resolve("secure").unwrap().access_policy(), ["staff".to_string()]);
    assert_eq!(router.route_map().len(), 2);
}

#[test]
fn test_from_config_malformed_routes() {
    let config = ConfigRegistry::from_value(json!({"routes": ["not", "a", "map"]})).unwrap();
    let err = Router::from_config(&config).err().unwrap();
    assert!(matches!(err, KernelError::Configuration(_)));
}

#[test]
fn test_default_view_name() {
    let router = router();
    let route = router.resolve("my-key").unwrap();
    assert_eq!(router.view_for(&route, "console").name(), "ActionA::ConsoleView");
    assert_eq!(router.view_for(&route, "html").name(), "ActionA::HtmlView");
}

#[test]
fn test_registered_view_factory() {
    let mut router = router();
    router.register_view(
        "ActionA",
        "ajax",
        Arc::new(|_route, _strategy| Box::new(ViewTemplate::new("CustomAjax"))),
    );
    let route = router.resolve("my-key").unwrap();
    assert_eq!(router.view_for(&route, "ajax").name(), "CustomAjax");
    assert_eq!(router.view_for(&route, "html").name(), "ActionA::HtmlView");
}

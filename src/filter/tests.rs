use super::*;
use crate::config::ConfigRegistry;
use crate::context::{ContextBuilder, ExecutionContext, OUTPUT_HEADERS_KEY};
use crate::error::KernelError;
use crate::input::AmbientRequest;
use crate::router::{RouteDetail, RouteMap, Router};
use serde_json::json;
use std::time::Duration;

fn router() -> Router {
    let mut routes = RouteMap::new();
    routes.insert("open".into(), RouteDetail::new("Open"));
    routes.insert(
        "admin".into(),
        RouteDetail::new("Admin").with_access_policy(["admin", "root"]),
    );
    routes.insert(
        "page".into(),
        RouteDetail::new("Page").with_return_type("html"),
    );
    Router::new(routes)
}

fn context(router: &Router, route: &str, strategy: &str, codes: &[&str]) -> ExecutionContext {
    let ambient = AmbientRequest::new();
    ContextBuilder::new(router, &ambient)
        .set_strategy(strategy)
        .unwrap()
        .set_route(route)
        .unwrap()
        .add_acl_codes(codes.iter().copied())
        .no_input_required()
        .build_context()
        .unwrap()
}

#[test]
fn test_acl_public_route_passes() {
    let router = router();
    let mut ctx = context(&router, "open", "console", &[]);
    AclFilter.before(&mut ctx).unwrap();
    assert!(!ctx.is_halted());
}

#[test]
fn test_acl_matching_code_passes() {
    let router = router();
    let mut ctx = context(&router, "admin", "console", &["guest", "root"]);
    AclFilter.before(&mut ctx).unwrap();
    assert!(!ctx.is_halted());
}

#[test]
fn test_acl_missing_code_halts_with_403() {
    let router = router();
    let mut ctx = context(&router, "admin", "ajax", &["guest"]);
    AclFilter.before(&mut ctx).unwrap();
    assert!(ctx.is_halted());
    assert_eq!(ctx.status(), Some(403));
    assert_eq!(ctx.halt_reason(), Some("access denied to route 'admin'"));
}

#[test]
fn test_output_filter_uses_strategy() {
    let router = router();
    let mut ctx = context(&router, "open", "ajax", &[]);
    OutputFilter.after(&mut ctx, Duration::ZERO).unwrap();
    assert_eq!(
        ctx.get(OUTPUT_HEADERS_KEY),
        Some(&json!([["content-type", "application/json"]]))
    );
}

#[test]
fn test_output_filter_prefers_return_type() {
    let router = router();
    let mut ctx = context(&router, "page", "ajax", &[]);
    OutputFilter.after(&mut ctx, Duration::ZERO).unwrap();
    assert_eq!(
        ctx.response_headers(),
        vec![(
            "content-type".to_string(),
            "text/html; charset=utf-8".to_string()
        )]
    );
}

#[test]
fn test_output_filter_keeps_handler_content_type() {
    let router = router();
    let mut ctx = context(&router, "open", "ajax", &[]);
    ctx.add_response_header("Content-Type", "application/problem+json");
    OutputFilter.after(&mut ctx, Duration::ZERO).unwrap();
    assert_eq!(ctx.response_headers().len(), 1);
}

#[test]
fn test_output_filter_types_halted_context_as_json() {
    let router = router();
    let mut ctx = context(&router, "page", "html", &[]);
    ctx.halt("denied");
    OutputFilter.after(&mut ctx, Duration::ZERO).unwrap();
    assert_eq!(
        ctx.response_headers(),
        vec![("content-type".to_string(), "application/json".to_string())]
    );
}

#[test]
fn test_always_run_flags() {
    assert!(!AclFilter.always_run());
    assert!(TracingFilter.always_run());
    assert!(OutputFilter.always_run());
}

#[test]
fn test_registry_builds_in_order() {
    let registry = FilterRegistry::with_builtins();
    let filters = registry.build(&["tracing", "acl", "output"]).unwrap();
    let names: Vec<&str> = filters.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["tracing", "acl", "output"]);
}

#[test]
fn test_registry_unknown_name() {
    let registry = FilterRegistry::with_builtins();
    let err = registry.build(&["acl", "csrf"]).err().unwrap();
    assert!(matches!(err, KernelError::Configuration(msg) if msg.contains("csrf")));
}

#[test]
fn test_registry_from_config() {
    let registry = FilterRegistry::with_builtins();
    let mut config = ConfigRegistry::new();
    assert!(registry.from_config(&config).unwrap().is_empty());
    config.set(INTERCEPTING_FILTERS_KEY, json!(["acl", "output"]));
    assert_eq!(registry.from_config(&config).unwrap().len(), 2);
    config.set(INTERCEPTING_FILTERS_KEY, json!("acl"));
    assert!(registry.from_config(&config).is_err());
}

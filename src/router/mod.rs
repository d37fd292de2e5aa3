//! # Router Module
//!
//! Maps a route key, or a path-like request string, to a handler identity.
//! The router is transport-agnostic: the same lookup serves web, console and
//! API-style requests.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Holding the process-wide route map (route key → [`RouteDetail`])
//! - Parsing path-like strings into a route key plus embedded parameters
//!   ([`RequestUri`])
//! - Resolving the view accumulator for a `(route, strategy)` pair
//!
//! ## Path-like strings
//!
//! ```text
//! my-key/param1/value1/param2/value2          → key "my-key", {param1, param2}
//! param1/value1?routekey=my-key&param2=value2 → key "my-key", {param1, param2}
//! ```
//!
//! ## Example
//!
//! ```rust
//! use brrtkernel::router::{RouteDetail, RouteMap, Router};
//!
//! let mut routes = RouteMap::new();
//! routes.insert("my-key".to_string(), RouteDetail::new("ActionA"));
//! let router = Router::new(routes);
//!
//! let route = router.resolve("my-key/param1/value1").unwrap();
//! assert_eq!(route.handler(), "ActionA");
//! ```
//!
//! ## Concurrency
//!
//! The map is written at startup and read per request. Reads go through an
//! `ArcSwap` snapshot so no lock is taken on the request path.

mod core;
mod uri;
#[cfg(test)]
mod tests;

pub use core::{Route, RouteDetail, RouteMap, Router, ViewFactory, ROUTES_KEY};
pub use uri::{RequestUri, ROUTE_KEY_PARAM};

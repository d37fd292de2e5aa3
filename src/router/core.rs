use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::uri::RequestUri;
use crate::config::ConfigRegistry;
use crate::context::{ViewAccumulator, ViewTemplate};
use crate::error::{KernelError, Result};

/// Config key holding the route map.
pub const ROUTES_KEY: &str = "routes";

/// Registry entry for one route key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RouteDetail {
    /// Handler identity the dispatcher resolves.
    pub handler: String,
    /// ACL codes allowed to reach the handler; empty means public.
    #[serde(default)]
    pub access_policy: Vec<String>,
    /// Declared output type (`json`, `html`, `text`, ...).
    #[serde(default)]
    pub return_type: Option<String>,
}

impl RouteDetail {
    #[must_use]
    pub fn new(handler: &str) -> Self {
        Self {
            handler: handler.to_string(),
            access_policy: Vec::new(),
            return_type: None,
        }
    }

    #[must_use]
    pub fn with_access_policy<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.access_policy = codes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_return_type(mut self, return_type: &str) -> Self {
        self.return_type = Some(return_type.to_string());
        self
    }
}

/// Route key to route detail.
pub type RouteMap = HashMap<String, RouteDetail>;

/// A resolved route. Immutable once produced by the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    key: String,
    detail: RouteDetail,
}

impl Route {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn handler(&self) -> &str {
        &self.detail.handler
    }

    #[must_use]
    pub fn access_policy(&self) -> &[String] {
        &self.detail.access_policy
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.detail.access_policy.is_empty()
    }

    #[must_use]
    pub fn return_type(&self) -> Option<&str> {
        self.detail.return_type.as_deref()
    }
}

/// Builds the view accumulator for a `(route, strategy)` pair.
pub type ViewFactory = Arc<dyn Fn(&Route, &str) -> Box<dyn ViewAccumulator> + Send + Sync>;

/// Maps route keys (or path-like strings) to handler identities.
///
/// The route map is written during startup and read during request handling.
/// Readers load an `Arc` snapshot, so a replacement via [`Router::set_route_map`]
/// never blocks or tears an in-flight lookup.
pub struct Router {
    routes: ArcSwap<RouteMap>,
    views: HashMap<(String, String), ViewFactory>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(RouteMap::new())
    }
}

impl Router {
    #[must_use]
    pub fn new(routes: RouteMap) -> Self {
        info!(routes_count = routes.len(), "Route map loaded");
        Self {
            routes: ArcSwap::from_pointee(routes),
            views: HashMap::new(),
        }
    }

    /// Build a router from the `routes` section of the config registry.
    ///
    /// A missing section yields an empty map; a malformed one is a
    /// configuration error.
    pub fn from_config(config: &ConfigRegistry) -> Result<Self> {
        let Some(value) = config.get(ROUTES_KEY) else {
            warn!("No routes configured");
            return Ok(Self::default());
        };
        let routes: RouteMap = serde_json::from_value(value.clone()).map_err(|e| {
            KernelError::Configuration(format!("'{ROUTES_KEY}' is not a valid route map: {e}"))
        })?;
        Ok(Self::new(routes))
    }

    /// Replace the whole route map.
    pub fn set_route_map(&self, routes: RouteMap) {
        info!(routes_count = routes.len(), "Route map replaced");
        self.routes.store(Arc::new(routes));
    }

    pub fn clear_route_map(&self) {
        self.set_route_map(RouteMap::new());
    }

    /// Add or replace one route.
    pub fn add_route(&self, key: &str, detail: RouteDetail) {
        self.routes.rcu(|current| {
            let mut next = RouteMap::clone(current);
            next.insert(key.to_string(), detail.clone());
            next
        });
        debug!(route = %key, handler = %detail.handler, "Route registered");
    }

    /// Snapshot of the current route map.
    #[must_use]
    pub fn route_map(&self) -> Arc<RouteMap> {
        self.routes.load_full()
    }

    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<Route> {
        self.routes.load().get(key).map(|detail| Route {
            key: key.to_string(),
            detail: detail.clone(),
        })
    }

    /// Resolve a route key or a path-like string to a route.
    ///
    /// Strings containing `/` or `?` are parsed as a [`RequestUri`] and its
    /// route key is looked up; anything else is treated as the key itself.
    pub fn resolve(&self, key_or_path: &str) -> Result<Route> {
        if key_or_path.contains('/') || key_or_path.contains('?') {
            let uri = RequestUri::parse(key_or_path)?;
            return self.resolve_key(uri.route_key());
        }
        let key = key_or_path.trim();
        if key.is_empty() {
            return Err(KernelError::invalid_route(key_or_path, "route key is empty"));
        }
        self.resolve_key(key)
    }

    pub fn resolve_uri(&self, uri: &RequestUri) -> Result<Route> {
        self.resolve_key(uri.route_key())
    }

    /// Resolve an exact route key, without uri parsing.
    pub fn resolve_key(&self, key: &str) -> Result<Route> {
        match self.lookup(key) {
            Some(route) => {
                debug!(route = %key, handler = %route.handler(), "Route resolved");
                Ok(route)
            }
            None => {
                warn!(route = %key, "Route not found");
                Err(KernelError::RouteNotFound {
                    key: key.to_string(),
                })
            }
        }
    }

    /// Register a view factory for a handler identity and strategy.
    pub fn register_view(&mut self, handler: &str, strategy: &str, factory: ViewFactory) {
        self.views
            .insert((handler.to_string(), strategy.to_string()), factory);
    }

    /// View accumulator for the `(route, strategy)` pair.
    ///
    /// Falls back to a [`ViewTemplate`] named `<handler>::<Strategy>View`.
    #[must_use]
    pub fn view_for(&self, route: &Route, strategy: &str) -> Box<dyn ViewAccumulator> {
        let key = (route.handler().to_string(), strategy.to_string());
        match self.views.get(&key) {
            Some(factory) => factory(route, strategy),
            None => Box::new(ViewTemplate::for_route(route, strategy)),
        }
    }
}

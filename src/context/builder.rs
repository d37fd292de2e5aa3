use serde_json::Value;
use tracing::debug;

use super::core::ExecutionContext;
use crate::error::{KernelError, Result};
use crate::ids::ContextId;
use crate::input::{AmbientRequest, InputBundle, InputOverride, ParameterSource, REQUEST_ID};
use crate::router::{RequestUri, Router};

/// Fluent assembler for an [`ExecutionContext`].
///
/// Steps can be called in any order; each records one piece of raw intent.
/// All consistency checks run once, in [`ContextBuilder::build_context`].
///
/// ```no_run
/// # use brrtkernel::context::ContextBuilder;
/// # use brrtkernel::input::AmbientRequest;
/// # use brrtkernel::router::Router;
/// # fn demo(router: &Router) -> brrtkernel::error::Result<()> {
/// let ambient = AmbientRequest::new();
/// let ctx = ContextBuilder::new(router, &ambient)
///     .set_strategy("console")?
///     .set_uri("my-key/param1/value1")?
///     .use_uri_for_input_source()?
///     .build_context()?;
/// assert_eq!(ctx.route_key(), "my-key");
/// # Ok(())
/// # }
/// ```
pub struct ContextBuilder<'a> {
    router: &'a Router,
    ambient: &'a AmbientRequest,
    strategy: Option<String>,
    route_key: Option<String>,
    uri: Option<RequestUri>,
    input: Option<InputBundle>,
    acl_codes: Vec<String>,
}

impl<'a> ContextBuilder<'a> {
    #[must_use]
    pub fn new(router: &'a Router, ambient: &'a AmbientRequest) -> Self {
        Self {
            router,
            ambient,
            strategy: None,
            route_key: None,
            uri: None,
            input: None,
            acl_codes: Vec::new(),
        }
    }

    /// Record the output strategy (`console`, `html`, `ajax`, ...).
    ///
    /// Unknown tags are accepted here and rejected by the output engine.
    pub fn set_strategy(mut self, strategy: &str) -> Result<Self> {
        self.strategy = Some(non_empty("strategy", strategy)?.to_string());
        Ok(self)
    }

    /// Record an explicit route key. Takes precedence over a uri-derived key.
    pub fn set_route(mut self, key: &str) -> Result<Self> {
        self.route_key = Some(non_empty("route key", key)?.to_string());
        Ok(self)
    }

    /// Parse and record a request uri.
    pub fn set_uri(self, uri: &str) -> Result<Self> {
        non_empty("uri", uri)?;
        let parsed = RequestUri::parse(uri)?;
        Ok(self.set_request_uri(parsed))
    }

    #[must_use]
    pub fn set_request_uri(mut self, uri: RequestUri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Feed the ambient raw request path to [`ContextBuilder::set_uri`].
    pub fn use_server_request_uri(self) -> Result<Self> {
        let raw = self.ambient.request_uri()?.to_string();
        self.set_uri(&raw)
    }

    /// Append ACL codes. Repeated calls accumulate.
    #[must_use]
    pub fn add_acl_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.acl_codes.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Method `get`, all five channels empty.
    #[must_use]
    pub fn no_input_required(mut self) -> Self {
        self.input = Some(InputBundle::default());
        self
    }

    /// `get` from the uri's embedded pairs, other channels empty, method `get`.
    pub fn use_uri_for_input_source(mut self) -> Result<Self> {
        let uri = self.uri.as_ref().ok_or_else(|| {
            KernelError::Precondition("a uri must be set before using it as input source".into())
        })?;
        self.input = Some(ParameterSource::from_uri(uri)?);
        Ok(self)
    }

    /// General-purpose input definition. See [`ParameterSource::define`] for
    /// the `get` merge order.
    pub fn define_input(
        mut self,
        method: &str,
        params: InputOverride,
        use_uri_for_get: bool,
    ) -> Result<Self> {
        self.input = Some(ParameterSource::define(
            method,
            params,
            use_uri_for_get,
            self.uri.as_ref(),
        )?);
        Ok(self)
    }

    /// Input from the ambient request snapshot.
    ///
    /// With `use_uri_for_get`, `get` comes from the uri, which is derived from
    /// the ambient raw request path when not already set. Otherwise `get` is
    /// the ambient query parameters.
    pub fn define_input_from_ambient(mut self, use_uri_for_get: bool) -> Result<Self> {
        if use_uri_for_get {
            let uri = ParameterSource::ambient_uri(self.ambient, self.uri.as_ref())?;
            self.input = Some(ParameterSource::from_ambient(self.ambient, Some(&uri))?);
            self.uri = Some(uri);
        } else {
            self.input = Some(ParameterSource::from_ambient(self.ambient, None)?);
        }
        Ok(self)
    }

    /// Validate the gathered state and materialize the context.
    ///
    /// # Errors
    ///
    /// [`KernelError::Precondition`] naming the first missing piece (strategy,
    /// route, input), then any routing error from resolving the route key.
    pub fn build_context(self) -> Result<ExecutionContext> {
        let strategy = self
            .strategy
            .ok_or_else(|| missing("strategy", "set_strategy"))?;
        let key = match (self.route_key, self.uri.as_ref()) {
            (Some(key), _) => key,
            (None, Some(uri)) => uri.route_key().to_string(),
            (None, None) => return Err(missing("route", "set_route or set_uri")),
        };
        let input = self
            .input
            .ok_or_else(|| missing("input", "a define_input step"))?;

        let route = self.router.resolve_key(&key)?;
        let view = self.router.view_for(&route, &strategy);
        let forwarded = self.ambient.server(REQUEST_ID).and_then(Value::as_str);
        let id = ContextId::forwarded_or_new(forwarded);
        debug!(
            context_id = %id,
            route = %route.key(),
            handler = %route.handler(),
            strategy = %strategy,
            method = %input.method(),
            view = %view.name(),
            "Context built"
        );
        Ok(ExecutionContext::new(
            id,
            route,
            strategy,
            input,
            self.acl_codes,
            view,
        ))
    }
}

fn non_empty<'s>(what: &str, value: &'s str) -> Result<&'s str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(KernelError::InvalidArgument(format!(
            "{what} must be a non empty string"
        )));
    }
    Ok(trimmed)
}

fn missing(piece: &str, step: &str) -> KernelError {
    KernelError::Precondition(format!("{piece} has not been set; call {step} first"))
}

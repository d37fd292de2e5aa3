//! Error taxonomy for the dispatch kernel.
//!
//! Every builder step, resolver and dispatch call fails fast with a
//! [`KernelError`]. Nothing here is retried; the outer request shell decides
//! whether to render an error page or abort.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = KernelError> = std::result::Result<T, E>;

/// Errors raised by the kernel.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Malformed caller input to a builder step.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A builder step was invoked before the state it depends on exists.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// The ambient environment or a registry is missing expected data.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The route key is not present in the route registry.
    #[error("route not found: '{key}'")]
    RouteNotFound {
        /// Key that was looked up.
        key: String,
    },

    /// The route string is empty or degenerate.
    #[error("invalid route '{route}': {reason}")]
    InvalidRoute {
        /// Raw route string as supplied.
        route: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The handler identity attached to a route has no registered handler.
    #[error("handler '{handler}' for route '{route}' could not be resolved")]
    HandlerResolution {
        /// Route key being dispatched.
        route: String,
        /// Handler identity from the route detail.
        handler: String,
    },

    /// Opaque failure raised by an external collaborator (handler, filter,
    /// startup task, render adapter).
    #[error("{context}: {source}")]
    Collaborator {
        /// Where the failure surfaced.
        context: String,
        /// The collaborator's own error.
        #[source]
        source: anyhow::Error,
    },
}

impl KernelError {
    pub(crate) fn invalid_route(route: &str, reason: impl Into<String>) -> Self {
        KernelError::InvalidRoute {
            route: route.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn collaborator(context: impl Into<String>, source: anyhow::Error) -> Self {
        KernelError::Collaborator {
            context: context.into(),
            source,
        }
    }

    /// Stable snake_case tag for log fields and error payloads.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            KernelError::InvalidArgument(_) => "invalid_argument",
            KernelError::Precondition(_) => "precondition",
            KernelError::Configuration(_) => "configuration",
            KernelError::RouteNotFound { .. } => "route_not_found",
            KernelError::InvalidRoute { .. } => "invalid_route",
            KernelError::HandlerResolution { .. } => "handler_resolution",
            KernelError::Collaborator { .. } => "collaborator",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(KernelError::Precondition("x".into()).kind(), "precondition");
        assert_eq!(
            KernelError::RouteNotFound { key: "k".into() }.kind(),
            "route_not_found"
        );
        assert_eq!(
            KernelError::invalid_route("", "empty").kind(),
            "invalid_route"
        );
    }

    #[test]
    fn test_collaborator_keeps_source() {
        let err = KernelError::collaborator("task 'db'", anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "task 'db': connection refused");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_route_not_found_message() {
        let err = KernelError::RouteNotFound {
            key: "missing".into(),
        };
        assert_eq!(err.to_string(), "route not found: 'missing'");
    }
}

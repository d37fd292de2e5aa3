use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::{AclFilter, InterceptingFilter, OutputFilter, TracingFilter};
use crate::config::ConfigRegistry;
use crate::error::{KernelError, Result};

/// Config key naming the filters to install, in order.
pub const INTERCEPTING_FILTERS_KEY: &str = "intercepting-filters";

/// Constructs a filter instance.
pub type FilterFactory = Arc<dyn Fn() -> Arc<dyn InterceptingFilter> + Send + Sync>;

/// Name-to-factory table for filters listed in configuration.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    factories: HashMap<String, FilterFactory>,
}

impl FilterRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `acl`, `tracing` and `output` installed.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("acl", Arc::new(|| Arc::new(AclFilter) as Arc<dyn InterceptingFilter>));
        registry.register(
            "tracing",
            Arc::new(|| Arc::new(TracingFilter) as Arc<dyn InterceptingFilter>),
        );
        registry.register(
            "output",
            Arc::new(|| Arc::new(OutputFilter) as Arc<dyn InterceptingFilter>),
        );
        registry
    }

    pub fn register(&mut self, name: &str, factory: FilterFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    /// Instantiate the named filters in order.
    ///
    /// An unknown name is a configuration error.
    pub fn build<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Arc<dyn InterceptingFilter>>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let factory = self.factories.get(name).ok_or_else(|| {
                    KernelError::Configuration(format!("unknown intercepting filter '{name}'"))
                })?;
                debug!(filter = %name, "Filter instantiated");
                Ok(factory())
            })
            .collect()
    }

    /// Instantiate the filters listed under `intercepting-filters`.
    ///
    /// A missing key yields an empty chain.
    pub fn from_config(&self, config: &ConfigRegistry) -> Result<Vec<Arc<dyn InterceptingFilter>>> {
        match config.string_list(INTERCEPTING_FILTERS_KEY)? {
            Some(names) => self.build(&names),
            None => Ok(Vec::new()),
        }
    }
}

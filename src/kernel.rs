//! # Kernel Module
//!
//! [`AppKernel`] is the front controller. It owns the process-scoped state
//! (config registry, route registry, dispatcher, task registry and task status
//! record), runs startup tasks once, and handles built contexts:
//!
//! ```text
//! ContextBuilder ──► AppKernel::handle
//!                      ├─ OutputEngine::for_strategy
//!                      ├─ Dispatcher::dispatch (filters → handler → filters)
//!                      └─ OutputEngine::render
//! ```
//!
//! State is written while the kernel is being assembled and during startup,
//! then only read while requests are handled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::config::ConfigRegistry;
use crate::context::{ContextBuilder, ExecutionContext};
use crate::dispatcher::{Dispatcher, Handler};
use crate::error::{KernelError, Result};
use crate::filter::{FilterRegistry, InterceptingFilter};
use crate::input::AmbientRequest;
use crate::output::{OutputEngine, RenderedOutput};
use crate::router::Router;
use crate::startup::{StartupTask, TaskRegistry, TaskRunner, TaskStatusRecord};

/// Config key holding the application type hint.
pub const APP_TYPE_KEY: &str = "app-type";

pub struct AppKernel {
    config: ConfigRegistry,
    router: Router,
    dispatcher: Dispatcher,
    tasks: TaskRegistry,
    status: Arc<TaskStatusRecord>,
    started: AtomicBool,
    startup_lock: Mutex<()>,
}

impl AppKernel {
    /// Kernel with an empty dispatcher and task registry.
    #[must_use]
    pub fn new(config: ConfigRegistry, router: Router) -> Self {
        Self {
            config,
            router,
            dispatcher: Dispatcher::new(),
            tasks: TaskRegistry::new(),
            status: Arc::new(TaskStatusRecord::new()),
            started: AtomicBool::new(false),
            startup_lock: Mutex::new(()),
        }
    }

    /// Kernel wired from config: routes from `routes`, filter chain from
    /// `intercepting-filters` resolved through `filters`.
    pub fn from_config(config: ConfigRegistry, filters: &FilterRegistry) -> Result<Self> {
        let router = Router::from_config(&config)?;
        let chain = filters.from_config(&config)?;
        let mut kernel = Self::new(config, router);
        for filter in chain {
            kernel.add_filter(filter);
        }
        info!(
            routes = kernel.router.route_map().len(),
            filters = ?kernel.dispatcher.filter_names(),
            "Kernel assembled"
        );
        Ok(kernel)
    }

    /// Share a status record with other kernels or an operator surface.
    #[must_use]
    pub fn with_status_record(mut self, status: Arc<TaskStatusRecord>) -> Self {
        self.status = status;
        self
    }

    pub fn register_handler<H>(&mut self, identity: &str, handler: H)
    where
        H: Handler + 'static,
    {
        self.dispatcher.register_handler(identity, handler);
    }

    pub fn add_filter(&mut self, filter: Arc<dyn InterceptingFilter>) {
        self.dispatcher.add_filter(filter);
    }

    pub fn register_task<T>(&mut self, identity: &str)
    where
        T: StartupTask + Default + 'static,
    {
        self.tasks.register::<T>(identity);
    }

    #[must_use]
    pub fn config(&self) -> &ConfigRegistry {
        &self.config
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn tasks_mut(&mut self) -> &mut TaskRegistry {
        &mut self.tasks
    }

    #[must_use]
    pub fn task_status(&self) -> &TaskStatusRecord {
        &self.status
    }

    /// `app-type` from config, if set to a string.
    #[must_use]
    pub fn app_type(&self) -> Option<&str> {
        self.config.get(APP_TYPE_KEY).and_then(|v| v.as_str())
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Run the configured startup tasks, once.
    ///
    /// Later calls are no-ops returning 0. Concurrent callers wait for the
    /// first run to finish. A failed run leaves the kernel not started.
    pub fn startup(&self, ctx: Option<&ExecutionContext>) -> Result<usize> {
        let _guard = self
            .startup_lock
            .lock()
            .map_err(|_| KernelError::Precondition("an earlier startup run panicked".to_string()))?;
        if self.is_started() {
            debug!("Startup already ran");
            return Ok(0);
        }
        let ran = TaskRunner::new(&self.config, &self.tasks, &self.status)
            .run_configured(ctx.map(ExecutionContext::route), ctx)?;
        self.started.store(true, Ordering::Release);
        info!(tasks = ran, "Startup complete");
        Ok(ran)
    }

    /// Start a context builder over this kernel's router.
    #[must_use]
    pub fn context<'a>(&'a self, ambient: &'a AmbientRequest) -> ContextBuilder<'a> {
        ContextBuilder::new(&self.router, ambient)
    }

    /// Dispatch a built context and render it with its strategy's adapter.
    ///
    /// The adapter is selected before dispatch, so an unknown strategy fails
    /// without running any filter or handler.
    pub fn handle(&self, ctx: &mut ExecutionContext) -> Result<RenderedOutput> {
        if !self.is_started() {
            return Err(KernelError::Precondition(
                "startup must run before contexts are handled".to_string(),
            ));
        }
        let engine = OutputEngine::for_strategy(ctx.strategy())?;
        self.dispatcher.dispatch(ctx)?;
        engine.render(ctx)
    }

    /// Render an error through the engine for the configured app type.
    pub fn render_error(&self, err: &KernelError) -> Result<RenderedOutput> {
        let engine = OutputEngine::from_app_type(self.app_type())?;
        Ok(engine.render_error(&err.to_string()))
    }
}

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::error::{KernelError, Result};
use crate::router::Route;

/// Config values handed to a task, keyed by the names it asked for.
pub type TaskData = IndexMap<String, Value>;

/// One-time process initialization unit.
pub trait StartupTask: Send {
    /// Config keys this task needs. Missing keys are simply absent from the
    /// data passed to [`StartupTask::execute`].
    fn data_keys(&self) -> Vec<String> {
        Vec::new()
    }

    /// Run the task. `route` and `ctx` are present when the run was triggered
    /// from request handling.
    fn execute(
        &mut self,
        data: &TaskData,
        route: Option<&Route>,
        ctx: Option<&ExecutionContext>,
    ) -> anyhow::Result<()>;

    /// Status message after execution, if the task reports one.
    fn status(&self) -> Option<String> {
        None
    }
}

/// Constructs a fresh task instance.
pub type TaskFactory = Arc<dyn Fn() -> Box<dyn StartupTask> + Send + Sync>;

/// Identity-to-factory table used to instantiate configured tasks.
#[derive(Clone, Default)]
pub struct TaskRegistry {
    factories: HashMap<String, TaskFactory>,
}

impl TaskRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_factory(&mut self, identity: &str, factory: TaskFactory) {
        self.factories.insert(identity.to_string(), factory);
    }

    /// Register a task type constructed through `Default`.
    pub fn register<T>(&mut self, identity: &str)
    where
        T: StartupTask + Default + 'static,
    {
        self.register_factory(
            identity,
            Arc::new(|| Box::new(T::default()) as Box<dyn StartupTask>),
        );
    }

    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        self.factories.contains_key(identity)
    }

    /// Instantiate a task. An unknown identity cannot satisfy the startup
    /// task contract and is a configuration error.
    pub fn create(&self, identity: &str) -> Result<Box<dyn StartupTask>> {
        self.factories
            .get(identity)
            .map(|factory| factory())
            .ok_or_else(|| {
                KernelError::Configuration(format!(
                    "'{identity}' is not a registered startup task"
                ))
            })
    }
}

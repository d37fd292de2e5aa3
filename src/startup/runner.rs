use std::time::Instant;
use tracing::{debug, error, info};

use super::core::{StartupTask, TaskData, TaskRegistry};
use super::status::{TaskStatusRecord, DEFAULT_TASK_STATUS};
use crate::config::ConfigRegistry;
use crate::context::ExecutionContext;
use crate::error::{KernelError, Result};
use crate::router::Route;

/// Config key listing startup task identities, in run order.
pub const STARTUP_TASKS_KEY: &str = "startup-tasks";

/// Runs startup tasks strictly in order and records their status.
///
/// The first failing task aborts the run; tasks after it are not started.
pub struct TaskRunner<'a> {
    config: &'a ConfigRegistry,
    registry: &'a TaskRegistry,
    status: &'a TaskStatusRecord,
}

impl<'a> TaskRunner<'a> {
    #[must_use]
    pub fn new(
        config: &'a ConfigRegistry,
        registry: &'a TaskRegistry,
        status: &'a TaskStatusRecord,
    ) -> Self {
        Self {
            config,
            registry,
            status,
        }
    }

    /// Run the tasks listed under `startup-tasks`. Returns how many ran.
    pub fn run_configured(
        &self,
        route: Option<&Route>,
        ctx: Option<&ExecutionContext>,
    ) -> Result<usize> {
        match self.config.string_list(STARTUP_TASKS_KEY)? {
            Some(identities) => self.run_all(&identities, route, ctx),
            None => {
                debug!("No startup tasks configured");
                Ok(0)
            }
        }
    }

    /// Instantiate and run each identity in order. Returns how many ran.
    pub fn run_all<S: AsRef<str>>(
        &self,
        identities: &[S],
        route: Option<&Route>,
        ctx: Option<&ExecutionContext>,
    ) -> Result<usize> {
        info!(task_count = identities.len(), "Running startup tasks");
        for identity in identities {
            let identity = identity.as_ref();
            let mut task = self.registry.create(identity)?;
            self.execute(identity, task.as_mut(), route, ctx)?;
        }
        Ok(identities.len())
    }

    /// Run one already constructed task with no route or context.
    pub fn run_task(&self, identity: &str, task: &mut dyn StartupTask) -> Result<()> {
        self.execute(identity, task, None, None)
    }

    fn execute(
        &self,
        identity: &str,
        task: &mut dyn StartupTask,
        route: Option<&Route>,
        ctx: Option<&ExecutionContext>,
    ) -> Result<()> {
        let keys = task.data_keys();
        let data = if keys.is_empty() {
            TaskData::new()
        } else {
            self.config.collect(&keys)
        };

        let start = Instant::now();
        if let Err(e) = task.execute(&data, route, ctx) {
            error!(
                task = %identity,
                elapsed_ms = start.elapsed().as_millis() as u64,
                error = %e,
                "Startup task failed"
            );
            return Err(KernelError::collaborator(
                format!("startup task '{identity}'"),
                e,
            ));
        }

        let status = task
            .status()
            .unwrap_or_else(|| DEFAULT_TASK_STATUS.to_string());
        self.status.add_status(identity, &status)?;
        info!(
            task = %identity,
            keys_requested = keys.len(),
            keys_found = data.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            status = %status,
            "Startup task completed"
        );
        Ok(())
    }
}

//! # Startup Module
//!
//! One-time process initialization. Tasks are named in the `startup-tasks`
//! config list, instantiated through a [`TaskRegistry`], and run strictly in
//! order by a [`TaskRunner`]. Each task may ask for config values by key and
//! may see the route and context that triggered the run.
//!
//! After every task a status message is recorded in the process-wide
//! [`TaskStatusRecord`]; tasks that report nothing get
//! [`DEFAULT_TASK_STATUS`].
//!
//! This is a fail-fast cold-start gate: the first failing task aborts the run
//! and there is no retry, timeout or cancellation.

mod core;
mod runner;
mod status;

#[cfg(test)]
mod tests;

pub use core::{StartupTask, TaskData, TaskFactory, TaskRegistry};
pub use runner::{TaskRunner, STARTUP_TASKS_KEY};
pub use status::{TaskStatusRecord, DEFAULT_TASK_STATUS};

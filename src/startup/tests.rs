use super::*;
use crate::config::ConfigRegistry;
use crate::error::KernelError;
use crate::router::Route;
use crate::context::ExecutionContext;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct OkTask;

impl StartupTask for OkTask {
    fn execute(
        &mut self,
        _data: &TaskData,
        _route: Option<&Route>,
        _ctx: Option<&ExecutionContext>,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn status(&self) -> Option<String> {
        Some("ok".to_string())
    }
}

#[derive(Default)]
struct SilentTask;

impl StartupTask for SilentTask {
    fn execute(
        &mut self,
        _data: &TaskData,
        _route: Option<&Route>,
        _ctx: Option<&ExecutionContext>,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct FailingTask;

impl StartupTask for FailingTask {
    fn execute(
        &mut self,
        _data: &TaskData,
        _route: Option<&Route>,
        _ctx: Option<&ExecutionContext>,
    ) -> anyhow::Result<()> {
        anyhow::bail!("database unreachable")
    }
}

struct DataTask {
    seen: Arc<Mutex<Option<TaskData>>>,
}

impl StartupTask for DataTask {
    fn data_keys(&self) -> Vec<String> {
        vec!["db-host".to_string(), "missing".to_string()]
    }

    fn execute(
        &mut self,
        data: &TaskData,
        _route: Option<&Route>,
        _ctx: Option<&ExecutionContext>,
    ) -> anyhow::Result<()> {
        *self.seen.lock().unwrap() = Some(data.clone());
        Ok(())
    }
}

fn registry() -> TaskRegistry {
    let mut registry = TaskRegistry::new();
    registry.register::<OkTask>("A");
    registry.register::<SilentTask>("B");
    registry.register::<FailingTask>("Broken");
    registry
}

#[test]
fn test_status_order_and_default() {
    let config = ConfigRegistry::new();
    let registry = registry();
    let status = TaskStatusRecord::new();
    let ran = TaskRunner::new(&config, &registry, &status)
        .run_all(&["A", "B"], None, None)
        .unwrap();
    assert_eq!(ran, 2);
    let list: Vec<(String, String)> = status.list().into_iter().collect();
    assert_eq!(
        list,
        vec![
            ("A".to_string(), "ok".to_string()),
            ("B".to_string(), DEFAULT_TASK_STATUS.to_string()),
        ]
    );
    assert_eq!(DEFAULT_TASK_STATUS, "task run but no status given");
}

#[test]
fn test_failure_aborts_remaining() {
    let config = ConfigRegistry::new();
    let registry = registry();
    let status = TaskStatusRecord::new();
    let err = TaskRunner::new(&config, &registry, &status)
        .run_all(&["A", "Broken", "B"], None, None)
        .unwrap_err();
    assert!(matches!(err, KernelError::Collaborator { .. }));
    assert!(err.to_string().contains("database unreachable"));
    assert_eq!(status.len(), 1);
    assert_eq!(status.status("B"), None);
}

#[test]
fn test_unknown_identity_is_configuration_error() {
    let config = ConfigRegistry::new();
    let registry = registry();
    let status = TaskStatusRecord::new();
    let err = TaskRunner::new(&config, &registry, &status)
        .run_all(&["Nope"], None, None)
        .unwrap_err();
    assert!(matches!(err, KernelError::Configuration(_)));
}

#[test]
fn test_run_configured_reads_list() {
    let mut config = ConfigRegistry::new();
    let registry = registry();
    let status = TaskStatusRecord::new();
    let runner = TaskRunner::new(&config, &registry, &status);
    assert_eq!(runner.run_configured(None, None).unwrap(), 0);

    config.set(STARTUP_TASKS_KEY, json!(["B", "A"]));
    let runner = TaskRunner::new(&config, &registry, &status);
    assert_eq!(runner.run_configured(None, None).unwrap(), 2);
    let keys: Vec<String> = status.list().keys().cloned().collect();
    assert_eq!(keys, vec!["B", "A"]);
}

#[test]
fn test_run_configured_rejects_bad_entries() {
    let mut config = ConfigRegistry::new();
    config.set(STARTUP_TASKS_KEY, json!(["A", ""]));
    let registry = registry();
    let status = TaskStatusRecord::new();
    let err = TaskRunner::new(&config, &registry, &status)
        .run_configured(None, None)
        .unwrap_err();
    assert!(matches!(err, KernelError::Configuration(msg) if msg.contains("index 1")));
    assert!(status.is_empty());
}

#[test]
fn test_data_keys_collected_with_controlled_absence() {
    let mut config = ConfigRegistry::new();
    config.set("db-host", json!("localhost"));
    let registry = TaskRegistry::new();
    let status = TaskStatusRecord::new();
    let seen = Arc::new(Mutex::new(None));
    let mut task = DataTask {
        seen: Arc::clone(&seen),
    };
    TaskRunner::new(&config, &registry, &status)
        .run_task("DataTask", &mut task)
        .unwrap();
    let data = seen.lock().unwrap().clone().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data["db-host"], json!("localhost"));
    assert_eq!(status.status("DataTask").as_deref(), Some(DEFAULT_TASK_STATUS));
}

#[test]
fn test_factory_builds_fresh_instances() {
    let built = Arc::new(AtomicUsize::new(0));
    let mut registry = TaskRegistry::new();
    let counter = Arc::clone(&built);
    registry.register_factory(
        "Counted",
        Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::new(SilentTask) as Box<dyn StartupTask>
        }),
    );
    let config = ConfigRegistry::new();
    let status = TaskStatusRecord::new();
    TaskRunner::new(&config, &registry, &status)
        .run_all(&["Counted", "Counted"], None, None)
        .unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 2);
    assert_eq!(status.len(), 1);
}

#[test]
fn test_status_record_operations() {
    let status = TaskStatusRecord::new();
    assert!(matches!(
        status.add_status("", "x"),
        Err(KernelError::InvalidArgument(_))
    ));
    status.add_status("k", "first").unwrap();
    status.add_status("k", "second").unwrap();
    assert_eq!(status.status("k").as_deref(), Some("second"));
    assert_eq!(status.len(), 1);
    status.clear();
    assert!(status.is_empty());
}

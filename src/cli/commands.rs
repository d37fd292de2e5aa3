use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::ConfigRegistry;
use crate::echo::echo_handler;
use crate::error::KernelError;
use crate::filter::FilterRegistry;
use crate::input::{AmbientRequest, InputChannel, ParamMap};
use crate::kernel::{AppKernel, APP_TYPE_KEY};
use crate::output::{OutputEngine, RenderedOutput};
use crate::runtime_config::{RuntimeConfig, DEFAULT_ENV};
use crate::startup::STARTUP_TASKS_KEY;

/// Command-line interface for the dispatch kernel
#[derive(Parser)]
#[command(name = "brrtkernel")]
#[command(about = "Dispatch routes through the kernel from the command line", long_about = None)]
pub struct Cli {
    /// Sectioned config file (YAML or JSON)
    #[arg(short, long, global = true, env = "BRRTK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Config section applied on top of `common`
    #[arg(short, long, global = true, env = "BRRTK_ENV", default_value = DEFAULT_ENV)]
    pub env: String,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a context from a uri, dispatch it to the echo handler and print
    /// the rendered output
    ///
    /// Application startup tasks are not available here; any listed under
    /// `startup-tasks` are skipped with a warning.
    Dispatch {
        /// Route uri, e.g. `my-key/param1/value1` or `a/b?routekey=my-key`
        uri: String,

        /// Output strategy
        #[arg(short, long, default_value = "console")]
        strategy: String,

        /// ACL codes held by the caller (comma-separated or repeated)
        #[arg(long, value_delimiter = ',')]
        acl: Vec<String>,

        /// Posted parameters as `name=value` (repeatable)
        #[arg(long, value_parser = parse_pair)]
        post: Vec<(String, String)>,
    },
    /// List configured routes
    Routes,
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.to_string())),
        _ => Err(format!("expected name=value, got '{s}'")),
    }
}

/// Run a parsed command, writing its output to stdout.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_cli_with_writer(&cli, &mut out)
}

/// Run a parsed command, writing its output to `out`.
pub fn run_cli_with_writer(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref(), &cli.env, &RuntimeConfig::from_env())?;
    match &cli.command {
        Commands::Routes => {
            let router = crate::router::Router::from_config(&config)?;
            let routes = router.route_map();
            let mut keys: Vec<&String> = routes.keys().collect();
            keys.sort();
            for key in keys {
                let detail = &routes[key];
                let policy = if detail.access_policy.is_empty() {
                    "public".to_string()
                } else {
                    detail.access_policy.join(",")
                };
                writeln!(out, "{key}\t{}\t{policy}", detail.handler)?;
            }
            Ok(())
        }
        Commands::Dispatch {
            uri,
            strategy,
            acl,
            post,
        } => {
            let mut config = config;
            skip_startup_tasks(&mut config)?;
            let mut kernel = AppKernel::from_config(config, &FilterRegistry::with_builtins())?;
            let handlers: Vec<String> = kernel
                .router()
                .route_map()
                .values()
                .map(|d| d.handler.clone())
                .collect();
            for handler in handlers {
                kernel.register_handler(&handler, echo_handler);
            }

            let post: ParamMap = post
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            let ambient = AmbientRequest::from_process().with_channel(InputChannel::Post, post);

            match dispatch(&kernel, &ambient, uri, strategy, acl) {
                Ok(rendered) => {
                    write_rendered(out, &rendered)?;
                    Ok(())
                }
                Err(err) => {
                    let rendered = match OutputEngine::for_strategy(strategy) {
                        Ok(engine) => engine.render_error(&err.to_string()),
                        Err(_) => kernel.render_error(&err)?,
                    };
                    write_rendered(out, &rendered)?;
                    Err(err.into())
                }
            }
        }
    }
}

/// Config from `path`, with `BRRTK_APP_TYPE` filling in a missing `app-type`.
pub(super) fn load_config(
    path: Option<&Path>,
    env: &str,
    runtime: &RuntimeConfig,
) -> anyhow::Result<ConfigRegistry> {
    let mut config = match path {
        Some(path) => ConfigRegistry::load(path, env)?,
        None => ConfigRegistry::new(),
    };
    if let Some(app_type) = &runtime.app_type {
        if !config.contains(APP_TYPE_KEY) {
            config.set(APP_TYPE_KEY, Value::String(app_type.clone()));
        }
    }
    Ok(config)
}

/// The CLI has no application task factories, so configured tasks are dropped.
fn skip_startup_tasks(config: &mut ConfigRegistry) -> Result<(), KernelError> {
    if let Some(tasks) = config.string_list(STARTUP_TASKS_KEY)? {
        if !tasks.is_empty() {
            warn!(?tasks, "Skipping startup tasks in command-line dispatch");
        }
        config.set(STARTUP_TASKS_KEY, Value::Array(Vec::new()));
    }
    Ok(())
}

fn dispatch(
    kernel: &AppKernel,
    ambient: &AmbientRequest,
    uri: &str,
    strategy: &str,
    acl: &[String],
) -> Result<RenderedOutput, KernelError> {
    kernel.startup(None)?;
    let mut ctx = kernel
        .context(ambient)
        .set_strategy(strategy)?
        .set_uri(uri)?
        .add_acl_codes(acl.iter().cloned())
        .define_input_from_ambient(true)?
        .build_context()?;
    kernel.handle(&mut ctx)
}

fn write_rendered(out: &mut dyn Write, rendered: &RenderedOutput) -> std::io::Result<()> {
    if let Some(status) = rendered.status {
        writeln!(out, "status: {status}")?;
        for (name, value) in &rendered.headers {
            writeln!(out, "{name}: {value}")?;
        }
        writeln!(out)?;
    }
    writeln!(out, "{}", rendered.body)
}

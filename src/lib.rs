//! # brrtkernel
//!
//! **brrtkernel** is the request-dispatch kernel of a front-controller
//! application framework. It turns an inbound request (web page, API call or
//! console invocation) into a fully resolved execution context, runs a named
//! handler against it through a chain of intercepting filters, and renders
//! the result with a strategy-selected output adapter.
//!
//! ## Architecture
//!
//! - **[`input`]** - Five-channel input bundle (`get`, `post`, `files`, `cookie`, `argv`)
//!   and the ambient request snapshot it is built from
//! - **[`router`]** - Route registry, route-key resolution and request uri parsing
//! - **[`context`]** - Fluent context builder and the execution context it produces
//! - **[`dispatcher`]** - Filter chain around handler invocation
//! - **[`filter`]** - Built-in intercepting filters (ACL, tracing, output headers)
//! - **[`output`]** - Console and HTTP render adapters behind one output engine
//! - **[`startup`]** - Ordered one-time startup tasks and their status record
//! - **[`config`]** - Sectioned configuration registry
//! - **[`kernel`]** - Front controller tying the pieces together
//!
//! ### Request Handling Flow
//!
//! ```text
//! AmbientRequest ─┐
//!                 ├─► ContextBuilder ──► ExecutionContext
//! Router ─────────┘                          │
//!                                            ▼
//!            Dispatcher: pre filters → handler → post filters
//!                                            │
//!                                            ▼
//!                      OutputEngine (strategy) ──► RenderedOutput
//! ```
//!
//! Startup tasks run once, before any request, and record a status message
//! per task.
//!
//! ## Quick Start
//!
//! ```rust
//! use brrtkernel::config::ConfigRegistry;
//! use brrtkernel::context::ExecutionContext;
//! use brrtkernel::input::AmbientRequest;
//! use brrtkernel::kernel::AppKernel;
//! use brrtkernel::router::{RouteDetail, RouteMap, Router};
//! use serde_json::json;
//!
//! # fn main() -> brrtkernel::error::Result<()> {
//! let mut routes = RouteMap::new();
//! routes.insert("greet".to_string(), RouteDetail::new("Greeter"));
//!
//! let mut kernel = AppKernel::new(ConfigRegistry::new(), Router::new(routes));
//! kernel.register_handler("Greeter", |ctx: &mut ExecutionContext| -> anyhow::Result<()> {
//!     let name = ctx.input().get_or(brrtkernel::input::InputChannel::Get, "name", json!("world"));
//!     ctx.view_mut().assign("greeting", json!(format!("hello {}", name.as_str().unwrap_or("?"))));
//!     Ok(())
//! });
//! kernel.startup(None)?;
//!
//! let ambient = AmbientRequest::new();
//! let mut ctx = kernel
//!     .context(&ambient)
//!     .set_strategy("console")?
//!     .set_uri("greet/name/rust")?
//!     .use_uri_for_input_source()?
//!     .build_context()?;
//! let out = kernel.handle(&mut ctx)?;
//! assert_eq!(out.body, "greeting: hello rust");
//! # Ok(())
//! # }
//! ```
//!
//! ## Runtime Considerations
//!
//! The pipeline is synchronous: one context flows through one dispatch call.
//! Process-wide state (route registry, task status record) is written during
//! startup and read afterwards. Route maps are swapped atomically, so readers
//! never observe a partially written map.
//!
//! Logging is configured through `BRRTK_LOG_*` environment variables, see
//! [`logging`].

pub mod cli;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod echo;
pub mod error;
pub mod filter;
pub mod ids;
pub mod input;
pub mod kernel;
pub mod logging;
pub mod output;
pub mod router;
pub mod runtime_config;
pub mod startup;

pub use error::{KernelError, Result};
pub use kernel::AppKernel;

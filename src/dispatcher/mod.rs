//! # Dispatcher Module
//!
//! Runs one built [`ExecutionContext`](crate::context::ExecutionContext)
//! through the intercepting-filter chain and the handler its route names.
//!
//! ## Request Flow
//!
//! 1. Pre-phase: each filter's `before` runs in declared order until one
//!    halts the context
//! 2. The handler is looked up by the route's handler identity and executed,
//!    unless the context was halted
//! 3. Post-phase: each filter's `after` runs in the same declared order; a
//!    halted context only reaches filters marked always-run
//!
//! ## Handler Registration
//!
//! ```rust
//! use brrtkernel::dispatcher::Dispatcher;
//! use brrtkernel::context::ExecutionContext;
//! use serde_json::json;
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register_handler("ShowPet", |ctx: &mut ExecutionContext| -> anyhow::Result<()> {
//!     ctx.view_mut().assign("id", json!(7));
//!     Ok(())
//! });
//! assert!(dispatcher.has_handler("ShowPet"));
//! ```
//!
//! ## Error Handling
//!
//! - A route whose handler identity is not registered fails with
//!   `HandlerResolution`
//! - Filter and handler errors are wrapped as `Collaborator` errors and
//!   returned unchanged in their `source`
//!
//! The dispatch loop is synchronous; one context flows through one call.

mod core;

pub use core::{Dispatcher, Handler};

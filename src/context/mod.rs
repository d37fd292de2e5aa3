//! # Context Module
//!
//! Turns raw request intent into an [`ExecutionContext`], the per-request
//! unit of state that flows through filters, the handler and the renderer.
//!
//! [`ContextBuilder`] collects the pieces in any order:
//!
//! - strategy: `set_strategy`
//! - route: `set_route`, `set_uri`, `use_server_request_uri`
//! - input: `no_input_required`, `use_uri_for_input_source`, `define_input`,
//!   `define_input_from_ambient`
//! - ACL codes: `add_acl_codes` (optional, additive)
//!
//! and checks them once in `build_context`. A context is never observable
//! without a route, a strategy and a five-channel input bundle.
//!
//! The view accumulator attached to a context comes from the router's view
//! factories; [`ViewTemplate`] is the default.

mod builder;
mod core;
mod view;


pub use builder::ContextBuilder;
pub use core::{ExecutionContext, OUTPUT_HEADERS_KEY, STATUS_KEY};
pub use view::{ViewAccumulator, ViewTemplate};

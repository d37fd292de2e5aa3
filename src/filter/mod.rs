//! # Filter Module
//!
//! Intercepting filters wrap the handler call in the dispatcher. Each filter
//! can inspect or mutate the context before and after the handler, and can
//! halt the chain from `before`.
//!
//! ## Built-in Filters
//!
//! | Name      | Type              | Behaviour                                      |
//! |-----------|-------------------|------------------------------------------------|
//! | `acl`     | [`AclFilter`]     | halts with status 403 when the policy fails    |
//! | `tracing` | [`TracingFilter`] | logs entry and completion with latency         |
//! | `output`  | [`OutputFilter`]  | always-run, emits a `content-type` header      |
//!
//! The chain for a process is read from the `intercepting-filters` config
//! list through a [`FilterRegistry`]; hosts register their own factories next
//! to the built-ins.

mod acl;
mod core;
mod output;
mod registry;
mod tracing;

#[cfg(test)]
mod tests;

pub use acl::AclFilter;
pub use core::InterceptingFilter;
pub use output::OutputFilter;
pub use registry::{FilterFactory, FilterRegistry, INTERCEPTING_FILTERS_KEY};
pub use tracing::TracingFilter;

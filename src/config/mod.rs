//! # Config Module
//!
//! Process-scoped configuration registry consumed by the kernel.
//!
//! Config files are sectioned by environment. The `common` section applies to
//! every environment and the selected section overrides it key by key:
//!
//! ```yaml
//! common:
//!   app-type: app-page
//!   startup-tasks:
//!     - db-startup
//! main:
//!   intercepting-filters: [tracing, acl, output]
//!   routes:
//!     my-key:
//!       handler: ActionA
//!       access-policy: [staff]
//! test:
//!   startup-tasks:
//!     - unit-test-startup
//! ```
//!
//! Startup tasks pull their data from the registry with
//! [`ConfigRegistry::collect`]; keys a task asks for that are not configured
//! are simply absent from the collected map.

mod core;

pub use core::{ConfigRegistry, COMMON_SECTION};

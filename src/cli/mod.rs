//! # CLI Module
//!
//! Command-line front end for the kernel, used by the `brrtkernel` binary.
//!
//! ## Commands
//!
//! ### `dispatch`
//!
//! Build a context from a uri, run startup tasks, dispatch to the echo
//! handler and print the rendered output:
//!
//! ```bash
//! brrtkernel --config app.yaml --env main dispatch "my-key/id/7" --strategy ajax --acl staff
//! ```
//!
//! Options:
//! - `--strategy <TAG>` - Output strategy (default: console)
//! - `--acl <CODES>` - ACL codes held by the caller
//! - `--post <NAME=VALUE>` - Posted parameters, repeatable
//!
//! ### `routes`
//!
//! List configured routes with their handler and access policy:
//!
//! ```bash
//! brrtkernel --config app.yaml routes
//! ```
//!
//! `--config` and `--env` fall back to `BRRTK_CONFIG` and `BRRTK_ENV`.

mod commands;


pub use commands::{run_cli, run_cli_with_writer, Cli, Commands};

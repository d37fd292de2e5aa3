//! # Runtime Configuration Module
//!
//! Environment-variable settings read once at process start.
//!
//! ## Environment Variables
//!
//! ### `BRRTK_ENV`
//!
//! Config section to load on top of `common`. Default: `main`.
//!
//! ### `BRRTK_APP_TYPE`
//!
//! Output type hint: `app-console`, `app-page`, `app-api` or `app-service`.
//! When neither this variable nor the `app-type` config key is set, the
//! output engine falls back to the console adapter.
//!
//! The config file path (`BRRTK_CONFIG`) is read by the CLI argument parser,
//! not here.
//!
//! ## Usage
//!
//! ```rust
//! use brrtkernel::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("env: {}", config.env);
//! ```

use std::env;

/// Default config section.
pub const DEFAULT_ENV: &str = "main";

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Config section selected on top of `common`
    pub env: String,
    /// Output type hint, if any
    pub app_type: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            env: DEFAULT_ENV.to_string(),
            app_type: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let non_empty = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        RuntimeConfig {
            env: non_empty("BRRTK_ENV").unwrap_or_else(|| DEFAULT_ENV.to_string()),
            app_type: non_empty("BRRTK_APP_TYPE"),
        }
    }
}

//! # Output Module
//!
//! Picks the render adapter for a context and turns the handler's view data
//! into transport-ready [`RenderedOutput`].
//!
//! | Strategy                         | App type                           | Adapter                  |
//! |----------------------------------|------------------------------------|--------------------------|
//! | `console`                        | `app-console` (or none)            | [`ConsoleOutputAdapter`] |
//! | `html`                           | `app-page`                         | [`HttpOutputAdapter`] (html) |
//! | `ajax`, `api`, `service`         | `app-api`, `app-service`           | [`HttpOutputAdapter`] (json) |
//!
//! Anything else is a configuration error. HTTP adapters accept the response
//! headers accumulated under the context's `output-headers` key.

mod console;
mod core;
mod engine;
mod http;

pub use console::ConsoleOutputAdapter;
pub use core::{RenderAdapter, RenderedOutput};
pub use engine::OutputEngine;
pub use http::{HttpFormat, HttpOutputAdapter};

//! # Input Module
//!
//! Aggregates request input from five heterogeneous origins into one
//! [`InputBundle`]:
//!
//! | Channel  | Origin                                      |
//! |----------|---------------------------------------------|
//! | `get`    | query parameters, or parameters in the path |
//! | `post`   | posted body parameters                      |
//! | `files`  | uploaded-file descriptors                   |
//! | `cookie` | client-stored key/values                    |
//! | `argv`   | process arguments                           |
//!
//! A finished bundle always carries all five channels, empty ones included.
//!
//! The hosting transport's raw values are captured once in an
//! [`AmbientRequest`] snapshot; [`ParameterSource`] turns the snapshot, an
//! explicit override map, or a parsed request uri into a bundle.

mod ambient;
mod core;
mod source;

pub use ambient::{AmbientRequest, QUERY_STRING, REQUEST_ID, REQUEST_METHOD, REQUEST_URI};
pub use core::{InputBundle, InputChannel, InputOverride, ParamMap};
pub use source::ParameterSource;

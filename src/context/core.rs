use serde_json::{json, Value};
use std::fmt;

use super::view::ViewAccumulator;
use crate::ids::ContextId;
use crate::input::{InputBundle, ParamMap};
use crate::router::Route;

/// Output-state key under which response headers accumulate.
pub const OUTPUT_HEADERS_KEY: &str = "output-headers";

/// Output-state key holding the status code set by filters or handlers.
pub const STATUS_KEY: &str = "status";

/// The unit of work flowing through filters, the handler and the renderer.
///
/// Only [`ContextBuilder`](super::ContextBuilder) creates one, so route,
/// strategy and input are always present. Route and input are read-only after
/// build; the view accumulator and output state are the handler's to write.
pub struct ExecutionContext {
    id: ContextId,
    route: Route,
    strategy: String,
    input: InputBundle,
    acl_codes: Vec<String>,
    view: Box<dyn ViewAccumulator>,
    output_state: ParamMap,
    halted: Option<String>,
}

impl ExecutionContext {
    pub(crate) fn new(
        id: ContextId,
        route: Route,
        strategy: String,
        input: InputBundle,
        acl_codes: Vec<String>,
        view: Box<dyn ViewAccumulator>,
    ) -> Self {
        Self {
            id,
            route,
            strategy,
            input,
            acl_codes,
            view,
            output_state: ParamMap::new(),
            halted: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> ContextId {
        self.id
    }

    #[must_use]
    pub fn route_key(&self) -> &str {
        self.route.key()
    }

    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    #[must_use]
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    #[must_use]
    pub fn input(&self) -> &InputBundle {
        &self.input
    }

    #[must_use]
    pub fn acl_codes(&self) -> &[String] {
        &self.acl_codes
    }

    #[must_use]
    pub fn has_acl_code(&self, code: &str) -> bool {
        self.acl_codes.iter().any(|c| c == code)
    }

    #[must_use]
    pub fn view(&self) -> &dyn ViewAccumulator {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> &mut dyn ViewAccumulator {
        self.view.as_mut()
    }

    #[must_use]
    pub fn output_state(&self) -> &ParamMap {
        &self.output_state
    }

    pub fn output_state_mut(&mut self) -> &mut ParamMap {
        &mut self.output_state
    }

    /// Read one output-state entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.output_state.get(key)
    }

    /// Write one output-state entry.
    pub fn set(&mut self, key: &str, value: Value) {
        self.output_state.insert(key.to_string(), value);
    }

    /// Append a `[name, value]` pair to the `output-headers` list.
    pub fn add_response_header(&mut self, name: &str, value: &str) {
        let entry = self
            .output_state
            .entry(OUTPUT_HEADERS_KEY.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }
        if let Value::Array(list) = entry {
            list.push(json!([name, value]));
        }
    }

    /// Headers accumulated so far, in insertion order.
    ///
    /// Entries that are not `[string, string]` pairs are skipped.
    #[must_use]
    pub fn response_headers(&self) -> Vec<(String, String)> {
        let Some(Value::Array(list)) = self.output_state.get(OUTPUT_HEADERS_KEY) else {
            return Vec::new();
        };
        list.iter()
            .filter_map(|pair| match pair.as_array().map(Vec::as_slice) {
                Some([Value::String(name), Value::String(value)]) => {
                    Some((name.clone(), value.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// HTTP-style status recorded in output state, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.output_state
            .get(STATUS_KEY)
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
    }

    /// Mark the context halted. The handler and remaining pre-filters are
    /// skipped; only always-run post filters still see it.
    pub fn halt(&mut self, reason: impl Into<String>) {
        self.halted = Some(reason.into());
    }

    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    #[must_use]
    pub fn halt_reason(&self) -> Option<&str> {
        self.halted.as_deref()
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("id", &self.id)
            .field("route", &self.route.key())
            .field("strategy", &self.strategy)
            .field("method", &self.input.method())
            .field("acl_codes", &self.acl_codes)
            .field("view", &self.view.name())
            .field("halted", &self.halted)
            .finish()
    }
}

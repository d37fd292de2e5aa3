use serde_json::Value;
use std::fmt;

use crate::input::ParamMap;
use crate::router::Route;

/// Output accumulator a handler writes its results into.
///
/// One is attached to every execution context, chosen for the
/// `(route, strategy)` pair by the router.
pub trait ViewAccumulator: Send + Sync + fmt::Debug {
    /// Identity of the view, e.g. `ActionA::HtmlView`.
    fn name(&self) -> &str;

    fn assign(&mut self, key: &str, value: Value);

    fn get(&self, key: &str) -> Option<&Value>;

    /// Data handed to the render adapter.
    fn build(&self) -> Value;
}

/// Default key/value view.
///
/// Builds to the assigned map, or to the raw content string when one was set
/// with [`ViewTemplate::set_content`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewTemplate {
    name: String,
    data: ParamMap,
    content: Option<String>,
}

impl ViewTemplate {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// `<handler>::<Strategy>View`, e.g. `ActionA::ConsoleView`.
    #[must_use]
    pub fn for_route(route: &Route, strategy: &str) -> Self {
        Self::new(&format!("{}::{}View", route.handler(), capitalize(strategy)))
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = Some(content.into());
    }

    #[must_use]
    pub fn data(&self) -> &ParamMap {
        &self.data
    }
}

impl ViewAccumulator for ViewTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn assign(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    fn build(&self) -> Value {
        match &self.content {
            Some(content) => Value::String(content.clone()),
            None => Value::Object(
                self.data
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assign_and_build() {
        let mut view = ViewTemplate::new("v");
        view.assign("b", json!(2));
        view.assign("a", json!(1));
        assert_eq!(view.get("a"), Some(&json!(1)));
        assert_eq!(view.build(), json!({"b": 2, "a": 1}));
    }

    #[test]
    fn test_content_overrides_data() {
        let mut view = ViewTemplate::new("v");
        view.assign("a", json!(1));
        view.set_content("<p>hi</p>");
        assert_eq!(view.build(), json!("<p>hi</p>"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("ajax"), "Ajax");
        assert_eq!(capitalize(""), "");
    }
}

use indexmap::IndexMap;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{KernelError, Result};

/// Section applied to every environment before the environment's own section.
pub const COMMON_SECTION: &str = "common";

/// Process-scoped configuration values.
///
/// Populated once during startup and read afterwards. Keys are flat; values
/// are arbitrary JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigRegistry {
    values: IndexMap<String, Value>,
}

impl ConfigRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a flat JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self {
                values: map.into_iter().collect(),
            }),
            other => Err(KernelError::Configuration(format!(
                "config document must be a map, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Build a registry from a sectioned document.
    ///
    /// The `common` section is applied first, then `env` overrides it key by
    /// key. At least one of the two sections must exist.
    pub fn from_sections(doc: &Value, env: &str) -> Result<Self> {
        let Value::Object(sections) = doc else {
            return Err(KernelError::Configuration(format!(
                "config document must be a map of sections, got {}",
                type_name(doc)
            )));
        };

        let common = sections.get(COMMON_SECTION);
        let specific = sections.get(env);
        if common.is_none() && specific.is_none() {
            return Err(KernelError::Configuration(format!(
                "config has neither a '{COMMON_SECTION}' nor a '{env}' section"
            )));
        }

        let mut registry = Self::new();
        for (name, section) in [(COMMON_SECTION, common), (env, specific)] {
            let Some(section) = section else { continue };
            let Value::Object(map) = section else {
                return Err(KernelError::Configuration(format!(
                    "config section '{name}' must be a map"
                )));
            };
            for (k, v) in map {
                registry.values.insert(k.clone(), v.clone());
            }
        }
        debug!(env = %env, keys = registry.len(), "Config sections merged");
        Ok(registry)
    }

    /// Load a sectioned YAML or JSON file and select `env`.
    pub fn load<P: AsRef<Path>>(path: P, env: &str) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            KernelError::Configuration(format!("cannot read config '{}': {e}", path.display()))
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let doc: Value = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| {
                KernelError::Configuration(format!("invalid yaml in '{}': {e}", path.display()))
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| {
                KernelError::Configuration(format!("invalid json in '{}': {e}", path.display()))
            })?
        };

        let registry = Self::from_sections(&doc, env)?;
        info!(path = %path.display(), env = %env, keys = registry.len(), "Config loaded");
        Ok(registry)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Value for `key`, or `default` when absent.
    #[must_use]
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.values.get(key).cloned().unwrap_or(default)
    }

    /// Values for the requested keys. Missing keys are left out.
    #[must_use]
    pub fn collect<S: AsRef<str>>(&self, keys: &[S]) -> IndexMap<String, Value> {
        keys.iter()
            .filter_map(|k| {
                let k = k.as_ref();
                self.values.get(k).map(|v| (k.to_string(), v.clone()))
            })
            .collect()
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read `key` as a list of non-empty strings.
    ///
    /// Absent keys give `Ok(None)`. A non-list value or a bad entry is a
    /// configuration error naming the offending index.
    pub fn string_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        let Some(value) = self.values.get(key) else {
            return Ok(None);
        };
        let Value::Array(items) = value else {
            return Err(KernelError::Configuration(format!(
                "'{key}' must be a list, got {}",
                type_name(value)
            )));
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| match item.as_str() {
                Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
                _ => Err(KernelError::Configuration(format!(
                    "'{key}' entry at index {index} must be a non empty string"
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

// Read-only view over a deployment manifest property fragment

use serde_json::Value;

use crate::error::{ResolveError, Result};

/// Immutable property tree, addressed by dotted paths.
///
/// Values are normalized to `serde_json::Value` regardless of the input
/// format, so YAML and JSON manifests resolve identically. A `null` stored
/// at a path counts as absent: operators delete a value by setting it to
/// `~` as often as by removing the key.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    root: Value,
}

impl PropertySet {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self {
            root: Value::Object(serde_json::Map::new()),
        }
    }

    /// Wrap an already-parsed value tree.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Parse a YAML manifest fragment.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ResolveError::Parse(e.to_string()))?;
        let root = serde_json::to_value(yaml).map_err(|e| ResolveError::Parse(e.to_string()))?;
        Ok(Self { root })
    }

    /// Parse a JSON manifest fragment.
    pub fn from_json(content: &str) -> Result<Self> {
        let root = serde_json::from_str(content).map_err(|e| ResolveError::Parse(e.to_string()))?;
        Ok(Self { root })
    }

    /// Look up a dotted path. Returns `None` when the path is missing or
    /// the stored value is `null`. A numeric segment indexes into an array
    /// when the intermediate node is array-typed.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut node = &self.root;
        for segment in path.split('.') {
            node = match node {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => {
                    let index: usize = segment.parse().ok()?;
                    items.get(index)?
                }
                _ => return None,
            };
        }
        if node.is_null() { None } else { Some(node) }
    }

    /// Whether a non-null value exists at the path.
    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// String value at the path, if present and string-typed.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Integer value at the path, if present and integer-typed.
    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(Value::as_i64)
    }

    /// Boolean value at the path, if present and boolean-typed.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// The underlying value tree.
    pub fn root(&self) -> &Value {
        &self.root
    }
}

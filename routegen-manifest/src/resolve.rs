// Three-tier value resolution: property > link > default

use serde_json::Value;
use tracing::debug;

use crate::error::ResolveError;
use crate::link_set::LinkSet;
use crate::property_set::PropertySet;

/// Where to look for one logical setting.
#[derive(Debug, Clone)]
pub struct Lookup {
    /// Human-readable description used in the missing-value error.
    pub description: String,
    /// Dotted property path in the deployment manifest.
    pub property: String,
    /// Namespace of the link that may supply the value.
    pub link_namespace: String,
    /// Dotted path inside the link's exported properties.
    pub link_path: String,
    /// Static fallback when neither source has the value.
    pub default: Option<Value>,
}

impl Lookup {
    /// The link namespace defaults to the first segment of `link_path`.
    pub fn new(
        description: impl Into<String>,
        property: impl Into<String>,
        link_path: impl Into<String>,
    ) -> Self {
        let link_path = link_path.into();
        let link_namespace = link_path.split('.').next().unwrap_or_default().to_string();
        Self {
            description: description.into(),
            property: property.into(),
            link_namespace,
            link_path,
            default: None,
        }
    }

    /// Override the namespace when it differs from the link path prefix
    /// (e.g. the `nats-tls` link exports paths under `nats.`).
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.link_namespace = namespace.into();
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    fn missing(&self) -> ResolveError {
        ResolveError::MissingConfiguration {
            description: self.description.clone(),
            property: self.property.clone(),
            namespace: self.link_namespace.clone(),
        }
    }
}

/// Outcome of resolving one setting, tagged with the winning source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Property(Value),
    Link(Value),
    Default(Value),
    Missing,
}

impl Resolution {
    /// The resolved value, regardless of source.
    pub fn value(self) -> Option<Value> {
        match self {
            Resolution::Property(v) | Resolution::Link(v) | Resolution::Default(v) => Some(v),
            Resolution::Missing => None,
        }
    }

    /// The resolved value, or the canonical missing-configuration error.
    pub fn required(self, lookup: &Lookup) -> Result<Value, ResolveError> {
        self.value().ok_or_else(|| lookup.missing())
    }

    pub fn source(&self) -> &'static str {
        match self {
            Resolution::Property(_) => "property",
            Resolution::Link(_) => "link",
            Resolution::Default(_) => "default",
            Resolution::Missing => "missing",
        }
    }
}

/// Resolve one setting. Precedence is always property > link > default,
/// independent of the field.
pub fn resolve(props: &PropertySet, links: &LinkSet, lookup: &Lookup) -> Resolution {
    let resolution = if let Some(v) = props.get(&lookup.property) {
        Resolution::Property(v.clone())
    } else if let Some(v) = links.get(&lookup.link_namespace, &lookup.link_path) {
        Resolution::Link(v.clone())
    } else if let Some(v) = &lookup.default {
        Resolution::Default(v.clone())
    } else {
        Resolution::Missing
    };

    debug!(
        property = %lookup.property,
        source = resolution.source(),
        "resolved setting"
    );
    resolution
}

// Links consumed from other deployment jobs

use std::collections::HashMap;

use serde_json::Value;

use crate::property_set::PropertySet;

/// One instance of the job exporting a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInstance {
    pub address: String,
    pub index: u32,
}

impl LinkInstance {
    pub fn new(address: impl Into<String>, index: u32) -> Self {
        Self {
            address: address.into(),
            index,
        }
    }
}

/// A named property export consumed from another job.
#[derive(Debug, Clone)]
pub struct Link {
    name: String,
    properties: PropertySet,
    instances: Vec<LinkInstance>,
}

impl Link {
    pub fn new(name: impl Into<String>, properties: PropertySet) -> Self {
        Self {
            name: name.into(),
            properties,
            instances: Vec::new(),
        }
    }

    pub fn with_instances(mut self, instances: Vec<LinkInstance>) -> Self {
        self.instances = instances;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted-path lookup into the link's exported properties.
    pub fn property(&self, path: &str) -> Option<&Value> {
        self.properties.get(path)
    }

    pub fn instances(&self) -> &[LinkInstance] {
        &self.instances
    }
}

/// All links consumed for one render, keyed by namespace.
///
/// An absent namespace means the link was not consumed at all, which is
/// distinct from a consumed link that does not expose a particular path.
#[derive(Debug, Clone, Default)]
pub struct LinkSet {
    links: HashMap<String, Link>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, link: Link) {
        self.links.insert(link.name().to_string(), link);
    }

    pub fn with(mut self, link: Link) -> Self {
        self.add(link);
        self
    }

    pub fn link(&self, namespace: &str) -> Option<&Link> {
        self.links.get(namespace)
    }

    pub fn is_consumed(&self, namespace: &str) -> bool {
        self.links.contains_key(namespace)
    }

    /// Value exported at `path` by the link in `namespace`, if both exist.
    pub fn get(&self, namespace: &str, path: &str) -> Option<&Value> {
        self.links.get(namespace)?.property(path)
    }
}

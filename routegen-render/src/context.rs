// Render context

/// Ambient facts about the instance a job is rendered for.
///
/// The default address matches the one the template test harness
/// supplies, so tests can use `InstanceInfo::default()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceInfo {
    pub address: String,
}

impl Default for InstanceInfo {
    fn default() -> Self {
        Self {
            address: "192.168.0.0".to_string(),
        }
    }
}

impl InstanceInfo {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

// Per-job settings document builders

pub mod gorouter;
pub mod route_registrar;
pub mod routing_api;
pub mod tcp_router;

use routegen_manifest::{resolve, LinkSet, Lookup, PropertySet};
use serde_json::Value;

use crate::error::Result;

/// Resolve a required setting through the property > link > default chain.
fn required(props: &PropertySet, links: &LinkSet, lookup: &Lookup) -> Result<Value> {
    Ok(resolve(props, links, lookup).required(lookup)?)
}

/// Resolve an optional setting to its value, if any source has one.
fn optional(props: &PropertySet, links: &LinkSet, lookup: &Lookup) -> Option<Value> {
    resolve(props, links, lookup).value()
}

//! Deployment manifest model and value resolution
//!
//! A render starts from two inputs: the property fragment of the deployment
//! manifest ([`PropertySet`]) and the set of links consumed from other jobs
//! ([`LinkSet`]). Every logical setting is resolved through the same
//! three-tier chain (explicit property, then link, then static default)
//! and the outcome is tagged with the source that won ([`Resolution`]).
//!
//! # Examples
//!
//! ```
//! use routegen_manifest::{Lookup, LinkSet, PropertySet, resolve, Resolution};
//!
//! let props = PropertySet::from_yaml("routing_api:\n  port: 3000\n").unwrap();
//! let links = LinkSet::new();
//!
//! let lookup = Lookup::new("Routing API port", "routing_api.port", "routing_api.mtls_port");
//! match resolve(&props, &links, &lookup) {
//!     Resolution::Property(v) => assert_eq!(v, serde_json::json!(3000)),
//!     _ => unreachable!(),
//! }
//! ```

pub mod error;
pub mod link_set;
pub mod nats;
pub mod property_set;
pub mod resolve;

pub use error::{ResolveError, Result};
pub use link_set::{Link, LinkInstance, LinkSet};
pub use nats::{select_message_bus, MessageBusServer, NatsSelection, NATS_DEPRECATION_MESSAGE};
pub use property_set::PropertySet;
pub use resolve::{resolve, Lookup, Resolution};

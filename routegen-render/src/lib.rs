//! Settings document rendering for the routing tier.
//!
//! Each job builder takes the deployment [`PropertySet`], the consumed
//! [`LinkSet`], and the [`InstanceInfo`] of the rendering instance, and
//! produces a [`RenderedJob`]: the main settings document plus any secret
//! files the job expects on disk.
//!
//! ```
//! use routegen_manifest::{LinkSet, PropertySet};
//! use routegen_render::{jobs, InstanceInfo};
//! use serde_json::json;
//!
//! let props = PropertySet::from_value(json!({
//!     "routing_api": {
//!         "system_domain": "example.com",
//!         "mtls_ca": "ca", "mtls_server_cert": "cert", "mtls_server_key": "key",
//!         "mtls_client_cert": "cert", "mtls_client_key": "key",
//!         "locket": { "api_location": "127.0.0.1:8891" },
//!     },
//!     "uaa": { "tls_port": 8443 },
//! }));
//! let links = LinkSet::new();
//! let job = jobs::routing_api::render(&props, &links, &InstanceInfo::default()).unwrap();
//! assert_eq!(job.name, "routing-api");
//! ```

pub mod artifact;
pub mod context;
pub mod derive;
pub mod error;
pub mod jobs;

pub use artifact::{Artifact, RenderedJob};
pub use context::InstanceInfo;
pub use error::{RenderError, Result};

pub use routegen_manifest::{Link, LinkInstance, LinkSet, PropertySet};

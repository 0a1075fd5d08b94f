// Composite NATS / NATS-TLS link selection

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ResolveError, Result};
use crate::link_set::{Link, LinkSet};
use crate::property_set::PropertySet;

/// Fixed deprecation text raised when the legacy `nats` link is selected
/// while `nats.fail_if_using_nats_without_tls` is set.
pub const NATS_DEPRECATION_MESSAGE: &str = "\
Using nats (instead of nats-tls) is deprecated. The nats process will
be removed soon. Please migrate to using nats-tls as soon as possible.
If you must continue using nats for a short time you can set the
nats.fail_if_using_nats_without_tls property on route_registrar to
false.
";

/// One message-bus server derived from the selected link.
///
/// `user` and `password` are omitted from serialized output, not rendered
/// as empty strings, when the link does not carry them.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MessageBusServer {
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Outcome of choosing between the legacy `nats` link and `nats-tls`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatsSelection {
    /// Namespace of the link that won (`nats` or `nats-tls`).
    pub namespace: &'static str,
    /// Whether mutual TLS is enabled for the message bus.
    pub tls_enabled: bool,
    pub servers: Vec<MessageBusServer>,
}

/// Pick the message-bus link for a render.
///
/// `nats-tls` wins only when the `nats.tls.enabled` property flag is set;
/// otherwise the legacy `nats` link is used when consumed. Falling back to
/// the legacy link while `nats.fail_if_using_nats_without_tls` is true is
/// a hard failure even though a usable value is present.
pub fn select_message_bus(props: &PropertySet, links: &LinkSet) -> Result<NatsSelection> {
    let tls_enabled = props.get_bool("nats.tls.enabled").unwrap_or(false);
    let fail_if_legacy = props
        .get_bool("nats.fail_if_using_nats_without_tls")
        .unwrap_or(false);

    if tls_enabled {
        if let Some(link) = links.link("nats-tls") {
            debug!("message bus: nats-tls link selected");
            return Ok(NatsSelection {
                namespace: "nats-tls",
                tls_enabled: true,
                servers: servers_from(link),
            });
        }
    }

    if let Some(link) = links.link("nats") {
        if fail_if_legacy {
            return Err(ResolveError::Deprecated(NATS_DEPRECATION_MESSAGE.to_string()));
        }
        warn!("message bus: using the deprecated plaintext nats link");
        return Ok(NatsSelection {
            namespace: "nats",
            tls_enabled: false,
            servers: servers_from(link),
        });
    }

    // Only nats-tls is consumed: use it even without the property flag.
    if let Some(link) = links.link("nats-tls") {
        debug!("message bus: nats-tls link selected");
        return Ok(NatsSelection {
            namespace: "nats-tls",
            tls_enabled,
            servers: servers_from(link),
        });
    }

    Ok(NatsSelection {
        namespace: "nats",
        tls_enabled,
        servers: Vec::new(),
    })
}

fn servers_from(link: &Link) -> Vec<MessageBusServer> {
    let hostname = link
        .property("nats.hostname")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .or_else(|| link.instances().first().map(|i| i.address.clone()));

    let Some(hostname) = hostname else {
        return Vec::new();
    };

    let host = match link.property("nats.port").and_then(|v| v.as_i64()) {
        Some(port) => format!("{hostname}:{port}"),
        None => hostname,
    };

    vec![MessageBusServer {
        host,
        user: link
            .property("nats.user")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        password: link
            .property("nats.password")
            .and_then(|v| v.as_str())
            .map(str::to_string),
    }]
}

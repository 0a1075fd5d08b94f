// tcp_router.yml builder

use serde_json::{json, Map, Value};
use tracing::debug;

use routegen_manifest::{LinkSet, Lookup, PropertySet};
use routegen_validation::{check_all, TCP_ROUTER_RULES};

use crate::artifact::{Artifact, RenderedJob};
use crate::context::InstanceInfo;
use crate::error::Result;
use crate::jobs::required;

const DOCUMENT_PATH: &str = "/var/vcap/jobs/tcp_router/config/tcp_router.yml";
const CLIENT_CERT_PATH: &str = "/var/vcap/jobs/tcp_router/config/certs/routing-api/client.crt";
const CLIENT_KEY_PATH: &str = "/var/vcap/jobs/tcp_router/config/keys/routing-api/client.key";
const CA_CERT_PATH: &str = "/var/vcap/jobs/tcp_router/config/certs/routing-api/ca_cert.crt";
const HAPROXY_PID_FILE: &str = "/var/vcap/data/tcp_router/config/haproxy.pid";
const ROUTING_API_URI: &str = "https://routing-api.service.cf.internal";
const UAA_TOKEN_ENDPOINT: &str = "uaa.service.cf.internal";

pub fn render(
    props: &PropertySet,
    links: &LinkSet,
    _instance: &InstanceInfo,
) -> Result<RenderedJob> {
    check_all(props.root(), TCP_ROUTER_RULES)?;

    let port = Lookup::new("Routing API port", "routing_api.port", "routing_api.mtls_port");
    let client_cert = Lookup::new(
        "Routing API client certificate",
        "routing_api.client_cert",
        "routing_api.mtls_client_cert",
    );
    let client_key = Lookup::new(
        "Routing API client private key",
        "routing_api.client_private_key",
        "routing_api.mtls_client_key",
    );
    let ca_cert = Lookup::new(
        "Routing API server ca certificate",
        "routing_api.ca_cert",
        "routing_api.mtls_ca",
    );
    // Property path has no prefix; only the link nests it under routing_api.
    let reserved_ports = Lookup::new(
        "Reserved system component ports",
        "reserved_system_component_ports",
        "routing_api.reserved_system_component_ports",
    )
    .default_value(json!([]));

    let mut doc = Map::new();
    doc.insert(
        "isolation_segments".into(),
        props
            .get("tcp_router.isolation_segments")
            .cloned()
            .unwrap_or_else(|| json!([])),
    );
    doc.insert("haproxy_pid_file".into(), json!(HAPROXY_PID_FILE));
    doc.insert("oauth".into(), oauth_block(props, links)?);
    doc.insert(
        "reserved_system_component_ports".into(),
        required(props, links, &reserved_ports)?,
    );
    doc.insert(
        "routing_api".into(),
        json!({
            "uri": ROUTING_API_URI,
            "port": required(props, links, &port)?,
            "auth_disabled": props.get_bool("routing_api.auth_disabled").unwrap_or(false),
            "client_cert_path": CLIENT_CERT_PATH,
            "ca_cert_path": CA_CERT_PATH,
            "client_private_key_path": CLIENT_KEY_PATH,
        }),
    );
    if let Some(address) = props.get_str("tcp_router.debug_address") {
        doc.insert("debug_address".into(), json!(address));
    }

    let secrets = vec![
        secret(CLIENT_CERT_PATH, required(props, links, &client_cert)?),
        secret(CLIENT_KEY_PATH, required(props, links, &client_key)?),
        secret(CA_CERT_PATH, required(props, links, &ca_cert)?),
    ];

    let document = serde_yaml::to_string(&Value::Object(doc))?;
    debug!(job = "tcp_router", "rendered settings document");

    Ok(RenderedJob {
        name: "tcp_router".to_string(),
        document: Artifact::new(DOCUMENT_PATH, document),
        secrets,
    })
}

fn secret(path: &str, material: Value) -> Artifact {
    Artifact::new(path, material.as_str().unwrap_or_default())
}

/// An empty `oauth_secret` renders as null, not as an empty string.
fn oauth_block(props: &PropertySet, links: &LinkSet) -> Result<Value> {
    let uaa_port = Lookup::new("UAA TLS port", "uaa.tls_port", "uaa.tls_port");
    let client_secret = props
        .get_str("tcp_router.oauth_secret")
        .filter(|s| !s.is_empty())
        .map_or(Value::Null, |s| json!(s));
    Ok(json!({
        "token_endpoint": UAA_TOKEN_ENDPOINT,
        "client_name": "tcp_router",
        "client_secret": client_secret,
        "port": required(props, links, &uaa_port)?,
        "skip_ssl_validation": props.get_bool("tcp_router.oauth.skip_ssl_validation").unwrap_or(false),
    }))
}

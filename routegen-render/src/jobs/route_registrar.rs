// registrar_settings.json builder

use serde_json::{json, Map, Value};
use tracing::debug;

use routegen_manifest::{select_message_bus, LinkSet, Lookup, PropertySet};
use routegen_validation::{provided, ValidationError};

use crate::artifact::{Artifact, RenderedJob};
use crate::context::InstanceInfo;
use crate::derive::duration;
use crate::error::Result;
use crate::jobs::optional;

const DOCUMENT_PATH: &str = "/var/vcap/jobs/route_registrar/config/registrar_settings.json";
const ROUTING_API_CA_PATH: &str = "/var/vcap/jobs/route_registrar/config/certs/ca.crt";
const CLIENT_CERT_PATH: &str =
    "/var/vcap/jobs/route_registrar/config/routing_api/certs/client.crt";
const CLIENT_KEY_PATH: &str =
    "/var/vcap/jobs/route_registrar/config/routing_api/keys/client_private.key";
const SERVER_CA_PATH: &str =
    "/var/vcap/jobs/route_registrar/config/routing_api/certs/server_ca.crt";
const NATS_CLIENT_CERT_PATH: &str =
    "/var/vcap/jobs/route_registrar/config/nats/certs/client.crt";
const NATS_CLIENT_KEY_PATH: &str =
    "/var/vcap/jobs/route_registrar/config/nats/certs/client_private.key";
const NATS_SERVER_CA_PATH: &str =
    "/var/vcap/jobs/route_registrar/config/nats/certs/server_ca.crt";
const DEFAULT_API_URL: &str = "https://routing-api.service.cf.internal:3001";
const DEFAULT_OAUTH_URL: &str = "https://uaa.service.cf.internal:8443";

pub fn render(
    props: &PropertySet,
    links: &LinkSet,
    instance: &InstanceInfo,
) -> Result<RenderedJob> {
    let selection = select_message_bus(props, links)?;

    let routes = validated_routes(props)?;

    let mut doc = Map::new();
    doc.insert("host".into(), json!(instance.address));
    doc.insert(
        "message_bus_servers".into(),
        serde_json::to_value(&selection.servers)?,
    );
    doc.insert("routes".into(), json!(routes));
    doc.insert("routing_api".into(), routing_api_block(props, links)?);
    doc.insert(
        "nats_mtls_config".into(),
        json!({
            "enabled": selection.tls_enabled,
            "cert_path": NATS_CLIENT_CERT_PATH,
            "key_path": NATS_CLIENT_KEY_PATH,
            "ca_path": NATS_SERVER_CA_PATH,
        }),
    );

    // Client material for the routing API is optional here; absent values
    // render as empty files rather than failing.
    let client_cert = Lookup::new(
        "Routing API client certificate",
        "route_registrar.routing_api.client_cert",
        "routing_api.mtls_client_cert",
    );
    let client_key = Lookup::new(
        "Routing API client private key",
        "route_registrar.routing_api.client_private_key",
        "routing_api.mtls_client_key",
    );
    let server_ca = Lookup::new(
        "Routing API server CA certificate",
        "route_registrar.routing_api.server_ca_cert",
        "routing_api.mtls_ca",
    );
    let secrets = vec![
        optional_secret(props, links, CLIENT_CERT_PATH, &client_cert),
        optional_secret(props, links, CLIENT_KEY_PATH, &client_key),
        optional_secret(props, links, SERVER_CA_PATH, &server_ca),
    ];

    let document = serde_json::to_string_pretty(&Value::Object(doc))?;
    debug!(job = "route_registrar", "rendered settings document");

    Ok(RenderedJob {
        name: "route_registrar".to_string(),
        document: Artifact::new(DOCUMENT_PATH, document),
        secrets,
    })
}

fn optional_secret(
    props: &PropertySet,
    links: &LinkSet,
    path: &str,
    lookup: &Lookup,
) -> Artifact {
    let material = optional(props, links, lookup)
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    Artifact::new(path, material)
}

/// A route that exposes a TLS port must name the SAN to verify; a protocol
/// override must be one the proxy speaks.
fn validated_routes(props: &PropertySet) -> Result<Vec<Value>> {
    let routes = props
        .get("route_registrar.routes")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    for (i, route) in routes.iter().enumerate() {
        let tls_port = route.get("tls_port");
        let san = route.get("server_cert_domain_san");
        if provided(tls_port) && !provided(san) {
            return Err(ValidationError::ConditionallyRequired {
                field: format!("route_registrar.routes[{i}].route.server_cert_domain_san"),
                condition: "tls_port is provided".to_string(),
            }
            .into());
        }

        if let Some(protocol) = route.get("protocol").and_then(Value::as_str) {
            if protocol != "http1" && protocol != "http2" {
                return Err(ValidationError::ConditionalValue {
                    field: format!("route_registrar.routes[{i}].route.protocol"),
                    expected: "http1 or http2".to_string(),
                    condition: "protocol is provided".to_string(),
                }
                .into());
            }
        }
    }
    Ok(routes)
}

fn routing_api_block(props: &PropertySet, links: &LinkSet) -> Result<Value> {
    let api_url = props
        .get_str("route_registrar.routing_api.api_url")
        .unwrap_or(DEFAULT_API_URL);

    let mtls_only = links.get("routing_api", "routing_api.enabled_api_endpoints")
        == Some(&json!("mtls"));
    if mtls_only && !api_url.starts_with("https") {
        return Err(ValidationError::ConditionalValue {
            field: "route_registrar.routing_api.api_url".to_string(),
            expected: "https".to_string(),
            condition: "routing_api.enabled_api_endpoints is mtls only".to_string(),
        }
        .into());
    }

    let max_ttl = links
        .get("routing_api", "routing_api.max_ttl")
        .and_then(duration)
        .unwrap_or_else(|| "120s".to_string());

    Ok(json!({
        "ca_certs": ROUTING_API_CA_PATH,
        "api_url": api_url,
        "oauth_url": DEFAULT_OAUTH_URL,
        "client_id": props
            .get_str("route_registrar.routing_api.client_id")
            .unwrap_or("routing_api_client"),
        "skip_ssl_validation": props
            .get_bool("route_registrar.routing_api.skip_ssl_validation")
            .unwrap_or(false),
        "client_cert_path": CLIENT_CERT_PATH,
        "client_private_key_path": CLIENT_KEY_PATH,
        "server_ca_cert_path": SERVER_CA_PATH,
        "max_ttl": max_ttl,
    }))
}

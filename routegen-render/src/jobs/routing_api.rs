// routing-api.yml builder

use serde_json::{json, Map, Value};
use tracing::debug;

use routegen_manifest::{LinkSet, Lookup, PropertySet};
use routegen_validation::{check_all, ROUTING_API_RULES};

use crate::artifact::{Artifact, RenderedJob};
use crate::context::InstanceInfo;
use crate::derive::{duration, join_cert_blocks};
use crate::error::Result;
use crate::jobs::required;

const DOCUMENT_PATH: &str = "/var/vcap/jobs/routing-api/config/routing-api.yml";
const CLIENT_CA_PATH: &str = "/var/vcap/jobs/routing-api/config/certs/routing-api/client_ca.crt";
const SERVER_CERT_PATH: &str = "/var/vcap/jobs/routing-api/config/certs/routing-api/server.crt";
const SERVER_KEY_PATH: &str = "/var/vcap/jobs/routing-api/config/certs/routing-api/server.key";
const LOCKET_CA_PATH: &str = "/var/vcap/jobs/routing-api/config/certs/locket/ca.crt";
const LOCKET_CLIENT_CERT_PATH: &str = "/var/vcap/jobs/routing-api/config/certs/locket/client.crt";
const LOCKET_CLIENT_KEY_PATH: &str = "/var/vcap/jobs/routing-api/config/certs/locket/client.key";
const UAA_TOKEN_ENDPOINT: &str = "uaa.service.cf.internal";

/// Ports held back from route registration because platform components
/// listen on them.
const DEFAULT_RESERVED_PORTS: &[i64] = &[
    2822, 2825, 3457, 3458, 3459, 3460, 3461, 8853, 9100, 14726, 14727, 14821, 14822, 14823,
    14824, 14829, 14830, 14920, 14922, 15821, 17002, 53035, 53080,
];

pub fn render(
    props: &PropertySet,
    links: &LinkSet,
    _instance: &InstanceInfo,
) -> Result<RenderedJob> {
    check_all(props.root(), ROUTING_API_RULES)?;

    let mtls_ca = Lookup::new(
        "Routing API server CA certificate",
        "routing_api.mtls_ca",
        "routing_api.mtls_ca",
    );
    let server_cert = Lookup::new(
        "Routing API server certificate",
        "routing_api.mtls_server_cert",
        "routing_api.mtls_server_cert",
    );
    let server_key = Lookup::new(
        "Routing API server private key",
        "routing_api.mtls_server_key",
        "routing_api.mtls_server_key",
    );
    // Required even though they are not emitted here, so that every link
    // consumer can count on the property being present.
    let client_cert = Lookup::new(
        "Routing API client certificate",
        "routing_api.mtls_client_cert",
        "routing_api.mtls_client_cert",
    );
    let client_key = Lookup::new(
        "Routing API client private key",
        "routing_api.mtls_client_key",
        "routing_api.mtls_client_key",
    );
    required(props, links, &client_cert)?;
    required(props, links, &client_key)?;

    let locket_address = Lookup::new(
        "Locket API location",
        "routing_api.locket.api_location",
        "routing_api.locket.api_location",
    );
    let system_domain = Lookup::new(
        "System domain",
        "routing_api.system_domain",
        "routing_api.system_domain",
    );
    let uaa_port = Lookup::new("UAA TLS port", "uaa.tls_port", "uaa.tls_port");
    let fail_on_conflicts = Lookup::new(
        "Fail on router port conflicts",
        "routing_api.fail_on_router_port_conflicts",
        "tcp_router.fail_on_router_port_conflicts",
    )
    .default_value(json!(false));

    let mut doc = Map::new();
    doc.insert(
        "admin_port".into(),
        json!(props.get_i64("routing_api.admin_port").unwrap_or(15_897)),
    );
    doc.insert("lock_ttl".into(), json!("10s"));
    doc.insert("retry_interval".into(), json!("5s"));
    doc.insert(
        "debug_address".into(),
        json!(
            props
                .get_str("routing_api.debug_address")
                .unwrap_or("127.0.0.1:17002")
        ),
    );
    doc.insert(
        "fail_on_router_port_conflicts".into(),
        required(props, links, &fail_on_conflicts)?,
    );
    doc.insert(
        "locket".into(),
        json!({
            "locket_address": required(props, links, &locket_address)?,
            "locket_ca_cert_file": LOCKET_CA_PATH,
            "locket_client_cert_file": LOCKET_CLIENT_CERT_PATH,
            "locket_client_key_file": LOCKET_CLIENT_KEY_PATH,
        }),
    );
    doc.insert("log_guid".into(), json!("routing_api"));
    doc.insert(
        "max_ttl".into(),
        props
            .get("routing_api.max_ttl")
            .and_then(duration)
            .map(|d| json!(d))
            .unwrap_or_else(|| json!("120s")),
    );
    doc.insert("metrics_reporting_interval".into(), json!("30s"));
    doc.insert(
        "metron_config".into(),
        json!({
            "address": "localhost",
            "port": props.get_i64("metron.port").unwrap_or(3457),
        }),
    );
    doc.insert(
        "oauth".into(),
        json!({
            "token_endpoint": UAA_TOKEN_ENDPOINT,
            "port": required(props, links, &uaa_port)?,
            "skip_ssl_validation": props.get_bool("uaa.skip_ssl_validation").unwrap_or(false),
        }),
    );
    doc.insert("api".into(), api_block(props)?);
    doc.insert(
        "router_groups".into(),
        props
            .get("routing_api.router_groups")
            .cloned()
            .unwrap_or_else(|| json!([])),
    );
    doc.insert(
        "reserved_system_component_ports".into(),
        reserved_ports(props),
    );
    doc.insert("sqldb".into(), sqldb_block(props));
    doc.insert("statsd_client_flush_interval".into(), json!("300ms"));
    doc.insert(
        "statsd_endpoint".into(),
        json!(
            props
                .get_str("routing_api.statsd_endpoint")
                .unwrap_or("localhost:8125")
        ),
    );
    doc.insert(
        "system_domain".into(),
        required(props, links, &system_domain)?,
    );
    doc.insert("uuid".into(), json!("xxxxxx-xxxxxxxx-xxxxx"));

    let client_ca = client_ca_bundle(props, links, &mtls_ca)?;
    let secrets = vec![
        Artifact::new(CLIENT_CA_PATH, client_ca),
        secret(SERVER_CERT_PATH, required(props, links, &server_cert)?),
        secret(SERVER_KEY_PATH, required(props, links, &server_key)?),
    ];

    let document = serde_yaml::to_string(&Value::Object(doc))?;
    debug!(job = "routing-api", "rendered settings document");

    Ok(RenderedJob {
        name: "routing-api".to_string(),
        document: Artifact::new(DOCUMENT_PATH, document),
        secrets,
    })
}

fn secret(path: &str, material: Value) -> Artifact {
    Artifact::new(path, material.as_str().unwrap_or_default())
}

/// The client CA file is the server CA plus, when the proxy link exports
/// one, the backends CA, separated by a blank line.
fn client_ca_bundle(
    props: &PropertySet,
    links: &LinkSet,
    mtls_ca: &Lookup,
) -> Result<String> {
    let ca = required(props, links, mtls_ca)?;
    let ca = ca.as_str().unwrap_or_default();
    let backends_ca = links
        .get("gorouter", "router.backends.ca")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Ok(join_cert_blocks([ca, backends_ca], "\n\n"))
}

/// `mtls` keeps only the mutually authenticated endpoint; `both` also
/// serves plain HTTP.
fn api_block(props: &PropertySet) -> Result<Value> {
    let http_enabled = props
        .get_str("routing_api.enabled_api_endpoints")
        .unwrap_or("both")
        != "mtls";
    Ok(json!({
        "listen_port": props.get_i64("routing_api.port").unwrap_or(3000),
        "http_enabled": http_enabled,
        "mtls_listen_port": props.get_i64("routing_api.mtls_port").unwrap_or(3001),
        "mtls_client_ca_file": CLIENT_CA_PATH,
        "mtls_server_cert_file": SERVER_CERT_PATH,
        "mtls_server_key_file": SERVER_KEY_PATH,
    }))
}

/// String entries are tolerated and coerced to integers.
fn reserved_ports(props: &PropertySet) -> Value {
    let ports = match props
        .get("routing_api.reserved_system_component_ports")
        .and_then(Value::as_array)
    {
        Some(entries) => entries
            .iter()
            .filter_map(|p| match p {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            })
            .collect(),
        None => DEFAULT_RESERVED_PORTS.to_vec(),
    };
    json!(ports)
}

fn sqldb_block(props: &PropertySet) -> Value {
    let mut block = Map::new();
    for field in ["host", "port", "type", "schema", "username", "password"] {
        if let Some(v) = props.get(&format!("routing_api.sqldb.{field}")) {
            block.insert(field.to_string(), v.clone());
        }
    }
    block.insert(
        "skip_hostname_validation".into(),
        json!(
            props
                .get_bool("routing_api.sqldb.skip_hostname_validation")
                .unwrap_or(false)
        ),
    );
    for field in [
        "max_open_connections",
        "max_idle_connections",
        "connections_max_lifetime_seconds",
    ] {
        if let Some(v) = props.get(&format!("routing_api.sqldb.{field}")) {
            block.insert(field.to_string(), v.clone());
        }
    }
    Value::Object(block)
}

// gorouter.yml builder

use serde_json::{json, Map, Value};
use tracing::debug;

use routegen_manifest::{LinkSet, Lookup, PropertySet};
use routegen_validation::{
    check_all, PairedSecret, SingleStringBlock, TlsPem, ValidationError, GOROUTER_RULES,
};

use crate::artifact::{Artifact, RenderedJob};
use crate::context::InstanceInfo;
use crate::derive::{duration, join_cert_blocks, kb_to_bytes, seconds, usable_cert};
use crate::error::Result;
use crate::jobs::required;

const DOCUMENT_PATH: &str = "/var/vcap/jobs/gorouter/config/gorouter.yml";
const ERROR_TEMPLATE_PATH: &str = "/var/vcap/jobs/gorouter/config/error.html";
const PROMETHEUS_CERT_PATH: &str = "/var/vcap/jobs/gorouter/config/certs/prometheus/prometheus.crt";
const PROMETHEUS_KEY_PATH: &str = "/var/vcap/jobs/gorouter/config/certs/prometheus/prometheus.key";
const PROMETHEUS_CA_PATH: &str =
    "/var/vcap/jobs/gorouter/config/certs/prometheus/prometheus_ca.crt";

pub fn render(
    props: &PropertySet,
    links: &LinkSet,
    _instance: &InstanceInfo,
) -> Result<RenderedJob> {
    check_all(props.root(), GOROUTER_RULES)?;
    PairedSecret::validate(
        props.get("router.backends.cert_chain"),
        props.get("router.backends.private_key"),
        "backends",
    )?;
    PairedSecret::validate(
        props.get("router.route_services.cert_chain"),
        props.get("router.route_services.private_key"),
        "route_services",
    )?;

    let mut doc = Map::new();

    doc.insert("status".into(), status_block(props, links)?);

    if let Some(address) = props.get_str("router.debug_address") {
        doc.insert("debug_address".into(), json!(address));
    }

    if let Some(kb) = props.get_i64("router.max_header_kb") {
        doc.insert("max_header_bytes".into(), json!(kb_to_bytes(kb)));
    }

    keep_alives(props, &mut doc);
    timeouts(props, &mut doc);

    let cookies = props
        .get("router.sticky_session_cookie_names")
        .cloned()
        .unwrap_or_else(|| json!(["JSESSIONID"]));
    doc.insert("sticky_session_cookie_names".into(), cookies);

    doc.insert(
        "client_cert_validation".into(),
        json!(client_cert_validation(props)),
    );

    if let Some(v) = props.get_str("router.min_tls_version") {
        doc.insert("min_tls_version".into(), json!(v));
    }
    if let Some(v) = props.get_str("router.max_tls_version") {
        doc.insert("max_tls_version".into(), json!(v));
    }

    doc.insert(
        "route_services_hairpinning".into(),
        json!(
            props
                .get_bool("router.route_services_internal_lookup")
                .unwrap_or(false)
        ),
    );
    doc.insert(
        "route_services_hairpinning_allowlist".into(),
        props
            .get("router.route_services_internal_lookup_allowlist")
            .cloned()
            .unwrap_or_else(|| json!([])),
    );

    let mut secrets = Vec::new();
    if let Some(template) = props.get_str("router.html_error_template") {
        doc.insert("html_error_template_file".into(), json!(ERROR_TEMPLATE_PATH));
        secrets.push(Artifact::new(ERROR_TEMPLATE_PATH, template));
    }

    let tls_pem = props
        .get("router.tls_pem")
        .ok_or(ValidationError::TlsPemShape)?;
    TlsPem::validate(tls_pem)?;
    doc.insert("tls_pem".into(), tls_pem.clone());

    prometheus(props, &mut doc)?;
    route_services(props, &mut doc);
    doc.insert("route_services".into(), route_services_block(props));
    doc.insert("backends".into(), backends_block(props));
    certificate_authorities(props, links, &mut doc)?;
    doc.insert("routing_api".into(), routing_api_block(props, links)?);
    doc.insert("nats".into(), nats_block(props, links)?);
    doc.insert("logging".into(), logging_block(props)?);
    doc.insert("tracing".into(), tracing_block(props));

    doc.insert(
        "empty_pool_response_code_503".into(),
        json!(
            props
                .get_bool("for_backwards_compatibility_only.empty_pool_response_code_503")
                .unwrap_or(true)
        ),
    );
    doc.insert(
        "empty_pool_timeout".into(),
        props
            .get("for_backwards_compatibility_only.empty_pool_timeout")
            .and_then(duration)
            .map(|d| json!(d))
            .unwrap_or_else(|| json!("10s")),
    );

    let document = serde_yaml::to_string(&Value::Object(doc))?;
    debug!(job = "gorouter", secrets = secrets.len(), "rendered settings document");

    Ok(RenderedJob {
        name: "gorouter".to_string(),
        document: Artifact::new(DOCUMENT_PATH, document),
        secrets,
    })
}

fn status_block(props: &PropertySet, links: &LinkSet) -> Result<Value> {
    let port = Lookup::new("Router status port", "router.status.port", "router.status.port");
    let user = Lookup::new("Router status user", "router.status.user", "router.status.user");
    let password = Lookup::new(
        "Router status password",
        "router.status.password",
        "router.status.password",
    );
    Ok(json!({
        "port": required(props, links, &port)?,
        "user": required(props, links, &user)?,
        "pass": required(props, links, &password)?,
    }))
}

/// A zero connection cap disables keep-alives entirely and suppresses the
/// dependent settings rather than emitting them with zero values.
fn keep_alives(props: &PropertySet, doc: &mut Map<String, Value>) {
    let max_idle = props
        .get_i64("router.max_idle_connections")
        .unwrap_or(100);
    if max_idle == 0 {
        doc.insert("disable_keep_alives".into(), json!(true));
        return;
    }
    doc.insert("disable_keep_alives".into(), json!(false));
    let probe_interval = props
        .get("router.keep_alive_probe_interval")
        .and_then(duration)
        .unwrap_or_else(|| "1s".to_string());
    doc.insert(
        "endpoint_keep_alive_probe_interval".into(),
        json!(probe_interval),
    );
    doc.insert("max_idle_conns".into(), json!(max_idle));
    doc.insert("max_idle_conns_per_host".into(), json!(100));
}

fn timeouts(props: &PropertySet, doc: &mut Map<String, Value>) {
    if let Some(v) = props.get("router.drain_wait").and_then(duration) {
        doc.insert("drain_wait".into(), json!(v));
    }
    if let Some(v) = props.get("router.drain_timeout").and_then(duration) {
        doc.insert("drain_timeout".into(), json!(v));
    }
    if let Some(n) = props.get_i64("request_timeout_in_seconds") {
        doc.insert("endpoint_timeout".into(), json!(seconds(n)));
    }
    if let Some(n) = props.get_i64("tls_handshake_timeout_in_seconds") {
        doc.insert("tls_handshake_timeout".into(), json!(seconds(n)));
    }
    if let Some(dial) = props.get_i64("endpoint_dial_timeout_in_seconds") {
        doc.insert("endpoint_dial_timeout".into(), json!(seconds(dial)));
        let websocket = props
            .get_i64("websocket_dial_timeout_in_seconds")
            .unwrap_or(dial);
        doc.insert("websocket_dial_timeout".into(), json!(seconds(websocket)));
    }
}

/// Legacy `off` is accepted on input and normalized to `none`.
fn client_cert_validation(props: &PropertySet) -> &str {
    match props.get_str("router.client_cert_validation") {
        Some("off") | None => "none",
        Some(v) => v,
    }
}

fn prometheus(props: &PropertySet, doc: &mut Map<String, Value>) -> Result<()> {
    let per_app = props
        .get_bool("router.per_app_prometheus_http_metrics_reporting")
        .unwrap_or(false);
    let port = props.get_i64("router.prometheus.port");
    if per_app && port.is_none() {
        return Err(ValidationError::MissingDependency {
            field: "per_app_prometheus_http_metrics_reporting".to_string(),
            dependency: "prometheus".to_string(),
        }
        .into());
    }
    doc.insert(
        "per_app_prometheus_http_metrics_reporting".into(),
        json!(per_app),
    );
    if let Some(port) = port {
        doc.insert(
            "prometheus".into(),
            json!({
                "port": port,
                "cert_path": PROMETHEUS_CERT_PATH,
                "key_path": PROMETHEUS_KEY_PATH,
                "ca_path": PROMETHEUS_CA_PATH,
            }),
        );
    }
    Ok(())
}

/// Flat route-service settings: the signing secrets, the https
/// recommendation flag, and the forwarding timeout.
fn route_services(props: &PropertySet, doc: &mut Map<String, Value>) {
    let timeout = props
        .get("router.route_services_timeout")
        .and_then(duration)
        .unwrap_or_else(|| "60s".to_string());
    doc.insert("route_services_timeout".into(), json!(timeout));
    doc.insert(
        "route_services_secret".into(),
        json!(props.get_str("router.route_services_secret").unwrap_or("")),
    );
    doc.insert(
        "route_services_secret_decrypt_only".into(),
        json!(
            props
                .get_str("router.route_services_secret_decrypt_only")
                .unwrap_or("")
        ),
    );
    doc.insert(
        "route_services_recommend_https".into(),
        json!(
            props
                .get_bool("router.route_services_recommend_https")
                .unwrap_or(false)
        ),
    );
}

fn route_services_block(props: &PropertySet) -> Value {
    json!({
        "max_attempts": props.get_i64("router.route_services.max_attempts").unwrap_or(3),
        "cert_chain": props.get_str("router.route_services.cert_chain").unwrap_or(""),
        "private_key": props.get_str("router.route_services.private_key").unwrap_or(""),
    })
}

fn backends_block(props: &PropertySet) -> Value {
    let mut block = json!({
        "max_attempts": props.get_i64("router.backends.max_attempts").unwrap_or(3),
        "cert_chain": props.get_str("router.backends.cert_chain").unwrap_or(""),
        "private_key": props.get_str("router.backends.private_key").unwrap_or(""),
    });
    if let Some(conns) = props.get_i64("router.backends.max_conns") {
        block["max_conns"] = json!(conns);
    }
    block
}

/// `ca_certs` keeps only plausible entries; `client_ca_certs` is the client
/// CA block joined with the kept server CAs unless the operator opted to
/// trust the client CAs alone.
fn certificate_authorities(
    props: &PropertySet,
    links: &LinkSet,
    doc: &mut Map<String, Value>,
) -> Result<()> {
    let lookup = Lookup::new("Router CA certificates", "router.ca_certs", "router.ca_certs");
    let ca_certs = required(props, links, &lookup)?;
    let kept: Vec<&str> = ca_certs
        .as_array()
        .map(|entries| entries.iter().filter_map(usable_cert).collect())
        .unwrap_or_default();
    doc.insert("ca_certs".into(), json!(kept));

    let only_trust = props
        .get_bool("router.only_trust_client_ca_certs")
        .unwrap_or(false);
    let client_ca = props.get_str("router.client_ca_certs").unwrap_or("");
    let client_ca_certs = if only_trust {
        client_ca.to_string()
    } else {
        join_cert_blocks(std::iter::once(client_ca).chain(kept.iter().copied()), "\n")
    };
    doc.insert("client_ca_certs".into(), json!(client_ca_certs));
    doc.insert("only_trust_client_ca_certs".into(), json!(only_trust));
    Ok(())
}

/// Client material for the routing API, resolved and validated only when
/// the integration is enabled.
fn routing_api_block(props: &PropertySet, links: &LinkSet) -> Result<Value> {
    if !props.get_bool("routing_api.enabled").unwrap_or(false) {
        return Ok(json!({ "enabled": false }));
    }

    if let Some(v) = props.get("routing_api.ca_certs") {
        SingleStringBlock::validate(v, "routing_api.ca_certs")?;
    }
    if let Some(v) = props.get("routing_api.cert_chain") {
        SingleStringBlock::validate(v, "routing_api.cert_chain")?;
    }

    let port = Lookup::new("Routing API port", "routing_api.port", "routing_api.mtls_port");
    let ca = Lookup::new(
        "Routing API server CA certificate",
        "routing_api.ca_certs",
        "routing_api.mtls_ca",
    );
    let key = Lookup::new(
        "Routing API client private key",
        "routing_api.private_key",
        "routing_api.mtls_client_key",
    );
    let cert = Lookup::new(
        "Routing API client certificate",
        "routing_api.cert_chain",
        "routing_api.mtls_client_cert",
    );

    Ok(json!({
        "enabled": true,
        "port": required(props, links, &port)?,
        "ca_certs": required(props, links, &ca)?,
        "private_key": required(props, links, &key)?,
        "cert_chain": required(props, links, &cert)?,
    }))
}

fn nats_block(props: &PropertySet, links: &LinkSet) -> Result<Value> {
    let port_lookup =
        Lookup::new("NATS server port number", "nats.port", "nats.port").namespace("nats-tls");
    let port = required(props, links, &port_lookup)?;

    if let Some(v) = props.get("nats.ca_certs") {
        SingleStringBlock::validate(v, "nats.ca_certs")?;
    }
    if let Some(v) = props.get("nats.cert_chain") {
        SingleStringBlock::validate(v, "nats.cert_chain")?;
    }
    let ca_lookup = Lookup::new(
        "NATS server CA certificate",
        "nats.ca_certs",
        "nats.external.tls.ca",
    )
    .namespace("nats-tls");
    let ca_certs = required(props, links, &ca_lookup)?;

    let hosts: Vec<Value> = props
        .get("nats.machines")
        .and_then(Value::as_array)
        .map(|machines| {
            machines
                .iter()
                .map(|m| json!({ "hostname": m, "port": port }))
                .collect()
        })
        .unwrap_or_default();

    let mut nats = json!({
        "hosts": hosts,
        "ca_certs": ca_certs,
        "cert_chain": props.get_str("nats.cert_chain").unwrap_or(""),
        "private_key": props.get_str("nats.private_key").unwrap_or(""),
    });
    if let Some(user) = props.get_str("nats.user") {
        nats["user"] = json!(user);
    }
    if let Some(pass) = props.get_str("nats.password") {
        nats["pass"] = json!(pass);
    }
    Ok(nats)
}

/// The `deprecated` timestamp format is accepted and normalized to
/// `unix-epoch`.
fn logging_block(props: &PropertySet) -> Result<Value> {
    let timestamp = match props.get_str("router.logging.format.timestamp") {
        Some("deprecated") | Some("unix-epoch") => "unix-epoch",
        Some(v) => v,
        None => "rfc3339",
    };
    let mut logging = json!({ "format": { "timestamp": timestamp } });
    if let Some(level) = props.get_str("router.logging_level") {
        logging["level"] = json!(level);
    }
    Ok(logging)
}

fn tracing_block(props: &PropertySet) -> Value {
    json!({
        "enable_zipkin": props.get_bool("router.tracing.enable_zipkin").unwrap_or(false),
        "enable_w3c": props.get_bool("router.tracing.enable_w3c").unwrap_or(false),
        "w3c_tenant_id": props.get("router.tracing.w3c_tenant_id").cloned().unwrap_or(Value::Null),
    })
}

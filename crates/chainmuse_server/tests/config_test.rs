//! Configuration loading and environment overrides.

use chainmuse_ledger::Network;
use chainmuse_server::ChainmuseConfig;
use std::collections::HashMap;
use std::io::Write;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_file_yields_defaults() {
    let config = ChainmuseConfig::from_toml("").expect("empty config");
    assert_eq!(config, ChainmuseConfig::default());
    assert_eq!(config.server.bind, "0.0.0.0:4000");
    assert_eq!(config.server.events_limit, 50);
    assert_eq!(config.server.stats_scan_limit, 1000);
    assert_eq!(config.ledger.module, "story");
    assert_eq!(config.ledger.gas_budget, 10_000_000);
    assert_eq!(config.content.gateways.len(), 3);
    assert_eq!(config.content.timeout_secs, 10);
    assert_eq!(config.generation.max_tokens, 600);
}

#[test]
fn event_limit_defaults_and_is_capped() {
    let server = ChainmuseConfig::default().server;
    assert_eq!(server.event_limit(None), 50);
    assert_eq!(server.event_limit(Some(7)), 7);
    assert_eq!(server.event_limit(Some(1_000_000)), 1000);
}

#[test]
fn file_sections_are_read() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"
[server]
bind = "127.0.0.1:8080"
events_limit = 20

[ledger]
network = "devnet"
package_id = "0xabc"

[content]
gateways = ["http://localhost:8081/ipfs"]

[generation]
default_model = "meta-llama/llama-3-8b-instruct"
temperature = 0.5
"#
    )
    .expect("write config");

    let config = ChainmuseConfig::from_file(file.path()).expect("config file");
    assert_eq!(config.server.bind, "127.0.0.1:8080");
    assert_eq!(config.server.events_limit, 20);
    assert_eq!(config.server.stats_scan_limit, 1000);
    assert_eq!(config.ledger.network, Network::Devnet);
    assert_eq!(config.ledger.endpoint(), "https://fullnode.devnet.sui.io:443");
    assert_eq!(config.ledger.package_id.as_deref(), Some("0xabc"));
    assert_eq!(config.content.gateways, vec!["http://localhost:8081/ipfs"]);
    assert_eq!(config.generation.default_model, "meta-llama/llama-3-8b-instruct");
    assert!((config.generation.temperature - 0.5).abs() < f32::EPSILON);
}

#[test]
fn environment_overrides_file_values() {
    let mut config = ChainmuseConfig::from_toml(
        r#"
[ledger]
network = "mainnet"
"#,
    )
    .expect("config");

    config
        .apply_overrides(lookup(&[
            ("SUI_NETWORK", "localnet"),
            ("SUI_PACKAGE_ID", "0xpkg"),
            ("SUI_ADMIN_SECRET_KEY", "suiprivkey1secret"),
            ("PINATA_JWT", "jwt-token"),
            ("OPENROUTER_API_KEY", "or-key"),
            ("OPENROUTER_APP_NAME", "Tales"),
            ("BACKEND_PORT", "5001"),
            ("SUI_RPC_URL", ""),
        ]))
        .expect("overrides apply");

    assert_eq!(config.ledger.network, Network::Localnet);
    assert_eq!(config.ledger.endpoint(), "http://127.0.0.1:9000");
    assert_eq!(config.ledger.package_id.as_deref(), Some("0xpkg"));
    assert_eq!(config.ledger.secret_key.as_deref(), Some("suiprivkey1secret"));
    assert!(config.ledger.rpc_url.is_none(), "empty values are ignored");
    assert_eq!(config.content.jwt.as_deref(), Some("jwt-token"));
    assert_eq!(config.generation.api_key.as_deref(), Some("or-key"));
    assert_eq!(config.generation.app_name, "Tales");
    assert_eq!(config.server.bind, "0.0.0.0:5001");
}

#[test]
fn malformed_overrides_are_rejected() {
    let mut config = ChainmuseConfig::default();
    let err = config
        .apply_overrides(lookup(&[("BACKEND_PORT", "not-a-port")]))
        .expect_err("bad port");
    assert!(err.message.contains("BACKEND_PORT"));

    let err = config
        .apply_overrides(lookup(&[("SUI_NETWORK", "moonnet")]))
        .expect_err("bad network");
    assert!(err.message.contains("moonnet"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = ChainmuseConfig::from_file(dir.path().join("absent.toml")).expect_err("missing");
    assert!(err.message.contains("absent.toml"));
}

use std::collections::HashMap;
use std::path::PathBuf;

use fert_core::config::{DEFAULT_BEANSTALK_ADDRESS, DEFAULT_PAGE_SIZE};
use fert_core::{FertError, HumidityScale, OutputIdEncoding, RunConfig};

fn base_env() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("FERT_SUBGRAPH_URL", "https://graph.example/subgraphs/beanstalk/"),
        ("FERT_RPC_URL", "http://localhost:8545"),
        ("FERT_CHAIN_ID", "1337"),
        ("FERT_OUT_DIR", "./dist"),
    ])
}

fn load(env: &HashMap<&'static str, &'static str>) -> Result<RunConfig, FertError> {
    RunConfig::from_lookup(|key| env.get(key).map(|value| value.to_string()))
}

#[test]
fn defaults_fill_optional_values() {
    let config = load(&base_env()).expect("config");
    assert_eq!(config.source.subgraph_url, "https://graph.example/subgraphs/beanstalk");
    assert_eq!(config.source.chain_id, 1337);
    assert_eq!(config.source.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(config.source.max_requests, 100);
    assert_eq!(config.source.contract_address, DEFAULT_BEANSTALK_ADDRESS);
    assert_eq!(config.output.dir, PathBuf::from("./dist"));
    assert_eq!(config.output.id_encoding, OutputIdEncoding::Decimal);
    assert!(config.output.emit_pages);
    assert!(!config.output.emit_bare_metadata);
    assert_eq!(config.output.humidity_scale, HumidityScale::Percent);
    assert!(!config.strict);
}

#[test]
fn missing_endpoint_is_fatal() {
    let mut env = base_env();
    env.remove("FERT_RPC_URL");
    let err = load(&env).expect_err("missing rpc");
    assert!(matches!(err, FertError::Config(_)));
    assert_eq!(err.info().context["variable"], "FERT_RPC_URL");
}

#[test]
fn blank_value_counts_as_missing() {
    let mut env = base_env();
    env.insert("FERT_CHAIN_ID", "  ");
    assert_eq!(load(&env).expect_err("blank").code(), "fert_core.config_missing");
}

#[test]
fn malformed_values_are_rejected() {
    for (key, value) in [
        ("FERT_CHAIN_ID", "mainnet"),
        ("FERT_PAGE_SIZE", "0"),
        ("FERT_PAGE_SIZE", "5000"),
        ("FERT_MAX_PAGE_REQUESTS", "0"),
        ("FERT_EMIT_PAGES", "maybe"),
        ("FERT_ID_ENCODING", "base58"),
        ("FERT_RPC_URL", "localhost:8545"),
        ("FERT_BEANSTALK_ADDRESS", "0x1234"),
    ] {
        let mut env = base_env();
        env.insert(key, value);
        let err = load(&env).expect_err(key);
        assert!(matches!(err, FertError::Config(_)), "{key}={value}");
    }
}

#[test]
fn metadata_only_profile_from_env() {
    let mut env = base_env();
    env.insert("FERT_ID_ENCODING", "hex");
    env.insert("FERT_EMIT_PAGES", "false");
    env.insert("FERT_EMIT_BARE_METADATA", "1");
    env.insert("FERT_HUMIDITY_SCALE", "raw");
    env.insert("FERT_STRICT", "yes");
    let config = load(&env).expect("config");
    assert_eq!(config.output.id_encoding, OutputIdEncoding::Hex);
    assert!(!config.output.emit_pages);
    assert!(config.output.emit_bare_metadata);
    assert_eq!(config.output.humidity_scale, HumidityScale::Raw);
    assert!(config.strict);
}

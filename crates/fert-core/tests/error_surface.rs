use fert_core::errors::{ErrorInfo, FertError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("id", "6000000")
        .with_context("reason", "example")
}

#[test]
fn config_error_surface() {
    let err = FertError::Config(sample_info("CF001", "FERT_RPC_URL is not set"));
    assert_eq!(err.code(), "CF001");
    assert!(err.info().context.contains_key("id"));
    assert!(err.to_string().starts_with("config error: FERT_RPC_URL is not set"));
}

#[test]
fn transport_error_surface() {
    let err = FertError::Transport(sample_info("TR001", "connection refused"));
    assert_eq!(err.info().code, "TR001");
    assert!(err.to_string().contains("context: [id=6000000, reason=example]"));
}

#[test]
fn token_error_carries_hint() {
    let err = FertError::Token(sample_info("TK001", "degenerate").with_hint("skip it"));
    assert_eq!(err.info().hint.as_deref(), Some("skip it"));
    assert!(err.to_string().ends_with("| hint: skip it"));
}

#[test]
fn error_serializes_with_family_tag() {
    let err = FertError::Io(ErrorInfo::new("IO001", "disk full"));
    let json = serde_json::to_value(&err).expect("json");
    assert_eq!(json["family"], "Io");
    assert_eq!(json["detail"]["code"], "IO001");
    let back: FertError = serde_json::from_value(json).expect("roundtrip");
    assert_eq!(back, err);
}

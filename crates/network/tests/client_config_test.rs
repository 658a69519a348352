use chert_net::{Config, HttpClient, NetError, DEFAULT_TIMEOUT_SECS};

#[test]
fn default_config() {
    let config = Config::default();
    assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert!(config.api_key.is_none());
    assert!(config.headers.is_empty());
    assert!(config.verify_tls);
}

#[test]
fn builder_chain() {
    let config = Config::default()
        .with_timeout(5)
        .with_api_key("secret-token")
        .with_header("X-Chert-Client", "test");

    assert_eq!(config.timeout_secs, 5);
    assert_eq!(config.api_key.as_deref(), Some("secret-token"));
    assert_eq!(
        config.headers,
        vec![("X-Chert-Client".to_string(), "test".to_string())]
    );
}

#[test]
fn client_builds_with_defaults() {
    assert!(HttpClient::new(Config::default()).is_ok());
}

#[test]
fn invalid_header_name_rejected() {
    let config = Config::default().with_header("bad header name", "value");
    match HttpClient::new(config) {
        Err(NetError::Config(msg)) => assert!(msg.contains("Invalid header name")),
        other => panic!("expected Config error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn invalid_api_key_rejected() {
    let config = Config::default().with_api_key("line\nbreak");
    assert!(matches!(HttpClient::new(config), Err(NetError::Config(_))));
}

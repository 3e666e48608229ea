//! Integration tests for environment-based client configuration

use respond_client::{ClientConfigBuilder, ConfigError, RespondClient};
use serial_test::serial;
use std::env;
use std::time::Duration;

const RESPOND_ENV_VARS: [&str; 4] = [
    "RESPOND_API_BASE",
    "RESPOND_REQUEST_TIMEOUT_SECS",
    "RESPOND_UPLOAD_TIMEOUT_SECS",
    "RESPOND_DEFAULT_SEARCH_LIMIT",
];

/// Helper to set environment variable for test
fn set_env(key: &str, value: &str) {
    unsafe {
        env::set_var(key, value);
    }
}

/// Helper to clear environment variable after test
fn clear_env(key: &str) {
    unsafe {
        env::remove_var(key);
    }
}

fn clear_all_respond_env_vars() {
    for key in RESPOND_ENV_VARS {
        clear_env(key);
    }
}

#[test]
#[serial]
fn test_env_config_default_when_no_vars_set() {
    clear_all_respond_env_vars();

    let config = ClientConfigBuilder::from_env()
        .expect("should load defaults when no env vars set")
        .build()
        .expect("should build valid config");

    assert_eq!(config.api_base.as_str(), "http://127.0.0.1:8000/");
    assert_eq!(config.request_timeout, Duration::from_secs(30));
    assert_eq!(config.upload_timeout, Duration::from_secs(120));
    assert_eq!(config.default_search_limit, 10);
}

#[test]
#[serial]
fn test_env_config_all_vars() {
    clear_all_respond_env_vars();
    set_env("RESPOND_API_BASE", "https://respond.example.org/api");
    set_env("RESPOND_REQUEST_TIMEOUT_SECS", "15");
    set_env("RESPOND_UPLOAD_TIMEOUT_SECS", "300");
    set_env("RESPOND_DEFAULT_SEARCH_LIMIT", "25");

    let config = ClientConfigBuilder::from_env()
        .expect("should load config")
        .build()
        .expect("should build valid config");

    assert_eq!(config.api_base.as_str(), "https://respond.example.org/api");
    assert_eq!(config.request_timeout, Duration::from_secs(15));
    assert_eq!(config.upload_timeout, Duration::from_secs(300));
    assert_eq!(config.default_search_limit, 25);

    clear_all_respond_env_vars();
}

#[test]
#[serial]
fn test_env_config_blank_value_uses_default() {
    clear_all_respond_env_vars();
    set_env("RESPOND_API_BASE", "   ");

    let config = ClientConfigBuilder::from_env()
        .expect("should load config")
        .build()
        .expect("should build valid config");

    assert_eq!(config.api_base.as_str(), "http://127.0.0.1:8000/");

    clear_env("RESPOND_API_BASE");
}

#[test]
#[serial]
fn test_env_config_invalid_number() {
    clear_all_respond_env_vars();
    set_env("RESPOND_REQUEST_TIMEOUT_SECS", "soon");

    let result = ClientConfigBuilder::from_env();
    match result {
        Err(ConfigError::InvalidEnvVar { key, .. }) => {
            assert_eq!(key, "RESPOND_REQUEST_TIMEOUT_SECS");
        }
        other => panic!("expected InvalidEnvVar, got {:?}", other),
    }

    clear_env("RESPOND_REQUEST_TIMEOUT_SECS");
}

#[test]
#[serial]
fn test_env_config_out_of_range_limit() {
    clear_all_respond_env_vars();
    set_env("RESPOND_DEFAULT_SEARCH_LIMIT", "500");

    let result = ClientConfigBuilder::from_env()
        .expect("should parse number")
        .build();
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));

    clear_env("RESPOND_DEFAULT_SEARCH_LIMIT");
}

#[test]
#[serial]
fn test_env_config_rejects_non_http_scheme() {
    clear_all_respond_env_vars();
    set_env("RESPOND_API_BASE", "ftp://respond.example.org");

    let result = ClientConfigBuilder::from_env()
        .expect("should load config")
        .build();
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));

    clear_env("RESPOND_API_BASE");
}

#[test]
#[serial]
fn test_client_from_env() {
    clear_all_respond_env_vars();
    set_env("RESPOND_API_BASE", "http://localhost:9100");

    let client = RespondClient::from_env().expect("should create client");
    assert_eq!(client.base_url().as_str(), "http://localhost:9100/");

    clear_env("RESPOND_API_BASE");
}

#[test]
#[serial]
fn test_builder_overrides_env() {
    clear_all_respond_env_vars();
    set_env("RESPOND_REQUEST_TIMEOUT_SECS", "45");

    let config = ClientConfigBuilder::from_env()
        .expect("should load config")
        .request_timeout_secs(5)
        .build()
        .expect("should build valid config");

    assert_eq!(config.request_timeout, Duration::from_secs(5));

    clear_env("RESPOND_REQUEST_TIMEOUT_SECS");
}

//! The shipped configuration files load and seed a development admin.

use clientdesk_core::config::{AppConfig, DatabaseBackend};

#[test]
fn test_development_config_seeds_admin() {
    let config = AppConfig::load("development").expect("Failed to load config");

    let bootstrap = config.bootstrap.expect("development seeds an admin");
    assert!(!bootstrap.email.is_empty());
    assert!(bootstrap.password.len() >= 8);
    assert_eq!(config.database.backend, DatabaseBackend::Postgres);
    assert_eq!(config.server.max_body_bytes, 1024 * 1024);
}

#[test]
fn test_unknown_environment_falls_back_to_defaults() {
    let config = AppConfig::load("no-such-env").expect("Failed to load config");
    assert!(config.bootstrap.is_none());
}

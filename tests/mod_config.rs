use statbadge::config::ServiceConfig;
use statbadge::errors::BadgeError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_defaults_match_service_behaviour() {
    let cfg = ServiceConfig::default();
    assert_eq!(cfg.cache_ttl_secs, 300);
    assert_eq!(cfg.cooldown_window(), Duration::from_secs(1800));
    assert_eq!(cfg.provider_timeout(), Duration::from_secs(10));
    assert_eq!(cfg.rate_limit_max, 100);
    assert_eq!(cfg.rate_limit_window(), Duration::from_secs(900));
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_toml_overrides_and_keeps_defaults() {
    let cfg = ServiceConfig::from_toml_str(
        r#"
        bind = "127.0.0.1:8080"
        data_path = "/var/lib/statbadge/badges.db"
        cache_ttl_secs = 60
        "#,
    )
    .unwrap();
    assert_eq!(cfg.bind, "127.0.0.1:8080");
    assert_eq!(cfg.data_path, PathBuf::from("/var/lib/statbadge/badges.db"));
    assert_eq!(cfg.cache_config().default_ttl, Duration::from_secs(60));
    assert_eq!(cfg.cooldown_secs, 1800);
}

#[test]
fn test_unknown_toml_key_is_rejected() {
    assert!(matches!(ServiceConfig::from_toml_str("colour = \"red\""), Err(BadgeError::Config(_))));
}

#[test]
fn test_env_overrides() {
    let env: HashMap<&str, &str> = [
        ("STATBADGE_BIND", "0.0.0.0:9000"),
        ("STATBADGE_EPHEMERAL", "yes"),
        ("STATBADGE_COOLDOWN_SECS", "60"),
        ("STATBADGE_PROVIDER_TOKEN", ""),
        ("STATBADGE_TRUST_PROXY", "false"),
    ]
    .into_iter()
    .collect();
    let mut cfg = ServiceConfig::default();
    cfg.apply_env_with(|k| env.get(k).map(|v| (*v).to_string())).unwrap();
    assert_eq!(cfg.bind, "0.0.0.0:9000");
    assert!(cfg.ephemeral);
    assert_eq!(cfg.cooldown_secs, 60);
    assert_eq!(cfg.provider_token, None);
    assert!(!cfg.trust_proxy);
}

#[test]
fn test_bad_env_values_are_config_errors() {
    let mut cfg = ServiceConfig::default();
    let err = cfg.apply_env_with(|k| (k == "STATBADGE_CACHE_TTL_SECS").then(|| "soon".to_string()));
    assert!(matches!(err, Err(BadgeError::Config(_))));
    let err = cfg.apply_env_with(|k| (k == "STATBADGE_EPHEMERAL").then(|| "maybe".to_string()));
    assert!(matches!(err, Err(BadgeError::Config(_))));
}

#[test]
fn test_validate_rejects_zero_values() {
    let cfg = ServiceConfig { cache_ttl_secs: 0, ..ServiceConfig::default() };
    assert!(matches!(cfg.validate(), Err(BadgeError::Config(_))));
    let cfg = ServiceConfig { bind: " ".into(), ..ServiceConfig::default() };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_load_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("statbadge.toml");
    std::fs::write(&path, "rate_limit_max = 5\n").unwrap();
    let cfg = ServiceConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(cfg.rate_limit_max, 5);
    assert!(ServiceConfig::load(Some(dir.path().join("missing.toml").as_path())).is_err());
}

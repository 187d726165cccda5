//! Service configuration.
//!
//! Precedence: CLI > env (`STATBADGE_*`) > config file > defaults. The binary
//! applies CLI flags on top of what [`ServiceConfig::load`] returns.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::errors::BadgeError;

pub const ENV_PREFIX: &str = "STATBADGE_";
pub const DEFAULT_CONFIG_FILE: &str = "statbadge.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub bind: String,
    pub data_path: PathBuf,
    /// Keep all state in memory; nothing is written to `data_path`.
    pub ephemeral: bool,
    pub cache_ttl_secs: u64,
    pub cache_capacity: usize,
    pub cache_sweep_secs: u64,
    pub cooldown_secs: u64,
    pub cooldown_sweep_secs: u64,
    pub provider_base_url: String,
    pub provider_timeout_secs: u64,
    pub provider_token: Option<String>,
    pub rate_limit_window_secs: u64,
    pub rate_limit_max: u32,
    /// Take the client address from `X-Forwarded-For` when present.
    pub trust_proxy: bool,
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    pub log_retention: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".into(),
            data_path: PathBuf::from("data/badges.db"),
            ephemeral: false,
            cache_ttl_secs: 300,
            cache_capacity: 1024,
            cache_sweep_secs: 3600,
            cooldown_secs: 1800,
            cooldown_sweep_secs: 3600,
            provider_base_url: crate::provider::github::DEFAULT_BASE_URL.into(),
            provider_timeout_secs: 10,
            provider_token: None,
            rate_limit_window_secs: 900,
            rate_limit_max: 100,
            trust_proxy: true,
            log_dir: None,
            log_level: "info".into(),
            log_retention: 7,
        }
    }
}

impl ServiceConfig {
    /// Parse a TOML document; missing keys take their defaults.
    ///
    /// # Errors
    /// `Config` on malformed TOML or unknown keys.
    pub fn from_toml_str(s: &str) -> Result<Self, BadgeError> {
        toml::from_str(s).map_err(|e| BadgeError::Config(e.to_string()))
    }

    /// Load from `path`, else `$STATBADGE_CONFIG`, else `./statbadge.toml` if it
    /// exists, then apply environment overrides and validate.
    ///
    /// # Errors
    /// `Config` if an explicitly named file is missing or any source is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, BadgeError> {
        let explicit = path.map(Path::to_path_buf).or_else(|| std::env::var_os("STATBADGE_CONFIG").map(PathBuf::from));
        let mut cfg = match explicit {
            Some(p) => Self::from_file(&p)?,
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if local.exists() { Self::from_file(&local)? } else { Self::default() }
            }
        };
        cfg.apply_env_with(|k| std::env::var(k).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(path: &Path) -> Result<Self, BadgeError> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| BadgeError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&s)
    }

    /// Override fields from `STATBADGE_<FIELD>` variables resolved through `lookup`.
    ///
    /// # Errors
    /// `Config` if a numeric or boolean variable does not parse.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), BadgeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        if let Some(v) = var("BIND") { self.bind = v; }
        if let Some(v) = var("DATA_PATH") { self.data_path = PathBuf::from(v); }
        if let Some(v) = var("EPHEMERAL") { self.ephemeral = parse_bool("EPHEMERAL", &v)?; }
        if let Some(v) = var("CACHE_TTL_SECS") { self.cache_ttl_secs = parse_num("CACHE_TTL_SECS", &v)?; }
        if let Some(v) = var("CACHE_CAPACITY") { self.cache_capacity = parse_num("CACHE_CAPACITY", &v)?; }
        if let Some(v) = var("CACHE_SWEEP_SECS") { self.cache_sweep_secs = parse_num("CACHE_SWEEP_SECS", &v)?; }
        if let Some(v) = var("COOLDOWN_SECS") { self.cooldown_secs = parse_num("COOLDOWN_SECS", &v)?; }
        if let Some(v) = var("COOLDOWN_SWEEP_SECS") { self.cooldown_sweep_secs = parse_num("COOLDOWN_SWEEP_SECS", &v)?; }
        if let Some(v) = var("PROVIDER_BASE_URL") { self.provider_base_url = v; }
        if let Some(v) = var("PROVIDER_TIMEOUT_SECS") { self.provider_timeout_secs = parse_num("PROVIDER_TIMEOUT_SECS", &v)?; }
        if let Some(v) = var("PROVIDER_TOKEN") { self.provider_token = Some(v).filter(|t| !t.is_empty()); }
        if let Some(v) = var("RATE_LIMIT_WINDOW_SECS") { self.rate_limit_window_secs = parse_num("RATE_LIMIT_WINDOW_SECS", &v)?; }
        if let Some(v) = var("RATE_LIMIT_MAX") { self.rate_limit_max = parse_num("RATE_LIMIT_MAX", &v)?; }
        if let Some(v) = var("TRUST_PROXY") { self.trust_proxy = parse_bool("TRUST_PROXY", &v)?; }
        if let Some(v) = var("LOG_DIR") { self.log_dir = Some(PathBuf::from(v)); }
        if let Some(v) = var("LOG_LEVEL") { self.log_level = v; }
        if let Some(v) = var("LOG_RETENTION") { self.log_retention = parse_num("LOG_RETENTION", &v)?; }
        Ok(())
    }

    /// # Errors
    /// `Config` for zero durations, zero capacities or an empty bind address.
    pub fn validate(&self) -> Result<(), BadgeError> {
        let non_zero = [
            ("cache_ttl_secs", self.cache_ttl_secs),
            ("cache_sweep_secs", self.cache_sweep_secs),
            ("cooldown_secs", self.cooldown_secs),
            ("cooldown_sweep_secs", self.cooldown_sweep_secs),
            ("provider_timeout_secs", self.provider_timeout_secs),
            ("rate_limit_window_secs", self.rate_limit_window_secs),
            ("cache_capacity", self.cache_capacity as u64),
            ("rate_limit_max", u64::from(self.rate_limit_max)),
        ];
        if let Some((name, _)) = non_zero.iter().find(|(_, v)| *v == 0) {
            return Err(BadgeError::Config(format!("{name} must be greater than zero")));
        }
        if self.bind.trim().is_empty() {
            return Err(BadgeError::Config("bind must not be empty".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            capacity: self.cache_capacity,
            default_ttl: Duration::from_secs(self.cache_ttl_secs),
            purge_interval: Duration::from_secs(self.cache_sweep_secs),
        }
    }

    #[must_use]
    pub fn cooldown_window(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    #[must_use]
    pub fn cooldown_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cooldown_sweep_secs)
    }

    #[must_use]
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    #[must_use]
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

fn parse_num<T: std::str::FromStr>(name: &str, v: &str) -> Result<T, BadgeError> {
    v.trim()
        .parse()
        .map_err(|_| BadgeError::Config(format!("{ENV_PREFIX}{name}: not a number: {v}")))
}

fn parse_bool(name: &str, v: &str) -> Result<bool, BadgeError> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(BadgeError::Config(format!("{ENV_PREFIX}{name}: not a boolean: {v}"))),
    }
}

pub mod badge;
pub mod cache;
pub mod config;
pub mod cooldown;
pub mod counter;
pub mod errors;
pub mod logger;
pub mod maintenance;
pub mod provider;
pub mod resolver;
pub mod server;
pub mod service;
pub mod storage;
pub mod svg;
pub mod types;

use std::sync::Arc;

use crate::cache::TtlCache;
use crate::config::ServiceConfig;
use crate::cooldown::CooldownGate;
use crate::counter::ViewCounter;
use crate::errors::BadgeError;
use crate::maintenance::Maintenance;
use crate::provider::ProfileProvider;
use crate::provider::github::GithubProvider;
use crate::resolver::StatResolver;
use crate::service::BadgeService;
use crate::storage::Store;

/// The assembled badge service and the shared state behind it.
pub struct App {
    service: BadgeService,
    store: Arc<Store>,
    cooldown: Arc<CooldownGate>,
}

impl App {
    /// Wire the pipeline around `provider`. Opens the snapshot at
    /// `config.data_path` unless `config.ephemeral` is set.
    ///
    /// # Errors
    /// Fails if the snapshot cannot be opened or decoded.
    pub fn build(config: &ServiceConfig, provider: Arc<dyn ProfileProvider>) -> Result<Self, BadgeError> {
        let store = if config.ephemeral {
            log::info!("app: ephemeral store, nothing will be persisted");
            Store::in_memory()
        } else {
            Store::open(&config.data_path)?
        };
        let store = Arc::new(store);
        let cooldown = Arc::new(CooldownGate::new(config.cooldown_window()));
        let cache = TtlCache::new(store.clone(), config.cache_config());
        let resolver = StatResolver::new(ViewCounter::new(store.clone()), cooldown.clone(), provider);
        Ok(App { service: BadgeService::new(cache, resolver), store, cooldown })
    }

    /// [`App::build`] with the GitHub provider described by `config`.
    ///
    /// # Errors
    /// Fails if the HTTP client or the store cannot be created.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, BadgeError> {
        let provider = GithubProvider::new(
            &config.provider_base_url,
            config.provider_timeout(),
            config.provider_token.clone(),
        )?;
        Self::build(config, Arc::new(provider))
    }

    pub fn service(&self) -> &BadgeService {
        &self.service
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn cooldown(&self) -> &Arc<CooldownGate> {
        &self.cooldown
    }

    /// Start the periodic cache purge and cooldown sweep. Requires a tokio runtime.
    pub fn start_maintenance(&self, config: &ServiceConfig) -> Maintenance {
        Maintenance::start(
            self.service.cache().clone(),
            self.cooldown.clone(),
            config.cache_config().purge_interval,
            config.cooldown_sweep_interval(),
        )
    }
}

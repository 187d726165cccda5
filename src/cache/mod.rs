pub mod config;
pub mod core;
pub mod key;
pub mod metrics;
pub mod policy;

pub use config::CacheConfig;
pub use self::core::TtlCache;
pub use key::build_fingerprint;
pub use metrics::{CacheMetrics, CacheMetricsSnapshot};

//! Layered configuration (§9 "Design Notes", ambient stack): defaults,
//! overridden by `EDSEARCH.toml`, overridden by `EDSEARCH_`-prefixed
//! environment variables, matching the layering the teacher crate uses for
//! its own service configuration.

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Base URL of the archive host, e.g. `https://archive.example.test`.
    pub archive_base_url: String,
    /// Maximum size of the database connection pool (§5).
    pub db_pool_size: u32,
    /// Run pending migrations on startup before accepting work.
    pub run_migrations_on_startup: bool,
    /// Maximum number of datasets the run dispatcher processes concurrently
    /// when given `all` (§4.8's cap of 4).
    pub dataset_concurrency: usize,
    /// Capacity of the in-process freshness timestamp cache (§4.7's ~10 000
    /// entries).
    pub timestamp_cache_capacity: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            archive_base_url: "https://archive.example.test".to_string(),
            db_pool_size: 8,
            run_migrations_on_startup: true,
            dataset_concurrency: 4,
            timestamp_cache_capacity: 10_000,
        }
    }
}

impl IngestConfig {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file("EDSEARCH.toml"))
            .merge(Env::prefixed("EDSEARCH_"))
            .extract()
    }
}

pub mod freshness;
pub mod upsert;

pub use freshness::{FreshnessError, acquire_sentinel, apply_guard};
pub use upsert::{UpsertError, upsert_bundle};

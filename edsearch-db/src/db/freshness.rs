//! Persistent half of the Freshness Gate (§4.4): the `ingestion_lock`
//! sentinel table, its row-level lock, and the conditional timestamp
//! upsert that enforces the 10-second monotone-freshness guard.

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Int4, Text};
use miette::Diagnostic;
use thiserror::Error;

pub const SENTINEL_EVENT_KIND: &str = "__lock__";
pub const SENTINEL_TIMESTAMP: &str = "1970-01-01T00:00:00Z";
pub const STALE_GUARD_SECONDS: i64 = 10;

#[derive(Debug, Error, Diagnostic)]
pub enum FreshnessError {
    #[error("error bootstrapping ingestion_lock sentinel row")]
    SentinelBootstrap(#[source] diesel::result::Error),

    #[error("error acquiring ingestion_lock sentinel row")]
    SentinelAcquire(#[source] diesel::result::Error),

    #[error("error applying freshness guard")]
    Guard(#[source] diesel::result::Error),
}

#[derive(QueryableByName)]
struct OneRow {
    #[diesel(sql_type = Int4)]
    #[allow(dead_code)]
    one: i32,
}

#[derive(QueryableByName)]
struct AppliedRow {
    #[diesel(sql_type = diesel::sql_types::Bool)]
    applied: bool,
}

/// Ensure the sentinel row `(entity_kind, pk_json, "__lock__")` exists, then
/// acquire it with `SELECT ... FOR UPDATE`. Must be called inside the
/// caller's transaction; the row-level lock is released at `COMMIT`/
/// `ROLLBACK`. This serializes every event touching this entity across all
/// event kinds.
pub fn acquire_sentinel(
    conn: &mut PgConnection,
    entity_kind: &str,
    pk_json: &str,
) -> Result<(), FreshnessError> {
    sql_query(
        "INSERT INTO ingestion_lock (entity_kind, pk_json, event_kind, timestamp) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (entity_kind, pk_json, event_kind) DO NOTHING",
    )
    .bind::<Text, _>(entity_kind)
    .bind::<Text, _>(pk_json)
    .bind::<Text, _>(SENTINEL_EVENT_KIND)
    .bind::<Text, _>(SENTINEL_TIMESTAMP)
    .execute(conn)
    .map_err(FreshnessError::SentinelBootstrap)?;

    sql_query(
        "SELECT 1 AS one FROM ingestion_lock \
         WHERE entity_kind = $1 AND pk_json = $2 AND event_kind = $3 \
         FOR UPDATE",
    )
    .bind::<Text, _>(entity_kind)
    .bind::<Text, _>(pk_json)
    .bind::<Text, _>(SENTINEL_EVENT_KIND)
    .get_result::<OneRow>(conn)
    .map_err(FreshnessError::SentinelAcquire)?;

    Ok(())
}

/// The per-event guard (§4.4): after the sentinel is locked, conditionally
/// upsert the real `(entity_kind, pk_json, event_kind)` row. Returns whether
/// a row was written — `false` means the event is stale and the whole
/// transaction must roll back.
pub fn apply_guard(
    conn: &mut PgConnection,
    entity_kind: &str,
    pk_json: &str,
    event_kind: &str,
    timestamp: &str,
) -> Result<bool, FreshnessError> {
    let row = sql_query(
        "WITH upsert AS ( \
            INSERT INTO ingestion_lock (entity_kind, pk_json, event_kind, timestamp) \
            VALUES ($1, $2, $3, $4) \
            ON CONFLICT (entity_kind, pk_json, event_kind) \
            DO UPDATE SET timestamp = EXCLUDED.timestamp \
                WHERE EXCLUDED.timestamp::timestamptz \
                    > ingestion_lock.timestamp::timestamptz + make_interval(secs => $5) \
            RETURNING 1 \
         ) \
         SELECT COALESCE((SELECT true FROM upsert), false) AS applied",
    )
    .bind::<Text, _>(entity_kind)
    .bind::<Text, _>(pk_json)
    .bind::<Text, _>(event_kind)
    .bind::<Text, _>(timestamp)
    .bind::<diesel::sql_types::Double, _>(STALE_GUARD_SECONDS as f64)
    .get_result::<AppliedRow>(conn)
    .map_err(FreshnessError::Guard)?;

    Ok(row.applied)
}

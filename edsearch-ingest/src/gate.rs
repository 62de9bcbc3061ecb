//! The Freshness Gate (C4, §4.4): wraps one bundle's write in a single
//! transaction that acquires every entity's sentinel in canonical order,
//! applies the monotone-freshness guard to each, and either upserts the
//! whole bundle or rolls back if any entity turned out to be stale.

use diesel::prelude::*;
use diesel::sql_query;
use edsearch_db::bundle::{DatabaseModels, canonical_lock_set};
use edsearch_db::db::{FreshnessError, UpsertError, acquire_sentinel, apply_guard, upsert_bundle};
use miette::Diagnostic;
use thiserror::Error;

use crate::cache::TimestampCache;

const LOCK_TIMEOUT: &str = "3s";

#[derive(Debug, Error, Diagnostic)]
pub enum GateError {
    #[error("error setting transaction lock timeout")]
    LockTimeout(#[source] diesel::result::Error),

    #[error(transparent)]
    Freshness(#[from] FreshnessError),

    #[error(transparent)]
    Upsert(#[from] UpsertError),

    #[error("error running freshness-gated transaction")]
    Transaction(#[source] diesel::result::Error),

    /// Required so `conn.transaction` can report rollback-triggering
    /// errors that originate inside diesel itself (e.g. serialization
    /// failures), distinct from the explicit `LockTimeout` conversion above.
    #[error("transaction error")]
    Diesel(#[from] diesel::result::Error),

    /// Internal-only signal used to force `conn.transaction` to roll back
    /// when a bundle turns out stale; never returned to callers (see `apply`).
    #[error("bundle is stale")]
    Stale,
}

#[derive(Debug, PartialEq, Eq)]
pub enum GateOutcome {
    /// Every entity in the bundle passed its freshness guard; the bundle
    /// was upserted and the transaction committed.
    Applied,
    /// At least one entity in the bundle was stale; nothing was written.
    Stale,
}

/// Run the freshness gate for one event's bundle (§4.4). `event_kind` and
/// `timestamp` are the event tag and timestamp shared by every entity this
/// bundle touches; `cache` is consulted first to skip entities the process
/// has already seen a newer-or-equal timestamp for, without a database
/// round trip. The cache itself always updates on every check (§4.4), so
/// this pre-check never needs a separate record-on-success step.
pub fn apply(
    conn: &mut PgConnection,
    cache: &mut TimestampCache,
    bundle: &DatabaseModels,
    event_kind: &'static str,
    timestamp: &str,
) -> Result<GateOutcome, GateError> {
    let lock_set = canonical_lock_set(bundle);

    // `.map(...).collect()` rather than `.any(...)`: every entry's cache
    // update is a side effect that must run regardless of the others'
    // outcome, so this can't short-circuit.
    let newer_flags: Vec<bool> = lock_set
        .iter()
        .map(|(entity_kind, pk_json)| {
            cache.check_and_update(entity_kind, pk_json.clone(), event_kind, timestamp)
        })
        .collect();
    if !lock_set.is_empty() && !newer_flags.contains(&true) {
        return Ok(GateOutcome::Stale);
    }

    let result = conn.transaction(|conn| {
        sql_query(format!("SET LOCAL lock_timeout = '{LOCK_TIMEOUT}'"))
            .execute(conn)
            .map_err(GateError::LockTimeout)?;

        for (entity_kind, pk_json) in &lock_set {
            acquire_sentinel(conn, entity_kind, pk_json)?;
        }

        let mut any_stale = false;
        for (entity_kind, pk_json) in &lock_set {
            let applied = apply_guard(conn, entity_kind, pk_json, event_kind, timestamp)?;
            if !applied {
                any_stale = true;
            }
        }

        if any_stale {
            return Err(GateError::Stale);
        }

        upsert_bundle(conn, bundle)?;
        Ok(GateOutcome::Applied)
    });

    match result {
        Ok(outcome) => Ok(outcome),
        Err(GateError::Stale) => Ok(GateOutcome::Stale),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use diesel::sql_types::BigInt;
    use edsearch_db::bundle::{DatabaseModels, EntityKey, SystemInput};
    use edsearch_db::db::freshness::{acquire_sentinel, apply_guard};

    use super::*;

    fn connect() -> Option<PgConnection> {
        let url = std::env::var("DATABASE_URL").ok()?;
        edsearch_db::run_migrations().expect("migrations should apply cleanly");
        Some(PgConnection::establish(&url).expect("should connect to DATABASE_URL"))
    }

    #[derive(QueryableByName)]
    struct CountRow {
        #[diesel(sql_type = BigInt)]
        count: i64,
    }

    /// Regression test for the transaction bug where a stale bundle's
    /// rollback never happened: one system in the bundle passes its own
    /// guard, the other was pre-seeded to fail, so the whole bundle must
    /// come back `Stale` and neither system may end up written.
    #[test]
    fn one_stale_entity_rolls_back_the_whole_bundle() {
        let Some(mut conn) = connect() else {
            eprintln!("skipping: DATABASE_URL not set");
            return;
        };

        conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
            let fresh = SystemInput {
                system_address: 9_200_000_001,
                star_system: Some("Fresh System".to_string()),
                ..Default::default()
            };
            let stale = SystemInput {
                system_address: 9_200_000_002,
                star_system: Some("Stale System".to_string()),
                ..Default::default()
            };

            acquire_sentinel(conn, "system", &stale.primary_key_json()).unwrap();
            apply_guard(conn, "system", &stale.primary_key_json(), "FSDJump", "2026-01-01T00:00:00Z")
                .unwrap();

            let bundle = DatabaseModels {
                systems: vec![fresh.clone(), stale],
                ..Default::default()
            };
            let mut cache = TimestampCache::new(100);

            // 5 seconds later is inside the 10s stale window for `stale`.
            let outcome = apply(conn, &mut cache, &bundle, "FSDJump", "2026-01-01T00:00:05Z").unwrap();
            assert_eq!(outcome, GateOutcome::Stale);

            let row: CountRow =
                sql_query("SELECT COUNT(*) AS count FROM system WHERE system_address = $1")
                    .bind::<BigInt, _>(fresh.system_address)
                    .get_result(conn)?;
            assert_eq!(
                row.count, 0,
                "the fresh entity must not be written when its sibling in the bundle was stale"
            );

            Ok(())
        });
    }
}

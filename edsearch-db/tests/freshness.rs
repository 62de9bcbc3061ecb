//! Integration tests for the persistent half of the Freshness Gate (§4.4)
//! against a live Postgres. Skipped unless `DATABASE_URL` is set.

use diesel::prelude::*;
use edsearch_db::db::freshness::{acquire_sentinel, apply_guard};

fn connect() -> Option<PgConnection> {
    let url = std::env::var("DATABASE_URL").ok()?;
    edsearch_db::run_migrations().expect("migrations should apply cleanly");
    Some(PgConnection::establish(&url).expect("should connect to DATABASE_URL"))
}

#[test]
fn guard_accepts_first_event_and_rejects_one_inside_the_stale_window() {
    let Some(mut conn) = connect() else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
        let pk = "{\"system_address\":9000000003}";
        acquire_sentinel(conn, "system", pk).unwrap();

        let first = apply_guard(conn, "system", pk, "FSDJump", "2026-01-01T00:00:00Z").unwrap();
        assert!(first, "first event for a fresh key must be applied");

        // 5 seconds later is within the 10s guard window, so the second
        // event with different content at the same approximate time must
        // be rejected (§9 Open Question (a)).
        let second = apply_guard(conn, "system", pk, "FSDJump", "2026-01-01T00:00:05Z").unwrap();
        assert!(!second, "an event inside the stale window must be rejected");

        let third = apply_guard(conn, "system", pk, "FSDJump", "2026-01-01T00:00:11Z").unwrap();
        assert!(third, "an event past the stale window must be applied");

        Ok(())
    });
}

#[test]
fn guard_is_scoped_per_event_kind() {
    let Some(mut conn) = connect() else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
        let pk = "{\"system_address\":9000000004}";
        acquire_sentinel(conn, "system", pk).unwrap();

        let fsd = apply_guard(conn, "system", pk, "FSDJump", "2026-01-01T00:00:00Z").unwrap();
        assert!(fsd);

        // A different event kind on the same entity has its own timestamp
        // row, so it is unaffected by FSDJump's guard window.
        let carrier =
            apply_guard(conn, "system", pk, "CarrierJump", "2026-01-01T00:00:01Z").unwrap();
        assert!(carrier);

        Ok(())
    });
}

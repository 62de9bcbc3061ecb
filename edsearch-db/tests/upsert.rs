//! Integration tests for the Upsert Engine (§4.5) against a live Postgres.
//!
//! Skipped entirely unless `DATABASE_URL` is set, the same way the teacher
//! crate's own database-backed tests are gated — these touch real tables
//! and are not meaningful against a mock.

use diesel::prelude::*;
use edsearch_db::bundle::{BodyInput, SystemInput};
use edsearch_db::db::upsert::{upsert_body, upsert_system};

fn connect() -> Option<PgConnection> {
    let url = std::env::var("DATABASE_URL").ok()?;
    edsearch_db::run_migrations().expect("migrations should apply cleanly");
    Some(PgConnection::establish(&url).expect("should connect to DATABASE_URL"))
}

#[test]
fn system_upsert_partial_merges_null_fields() {
    let Some(mut conn) = connect() else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
        let address = 9_000_000_001_i64;

        upsert_system(
            conn,
            &SystemInput {
                system_address: address,
                star_system: Some("Integration Test System".to_string()),
                pos: Some((1.0, 2.0, 3.0)),
                allegiance: Some("Federation".to_string()),
                government: None,
                security: None,
                economy: None,
                second_economy: None,
                population: Some(1_000_000),
                powerplay_state: None,
                faction_name: None,
                powers: None,
                factions: None,
                conflicts: None,
            },
        )
        .unwrap();

        // A later, partial event must not clobber the name set above.
        upsert_system(
            conn,
            &SystemInput {
                system_address: address,
                star_system: None,
                pos: None,
                allegiance: None,
                government: Some("Democracy".to_string()),
                security: None,
                economy: None,
                second_economy: None,
                population: None,
                powerplay_state: None,
                faction_name: None,
                powers: None,
                factions: None,
                conflicts: None,
            },
        )
        .unwrap();

        #[derive(QueryableByName, Debug)]
        struct Row {
            #[diesel(sql_type = diesel::sql_types::Text)]
            star_system: String,
            #[diesel(sql_type = diesel::sql_types::Text)]
            government: String,
        }

        let row: Row = diesel::sql_query(
            "SELECT star_system, government FROM system WHERE system_address = $1",
        )
        .bind::<diesel::sql_types::Int8, _>(address)
        .get_result(conn)?;

        assert_eq!(row.star_system, "Integration Test System");
        assert_eq!(row.government, "Democracy");

        Ok(())
    });
}

#[test]
fn body_upsert_replaces_child_materials_wholesale() {
    let Some(mut conn) = connect() else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
        let address = 9_000_000_002_i64;
        let body_id = 1_i64;

        let mut first = BodyInput::default();
        first.system_address = address;
        first.body_id = body_id;
        first.materials = Some(vec![("Iron".to_string(), 10.0), ("Nickel".to_string(), 5.0)]);
        upsert_body(conn, &first).unwrap();

        let mut second = BodyInput::default();
        second.system_address = address;
        second.body_id = body_id;
        second.materials = Some(vec![("Carbon".to_string(), 20.0)]);
        upsert_body(conn, &second).unwrap();

        #[derive(QueryableByName, Debug)]
        struct NameRow {
            #[diesel(sql_type = diesel::sql_types::Text)]
            name: String,
        }

        let rows: Vec<NameRow> = diesel::sql_query(
            "SELECT name FROM body_material WHERE system_address = $1 AND body_id = $2",
        )
        .bind::<diesel::sql_types::Int8, _>(address)
        .bind::<diesel::sql_types::Int8, _>(body_id)
        .get_results(conn)?;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Carbon");

        Ok(())
    });
}

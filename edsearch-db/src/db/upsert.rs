//! The Upsert Engine (C5, §4.5).
//!
//! Parent rows are upserted with one static `INSERT ... ON CONFLICT DO
//! UPDATE SET col = COALESCE(EXCLUDED.col, table.col)` statement per entity:
//! a null incoming value always collapses to the already-stored value, a
//! non-null value always overwrites — exactly the partial-merge rule
//! (§3.3.2), expressed without having to build the column list at runtime.
//!
//! Child collections are replaced wholesale: delete every existing child
//! row for the parent's primary key, then insert the new set with
//! `ON CONFLICT DO NOTHING` so intra-batch duplicates collapse silently
//! (§3.3.3, §4.5).
//!
//! Every function here must be called inside the caller's transaction; none
//! of them begin or commit one themselves (§4.4's "Transaction shape").

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Bool, Float8, Int4, Int8, Nullable, Text};
use miette::Diagnostic;
use thiserror::Error;

use crate::bundle::*;
use crate::models::*;
use crate::schema::*;

#[derive(Debug, Error, Diagnostic)]
pub enum UpsertError {
    #[error("error upserting {entity} parent row")]
    Parent {
        entity: &'static str,
        #[source]
        source: diesel::result::Error,
    },

    #[error("error deleting {entity} child rows")]
    ChildDelete {
        entity: &'static str,
        #[source]
        source: diesel::result::Error,
    },

    #[error("error inserting {entity} child rows")]
    ChildInsert {
        entity: &'static str,
        #[source]
        source: diesel::result::Error,
    },

    #[error("landmark upsert did not return a synthetic id")]
    LandmarkIdMissing,
}

/// Apply an entire bundle. Callers are responsible for the enclosing
/// transaction and the freshness gate; this function only performs writes.
pub fn upsert_bundle(conn: &mut PgConnection, bundle: &DatabaseModels) -> Result<(), UpsertError> {
    for system in &bundle.systems {
        upsert_system(conn, system)?;
    }
    for body in &bundle.bodies {
        upsert_body(conn, body)?;
    }
    for station in &bundle.stations {
        upsert_station(conn, station)?;
    }
    for landmark in &bundle.landmarks {
        upsert_landmark(conn, landmark)?;
    }
    for market in &bundle.markets {
        upsert_market(conn, market)?;
    }
    for shipyard in &bundle.shipyards {
        upsert_shipyard(conn, shipyard)?;
    }
    for outfitting in &bundle.outfittings {
        upsert_outfitting(conn, outfitting)?;
    }
    for signal in &bundle.signals {
        upsert_signal(conn, signal)?;
    }
    Ok(())
}

pub fn upsert_system(conn: &mut PgConnection, input: &SystemInput) -> Result<(), UpsertError> {
    let (pos_x, pos_y, pos_z) = match input.pos {
        Some((x, y, z)) => (Some(x), Some(y), Some(z)),
        None => (None, None, None),
    };

    sql_query(
        "INSERT INTO system \
            (system_address, star_system, pos_x, pos_y, pos_z, allegiance, government, \
             security, economy, second_economy, population, powerplay_state, faction_name) \
         VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13) \
         ON CONFLICT (system_address) DO UPDATE SET \
            star_system = COALESCE(EXCLUDED.star_system, system.star_system), \
            pos_x = COALESCE(EXCLUDED.pos_x, system.pos_x), \
            pos_y = COALESCE(EXCLUDED.pos_y, system.pos_y), \
            pos_z = COALESCE(EXCLUDED.pos_z, system.pos_z), \
            allegiance = COALESCE(EXCLUDED.allegiance, system.allegiance), \
            government = COALESCE(EXCLUDED.government, system.government), \
            security = COALESCE(EXCLUDED.security, system.security), \
            economy = COALESCE(EXCLUDED.economy, system.economy), \
            second_economy = COALESCE(EXCLUDED.second_economy, system.second_economy), \
            population = COALESCE(EXCLUDED.population, system.population), \
            powerplay_state = COALESCE(EXCLUDED.powerplay_state, system.powerplay_state), \
            faction_name = COALESCE(EXCLUDED.faction_name, system.faction_name)",
    )
    .bind::<Int8, _>(input.system_address)
    .bind::<Nullable<Text>, _>(input.star_system.clone())
    .bind::<Nullable<Float8>, _>(pos_x)
    .bind::<Nullable<Float8>, _>(pos_y)
    .bind::<Nullable<Float8>, _>(pos_z)
    .bind::<Nullable<Text>, _>(input.allegiance.clone())
    .bind::<Nullable<Text>, _>(input.government.clone())
    .bind::<Nullable<Text>, _>(input.security.clone())
    .bind::<Nullable<Text>, _>(input.economy.clone())
    .bind::<Nullable<Text>, _>(input.second_economy.clone())
    .bind::<Nullable<Int8>, _>(input.population)
    .bind::<Nullable<Text>, _>(input.powerplay_state.clone())
    .bind::<Nullable<Text>, _>(input.faction_name.clone())
    .execute(conn)
    .map_err(|source| UpsertError::Parent {
        entity: "system",
        source,
    })?;

    if let Some(powers) = &input.powers {
        diesel::delete(system_power::table)
            .filter(system_power::system_address.eq(input.system_address))
            .execute(conn)
            .map_err(|source| UpsertError::ChildDelete {
                entity: "system_power",
                source,
            })?;

        let rows: Vec<NewSystemPower> = powers
            .iter()
            .map(|name| NewSystemPower {
                system_address: input.system_address,
                power_name: name.clone(),
            })
            .collect();

        if !rows.is_empty() {
            diesel::insert_into(system_power::table)
                .values(rows)
                .on_conflict_do_nothing()
                .execute(conn)
                .map_err(|source| UpsertError::ChildInsert {
                    entity: "system_power",
                    source,
                })?;
        }
    }

    if let Some(factions) = &input.factions {
        diesel::delete(system_faction::table)
            .filter(system_faction::system_address.eq(input.system_address))
            .execute(conn)
            .map_err(|source| UpsertError::ChildDelete {
                entity: "system_faction",
                source,
            })?;
        diesel::delete(system_faction_state::table)
            .filter(system_faction_state::system_address.eq(input.system_address))
            .execute(conn)
            .map_err(|source| UpsertError::ChildDelete {
                entity: "system_faction_state",
                source,
            })?;

        let faction_rows: Vec<NewSystemFaction> = factions
            .iter()
            .map(|f| NewSystemFaction {
                system_address: input.system_address,
                name: f.name.clone(),
                influence: f.influence,
                happiness: f.happiness.clone(),
                allegiance: f.allegiance.clone(),
                faction_state: f.faction_state.clone(),
                government: f.government.clone(),
                squadron_faction: f.squadron_faction,
            })
            .collect();

        if !faction_rows.is_empty() {
            diesel::insert_into(system_faction::table)
                .values(faction_rows)
                .on_conflict_do_nothing()
                .execute(conn)
                .map_err(|source| UpsertError::ChildInsert {
                    entity: "system_faction",
                    source,
                })?;
        }

        let mut state_rows = Vec::new();
        for faction in factions {
            for (kind, states) in [
                ("active", &faction.active_states),
                ("pending", &faction.pending_states),
                ("recovering", &faction.recovering_states),
            ] {
                for (state, trend) in states {
                    state_rows.push(NewSystemFactionState {
                        system_address: input.system_address,
                        faction_name: faction.name.clone(),
                        kind: kind.to_string(),
                        state: state.clone(),
                        trend: *trend,
                    });
                }
            }
        }

        if !state_rows.is_empty() {
            diesel::insert_into(system_faction_state::table)
                .values(state_rows)
                .on_conflict_do_nothing()
                .execute(conn)
                .map_err(|source| UpsertError::ChildInsert {
                    entity: "system_faction_state",
                    source,
                })?;
        }
    }

    if let Some(conflicts) = &input.conflicts {
        diesel::delete(system_conflict::table)
            .filter(system_conflict::system_address.eq(input.system_address))
            .execute(conn)
            .map_err(|source| UpsertError::ChildDelete {
                entity: "system_conflict",
                source,
            })?;

        let rows: Vec<NewSystemConflict> = conflicts
            .iter()
            .map(|c| NewSystemConflict {
                system_address: input.system_address,
                faction1_name: c.faction1_name.clone(),
                faction2_name: c.faction2_name.clone(),
                status: c.status.clone(),
                war_type: c.war_type.clone(),
                faction1_stake: c.faction1_stake.clone(),
                faction1_won_days: c.faction1_won_days,
                faction2_stake: c.faction2_stake.clone(),
                faction2_won_days: c.faction2_won_days,
            })
            .collect();

        if !rows.is_empty() {
            diesel::insert_into(system_conflict::table)
                .values(rows)
                .on_conflict_do_nothing()
                .execute(conn)
                .map_err(|source| UpsertError::ChildInsert {
                    entity: "system_conflict",
                    source,
                })?;
        }
    }

    Ok(())
}

pub fn upsert_body(conn: &mut PgConnection, input: &BodyInput) -> Result<(), UpsertError> {
    sql_query(
        "INSERT INTO body \
            (system_address, body_id, body_name, body_type, parent, distance_from_arrival_ls, \
             star_type, subclass, planet_class, atmosphere, volcanism, mass_em, radius, \
             surface_gravity, surface_temperature, surface_pressure, landable, terraform_state, \
             tidal_lock, composition_ice, composition_metal, composition_rock, semi_major_axis, \
             eccentricity, orbital_inclination, periapsis, orbital_period, ascending_node, \
             mean_anomaly, axial_tilt, rotation_period) \
         VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19,$20,$21,$22,\
                 $23,$24,$25,$26,$27,$28,$29,$30,$31) \
         ON CONFLICT (system_address, body_id) DO UPDATE SET \
            body_name = COALESCE(EXCLUDED.body_name, body.body_name), \
            body_type = COALESCE(EXCLUDED.body_type, body.body_type), \
            parent = COALESCE(EXCLUDED.parent, body.parent), \
            distance_from_arrival_ls = COALESCE(EXCLUDED.distance_from_arrival_ls, body.distance_from_arrival_ls), \
            star_type = COALESCE(EXCLUDED.star_type, body.star_type), \
            subclass = COALESCE(EXCLUDED.subclass, body.subclass), \
            planet_class = COALESCE(EXCLUDED.planet_class, body.planet_class), \
            atmosphere = COALESCE(EXCLUDED.atmosphere, body.atmosphere), \
            volcanism = COALESCE(EXCLUDED.volcanism, body.volcanism), \
            mass_em = COALESCE(EXCLUDED.mass_em, body.mass_em), \
            radius = COALESCE(EXCLUDED.radius, body.radius), \
            surface_gravity = COALESCE(EXCLUDED.surface_gravity, body.surface_gravity), \
            surface_temperature = COALESCE(EXCLUDED.surface_temperature, body.surface_temperature), \
            surface_pressure = COALESCE(EXCLUDED.surface_pressure, body.surface_pressure), \
            landable = COALESCE(EXCLUDED.landable, body.landable), \
            terraform_state = COALESCE(EXCLUDED.terraform_state, body.terraform_state), \
            tidal_lock = COALESCE(EXCLUDED.tidal_lock, body.tidal_lock), \
            composition_ice = COALESCE(EXCLUDED.composition_ice, body.composition_ice), \
            composition_metal = COALESCE(EXCLUDED.composition_metal, body.composition_metal), \
            composition_rock = COALESCE(EXCLUDED.composition_rock, body.composition_rock), \
            semi_major_axis = COALESCE(EXCLUDED.semi_major_axis, body.semi_major_axis), \
            eccentricity = COALESCE(EXCLUDED.eccentricity, body.eccentricity), \
            orbital_inclination = COALESCE(EXCLUDED.orbital_inclination, body.orbital_inclination), \
            periapsis = COALESCE(EXCLUDED.periapsis, body.periapsis), \
            orbital_period = COALESCE(EXCLUDED.orbital_period, body.orbital_period), \
            ascending_node = COALESCE(EXCLUDED.ascending_node, body.ascending_node), \
            mean_anomaly = COALESCE(EXCLUDED.mean_anomaly, body.mean_anomaly), \
            axial_tilt = COALESCE(EXCLUDED.axial_tilt, body.axial_tilt), \
            rotation_period = COALESCE(EXCLUDED.rotation_period, body.rotation_period)",
    )
    .bind::<Int8, _>(input.system_address)
    .bind::<Int8, _>(input.body_id)
    .bind::<Nullable<Text>, _>(input.body_name.clone())
    .bind::<Nullable<Text>, _>(input.body_type.clone())
    .bind::<Nullable<Int8>, _>(input.parent)
    .bind::<Nullable<Float8>, _>(input.distance_from_arrival_ls)
    .bind::<Nullable<Text>, _>(input.star_type.clone())
    .bind::<Nullable<Int4>, _>(input.subclass)
    .bind::<Nullable<Text>, _>(input.planet_class.clone())
    .bind::<Nullable<Text>, _>(input.atmosphere.clone())
    .bind::<Nullable<Text>, _>(input.volcanism.clone())
    .bind::<Nullable<Float8>, _>(input.mass_em)
    .bind::<Nullable<Float8>, _>(input.radius)
    .bind::<Nullable<Float8>, _>(input.surface_gravity)
    .bind::<Nullable<Float8>, _>(input.surface_temperature)
    .bind::<Nullable<Float8>, _>(input.surface_pressure)
    .bind::<Nullable<Bool>, _>(input.landable)
    .bind::<Nullable<Text>, _>(input.terraform_state.clone())
    .bind::<Nullable<Bool>, _>(input.tidal_lock)
    .bind::<Nullable<Float8>, _>(input.composition_ice)
    .bind::<Nullable<Float8>, _>(input.composition_metal)
    .bind::<Nullable<Float8>, _>(input.composition_rock)
    .bind::<Nullable<Float8>, _>(input.semi_major_axis)
    .bind::<Nullable<Float8>, _>(input.eccentricity)
    .bind::<Nullable<Float8>, _>(input.orbital_inclination)
    .bind::<Nullable<Float8>, _>(input.periapsis)
    .bind::<Nullable<Float8>, _>(input.orbital_period)
    .bind::<Nullable<Float8>, _>(input.ascending_node)
    .bind::<Nullable<Float8>, _>(input.mean_anomaly)
    .bind::<Nullable<Float8>, _>(input.axial_tilt)
    .bind::<Nullable<Float8>, _>(input.rotation_period)
    .execute(conn)
    .map_err(|source| UpsertError::Parent {
        entity: "body",
        source,
    })?;

    if let Some(materials) = &input.materials {
        diesel::delete(body_material::table)
            .filter(body_material::system_address.eq(input.system_address))
            .filter(body_material::body_id.eq(input.body_id))
            .execute(conn)
            .map_err(|source| UpsertError::ChildDelete {
                entity: "body_material",
                source,
            })?;

        let rows: Vec<NewBodyMaterial> = materials
            .iter()
            .map(|(name, percent)| NewBodyMaterial {
                system_address: input.system_address,
                body_id: input.body_id,
                name: name.clone(),
                percent: *percent,
            })
            .collect();

        if !rows.is_empty() {
            diesel::insert_into(body_material::table)
                .values(rows)
                .on_conflict_do_nothing()
                .execute(conn)
                .map_err(|source| UpsertError::ChildInsert {
                    entity: "body_material",
                    source,
                })?;
        }
    }

    if let Some(atmosphere) = &input.atmosphere_composition {
        diesel::delete(body_atmosphere_composition::table)
            .filter(body_atmosphere_composition::system_address.eq(input.system_address))
            .filter(body_atmosphere_composition::body_id.eq(input.body_id))
            .execute(conn)
            .map_err(|source| UpsertError::ChildDelete {
                entity: "body_atmosphere_composition",
                source,
            })?;

        let rows: Vec<NewBodyAtmosphereComposition> = atmosphere
            .iter()
            .map(|(name, percent)| NewBodyAtmosphereComposition {
                system_address: input.system_address,
                body_id: input.body_id,
                name: name.clone(),
                percent: *percent,
            })
            .collect();

        if !rows.is_empty() {
            diesel::insert_into(body_atmosphere_composition::table)
                .values(rows)
                .on_conflict_do_nothing()
                .execute(conn)
                .map_err(|source| UpsertError::ChildInsert {
                    entity: "body_atmosphere_composition",
                    source,
                })?;
        }
    }

    if let Some(rings) = &input.rings {
        diesel::delete(body_ring::table)
            .filter(body_ring::system_address.eq(input.system_address))
            .filter(body_ring::body_id.eq(input.body_id))
            .execute(conn)
            .map_err(|source| UpsertError::ChildDelete {
                entity: "body_ring",
                source,
            })?;

        let rows: Vec<NewBodyRing> = rings
            .iter()
            .map(|ring| NewBodyRing {
                system_address: input.system_address,
                body_id: input.body_id,
                name: ring.name.clone(),
                ring_class: ring.ring_class.clone(),
                mass_mt: ring.mass_mt,
                inner_rad: ring.inner_rad,
                outer_rad: ring.outer_rad,
            })
            .collect();

        if !rows.is_empty() {
            diesel::insert_into(body_ring::table)
                .values(rows)
                .on_conflict_do_nothing()
                .execute(conn)
                .map_err(|source| UpsertError::ChildInsert {
                    entity: "body_ring",
                    source,
                })?;
        }
    }

    Ok(())
}

pub fn upsert_station(conn: &mut PgConnection, input: &StationInput) -> Result<(), UpsertError> {
    sql_query(
        "INSERT INTO station \
            (market_id, system_address, station_name, station_type, body_id, latitude, \
             longitude, dist_from_star_ls, government, allegiance, faction_name, faction_state, \
             economy, state, num_services, num_economies, landing_pads_large, \
             landing_pads_medium, landing_pads_small) \
         VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19) \
         ON CONFLICT (market_id) DO UPDATE SET \
            system_address = COALESCE(EXCLUDED.system_address, station.system_address), \
            station_name = COALESCE(EXCLUDED.station_name, station.station_name), \
            station_type = COALESCE(EXCLUDED.station_type, station.station_type), \
            body_id = COALESCE(EXCLUDED.body_id, station.body_id), \
            latitude = COALESCE(EXCLUDED.latitude, station.latitude), \
            longitude = COALESCE(EXCLUDED.longitude, station.longitude), \
            dist_from_star_ls = COALESCE(EXCLUDED.dist_from_star_ls, station.dist_from_star_ls), \
            government = COALESCE(EXCLUDED.government, station.government), \
            allegiance = COALESCE(EXCLUDED.allegiance, station.allegiance), \
            faction_name = COALESCE(EXCLUDED.faction_name, station.faction_name), \
            faction_state = COALESCE(EXCLUDED.faction_state, station.faction_state), \
            economy = COALESCE(EXCLUDED.economy, station.economy), \
            state = COALESCE(EXCLUDED.state, station.state), \
            num_services = COALESCE(EXCLUDED.num_services, station.num_services), \
            num_economies = COALESCE(EXCLUDED.num_economies, station.num_economies), \
            landing_pads_large = COALESCE(EXCLUDED.landing_pads_large, station.landing_pads_large), \
            landing_pads_medium = COALESCE(EXCLUDED.landing_pads_medium, station.landing_pads_medium), \
            landing_pads_small = COALESCE(EXCLUDED.landing_pads_small, station.landing_pads_small)",
    )
    .bind::<Int8, _>(input.market_id)
    .bind::<Nullable<Int8>, _>(input.system_address)
    .bind::<Nullable<Text>, _>(input.station_name.clone())
    .bind::<Nullable<Text>, _>(input.station_type.clone())
    .bind::<Nullable<Int8>, _>(input.body_id)
    .bind::<Nullable<Float8>, _>(input.latitude)
    .bind::<Nullable<Float8>, _>(input.longitude)
    .bind::<Nullable<Float8>, _>(input.dist_from_star_ls)
    .bind::<Nullable<Text>, _>(input.government.clone())
    .bind::<Nullable<Text>, _>(input.allegiance.clone())
    .bind::<Nullable<Text>, _>(input.faction_name.clone())
    .bind::<Nullable<Text>, _>(input.faction_state.clone())
    .bind::<Nullable<Text>, _>(input.economy.clone())
    .bind::<Nullable<Text>, _>(input.state.clone())
    .bind::<Nullable<Int4>, _>(input.num_services)
    .bind::<Nullable<Int4>, _>(input.num_economies)
    .bind::<Nullable<Int4>, _>(input.landing_pads_large)
    .bind::<Nullable<Int4>, _>(input.landing_pads_medium)
    .bind::<Nullable<Int4>, _>(input.landing_pads_small)
    .execute(conn)
    .map_err(|source| UpsertError::Parent {
        entity: "station",
        source,
    })?;

    if let Some(economies) = &input.station_economies {
        diesel::delete(station_economy::table)
            .filter(station_economy::market_id.eq(input.market_id))
            .execute(conn)
            .map_err(|source| UpsertError::ChildDelete {
                entity: "station_economy",
                source,
            })?;

        let rows: Vec<NewStationEconomy> = economies
            .iter()
            .map(|(name, proportion)| NewStationEconomy {
                market_id: input.market_id,
                name: name.clone(),
                proportion: *proportion,
            })
            .collect();

        if !rows.is_empty() {
            diesel::insert_into(station_economy::table)
                .values(rows)
                .on_conflict_do_nothing()
                .execute(conn)
                .map_err(|source| UpsertError::ChildInsert {
                    entity: "station_economy",
                    source,
                })?;
        }
    }

    if let Some(services) = &input.station_services {
        diesel::delete(station_service::table)
            .filter(station_service::market_id.eq(input.market_id))
            .execute(conn)
            .map_err(|source| UpsertError::ChildDelete {
                entity: "station_service",
                source,
            })?;

        let rows: Vec<NewStationService> = services
            .iter()
            .map(|name| NewStationService {
                market_id: input.market_id,
                name: name.clone(),
            })
            .collect();

        if !rows.is_empty() {
            diesel::insert_into(station_service::table)
                .values(rows)
                .on_conflict_do_nothing()
                .execute(conn)
                .map_err(|source| UpsertError::ChildInsert {
                    entity: "station_service",
                    source,
                })?;
        }
    }

    Ok(())
}

/// Landmark parent upsert targets the unique index on
/// `(coalesce(entry_id,-1), coalesce(auxiliary_id,''))` and returns the
/// synthetic `id` used to key trait rows (§4.5).
pub fn upsert_landmark(conn: &mut PgConnection, input: &LandmarkInput) -> Result<(), UpsertError> {
    #[derive(QueryableByName)]
    struct IdRow {
        #[diesel(sql_type = Int8)]
        id: i64,
    }

    let row = sql_query(
        "INSERT INTO landmark \
            (entry_id, auxiliary_id, system_address, body_id, name, latitude, longitude) \
         VALUES ($1,$2,$3,$4,$5,$6,$7) \
         ON CONFLICT (COALESCE(entry_id,-1), COALESCE(auxiliary_id,'')) DO UPDATE SET \
            system_address = COALESCE(EXCLUDED.system_address, landmark.system_address), \
            body_id = COALESCE(EXCLUDED.body_id, landmark.body_id), \
            name = COALESCE(EXCLUDED.name, landmark.name), \
            latitude = COALESCE(EXCLUDED.latitude, landmark.latitude), \
            longitude = COALESCE(EXCLUDED.longitude, landmark.longitude) \
         RETURNING id",
    )
    .bind::<Nullable<Int8>, _>(input.entry_id)
    .bind::<Nullable<Text>, _>(input.auxiliary_id.clone())
    .bind::<Nullable<Int8>, _>(input.system_address)
    .bind::<Nullable<Int8>, _>(input.body_id)
    .bind::<Nullable<Text>, _>(input.name.clone())
    .bind::<Nullable<Float8>, _>(input.latitude)
    .bind::<Nullable<Float8>, _>(input.longitude)
    .get_result::<IdRow>(conn)
    .map_err(|source| UpsertError::Parent {
        entity: "landmark",
        source,
    })?;

    if let Some(traits) = &input.traits {
        diesel::delete(landmark_trait::table)
            .filter(landmark_trait::landmark_id.eq(row.id))
            .execute(conn)
            .map_err(|source| UpsertError::ChildDelete {
                entity: "landmark_trait",
                source,
            })?;

        let rows: Vec<NewLandmarkTrait> = traits
            .iter()
            .map(|trait_name| NewLandmarkTrait {
                landmark_id: row.id,
                trait_name: trait_name.clone(),
            })
            .collect();

        if !rows.is_empty() {
            diesel::insert_into(landmark_trait::table)
                .values(rows)
                .on_conflict_do_nothing()
                .execute(conn)
                .map_err(|source| UpsertError::ChildInsert {
                    entity: "landmark_trait",
                    source,
                })?;
        }
    }

    Ok(())
}

pub fn upsert_market(conn: &mut PgConnection, input: &MarketInput) -> Result<(), UpsertError> {
    sql_query(
        "INSERT INTO market (market_id, timestamp) VALUES ($1,$2) \
         ON CONFLICT (market_id) DO UPDATE SET \
            timestamp = COALESCE(EXCLUDED.timestamp, market.timestamp)",
    )
    .bind::<Int8, _>(input.market_id)
    .bind::<Nullable<Text>, _>(input.timestamp.clone())
    .execute(conn)
    .map_err(|source| UpsertError::Parent {
        entity: "market",
        source,
    })?;

    if let Some(commodities) = &input.commodities {
        diesel::delete(market_commodity::table)
            .filter(market_commodity::market_id.eq(input.market_id))
            .execute(conn)
            .map_err(|source| UpsertError::ChildDelete {
                entity: "market_commodity",
                source,
            })?;

        let rows: Vec<NewMarketCommodity> = commodities
            .iter()
            .map(|c| NewMarketCommodity {
                market_id: input.market_id,
                name: c.name.clone(),
                category: c.category.clone(),
                stock: c.stock,
                demand: c.demand,
                supply: c.supply,
                buy_price: c.buy_price,
                sell_price: c.sell_price,
            })
            .collect();

        if !rows.is_empty() {
            diesel::insert_into(market_commodity::table)
                .values(rows)
                .on_conflict_do_nothing()
                .execute(conn)
                .map_err(|source| UpsertError::ChildInsert {
                    entity: "market_commodity",
                    source,
                })?;
        }
    }

    Ok(())
}

pub fn upsert_shipyard(conn: &mut PgConnection, input: &ShipyardInput) -> Result<(), UpsertError> {
    sql_query(
        "INSERT INTO shipyard (market_id, timestamp, num_ships) VALUES ($1,$2,$3) \
         ON CONFLICT (market_id) DO UPDATE SET \
            timestamp = COALESCE(EXCLUDED.timestamp, shipyard.timestamp), \
            num_ships = COALESCE(EXCLUDED.num_ships, shipyard.num_ships)",
    )
    .bind::<Int8, _>(input.market_id)
    .bind::<Nullable<Text>, _>(input.timestamp.clone())
    .bind::<Nullable<Int4>, _>(input.num_ships)
    .execute(conn)
    .map_err(|source| UpsertError::Parent {
        entity: "shipyard",
        source,
    })?;

    if let Some(ships) = &input.ships {
        diesel::delete(shipyard_ship::table)
            .filter(shipyard_ship::market_id.eq(input.market_id))
            .execute(conn)
            .map_err(|source| UpsertError::ChildDelete {
                entity: "shipyard_ship",
                source,
            })?;

        let rows: Vec<NewShipyardShip> = ships
            .iter()
            .map(|name| NewShipyardShip {
                market_id: input.market_id,
                name: name.clone(),
            })
            .collect();

        if !rows.is_empty() {
            diesel::insert_into(shipyard_ship::table)
                .values(rows)
                .on_conflict_do_nothing()
                .execute(conn)
                .map_err(|source| UpsertError::ChildInsert {
                    entity: "shipyard_ship",
                    source,
                })?;
        }
    }

    Ok(())
}

pub fn upsert_outfitting(
    conn: &mut PgConnection,
    input: &OutfittingInput,
) -> Result<(), UpsertError> {
    sql_query(
        "INSERT INTO outfitting (market_id, timestamp) VALUES ($1,$2) \
         ON CONFLICT (market_id) DO UPDATE SET \
            timestamp = COALESCE(EXCLUDED.timestamp, outfitting.timestamp)",
    )
    .bind::<Int8, _>(input.market_id)
    .bind::<Nullable<Text>, _>(input.timestamp.clone())
    .execute(conn)
    .map_err(|source| UpsertError::Parent {
        entity: "outfitting",
        source,
    })?;

    if let Some(modules) = &input.modules {
        diesel::delete(outfitting_module::table)
            .filter(outfitting_module::market_id.eq(input.market_id))
            .execute(conn)
            .map_err(|source| UpsertError::ChildDelete {
                entity: "outfitting_module",
                source,
            })?;

        let rows: Vec<NewOutfittingModule> = modules
            .iter()
            .map(|name| NewOutfittingModule {
                market_id: input.market_id,
                name: name.clone(),
            })
            .collect();

        if !rows.is_empty() {
            diesel::insert_into(outfitting_module::table)
                .values(rows)
                .on_conflict_do_nothing()
                .execute(conn)
                .map_err(|source| UpsertError::ChildInsert {
                    entity: "outfitting_module",
                    source,
                })?;
        }
    }

    Ok(())
}

/// Signal is a no-child entity: its "upsert" is the whole write (§4.5).
pub fn upsert_signal(conn: &mut PgConnection, input: &SignalInput) -> Result<(), UpsertError> {
    sql_query(
        "INSERT INTO signal (system_address, body_id, type, count, signal_name) \
         VALUES ($1,$2,$3,$4,$5) \
         ON CONFLICT (system_address, COALESCE(body_id,-1), type, COALESCE(signal_name,'')) \
         DO UPDATE SET count = COALESCE(EXCLUDED.count, signal.count)",
    )
    .bind::<Int8, _>(input.system_address)
    .bind::<Nullable<Int8>, _>(input.body_id)
    .bind::<Text, _>(input.signal_type.clone())
    .bind::<Int4, _>(input.count)
    .bind::<Nullable<Text>, _>(input.signal_name.clone())
    .execute(conn)
    .map_err(|source| UpsertError::Parent {
        entity: "signal",
        source,
    })?;

    Ok(())
}

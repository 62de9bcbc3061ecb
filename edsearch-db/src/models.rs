//! Insertable/queryable row types for the entity store (§3.2).
//!
//! Parent rows are upserted through hand-written SQL in [`crate::db::upsert`]
//! so that the partial-merge rule (§3.3 invariant 2) can be expressed as a
//! single static `COALESCE(EXCLUDED.col, table.col)` per column. Child rows
//! are plain Diesel `Insertable`/`Queryable` types because child replacement
//! (§3.3 invariant 3) is a straightforward delete-then-insert.

use crate::schema::*;
use diesel::prelude::*;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = system, primary_key(system_address), check_for_backend(diesel::pg::Pg))]
pub struct DbSystem {
    pub system_address: i64,
    pub star_system: Option<String>,
    pub pos_x: Option<f64>,
    pub pos_y: Option<f64>,
    pub pos_z: Option<f64>,
    pub allegiance: Option<String>,
    pub government: Option<String>,
    pub security: Option<String>,
    pub economy: Option<String>,
    pub second_economy: Option<String>,
    pub population: Option<i64>,
    pub powerplay_state: Option<String>,
    pub faction_name: Option<String>,
}

#[derive(Debug, Clone, Insertable, Queryable, Selectable)]
#[diesel(table_name = system_power, check_for_backend(diesel::pg::Pg))]
pub struct NewSystemPower {
    pub system_address: i64,
    pub power_name: String,
}
pub type DbSystemPower = NewSystemPower;

#[derive(Debug, Clone, Insertable, Queryable, Selectable)]
#[diesel(table_name = system_faction, check_for_backend(diesel::pg::Pg))]
pub struct NewSystemFaction {
    pub system_address: i64,
    pub name: String,
    pub influence: Option<f64>,
    pub happiness: Option<String>,
    pub allegiance: Option<String>,
    pub faction_state: Option<String>,
    pub government: Option<String>,
    pub squadron_faction: Option<bool>,
}
pub type DbSystemFaction = NewSystemFaction;

/// `kind` is one of `"active"`, `"pending"`, `"recovering"`, mirroring the
/// three `FactionState` buckets a journal `Faction` entry can report.
#[derive(Debug, Clone, Insertable, Queryable, Selectable)]
#[diesel(table_name = system_faction_state, check_for_backend(diesel::pg::Pg))]
pub struct NewSystemFactionState {
    pub system_address: i64,
    pub faction_name: String,
    pub kind: String,
    pub state: String,
    pub trend: Option<i32>,
}
pub type DbSystemFactionState = NewSystemFactionState;

#[derive(Debug, Clone, Insertable, Queryable, Selectable)]
#[diesel(table_name = system_conflict, check_for_backend(diesel::pg::Pg))]
pub struct NewSystemConflict {
    pub system_address: i64,
    pub faction1_name: String,
    pub faction2_name: String,
    pub status: Option<String>,
    pub war_type: Option<String>,
    pub faction1_stake: Option<String>,
    pub faction1_won_days: Option<i32>,
    pub faction2_stake: Option<String>,
    pub faction2_won_days: Option<i32>,
}
pub type DbSystemConflict = NewSystemConflict;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = body, primary_key(system_address, body_id), check_for_backend(diesel::pg::Pg))]
pub struct DbBody {
    pub system_address: i64,
    pub body_id: i64,
    pub body_name: Option<String>,
    pub body_type: Option<String>,
    pub parent: Option<i64>,
    pub distance_from_arrival_ls: Option<f64>,
    pub star_type: Option<String>,
    pub subclass: Option<i32>,
    pub planet_class: Option<String>,
    pub atmosphere: Option<String>,
    pub volcanism: Option<String>,
    pub mass_em: Option<f64>,
    pub radius: Option<f64>,
    pub surface_gravity: Option<f64>,
    pub surface_temperature: Option<f64>,
    pub surface_pressure: Option<f64>,
    pub landable: Option<bool>,
    pub terraform_state: Option<String>,
    pub tidal_lock: Option<bool>,
    pub composition_ice: Option<f64>,
    pub composition_metal: Option<f64>,
    pub composition_rock: Option<f64>,
    pub semi_major_axis: Option<f64>,
    pub eccentricity: Option<f64>,
    pub orbital_inclination: Option<f64>,
    pub periapsis: Option<f64>,
    pub orbital_period: Option<f64>,
    pub ascending_node: Option<f64>,
    pub mean_anomaly: Option<f64>,
    pub axial_tilt: Option<f64>,
    pub rotation_period: Option<f64>,
}

#[derive(Debug, Clone, Insertable, Queryable, Selectable)]
#[diesel(table_name = body_material, check_for_backend(diesel::pg::Pg))]
pub struct NewBodyMaterial {
    pub system_address: i64,
    pub body_id: i64,
    pub name: String,
    pub percent: f64,
}
pub type DbBodyMaterial = NewBodyMaterial;

#[derive(Debug, Clone, Insertable, Queryable, Selectable)]
#[diesel(table_name = body_atmosphere_composition, check_for_backend(diesel::pg::Pg))]
pub struct NewBodyAtmosphereComposition {
    pub system_address: i64,
    pub body_id: i64,
    pub name: String,
    pub percent: f64,
}
pub type DbBodyAtmosphereComposition = NewBodyAtmosphereComposition;

#[derive(Debug, Clone, Insertable, Queryable, Selectable)]
#[diesel(table_name = body_ring, check_for_backend(diesel::pg::Pg))]
pub struct NewBodyRing {
    pub system_address: i64,
    pub body_id: i64,
    pub name: String,
    pub ring_class: Option<String>,
    pub mass_mt: Option<f64>,
    pub inner_rad: Option<f64>,
    pub outer_rad: Option<f64>,
}
pub type DbBodyRing = NewBodyRing;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = station, primary_key(market_id), check_for_backend(diesel::pg::Pg))]
pub struct DbStation {
    pub market_id: i64,
    pub system_address: Option<i64>,
    pub station_name: Option<String>,
    pub station_type: Option<String>,
    pub body_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub dist_from_star_ls: Option<f64>,
    pub government: Option<String>,
    pub allegiance: Option<String>,
    pub faction_name: Option<String>,
    pub faction_state: Option<String>,
    pub economy: Option<String>,
    pub state: Option<String>,
    pub num_services: Option<i32>,
    pub num_economies: Option<i32>,
    pub landing_pads_large: Option<i32>,
    pub landing_pads_medium: Option<i32>,
    pub landing_pads_small: Option<i32>,
}

#[derive(Debug, Clone, Insertable, Queryable, Selectable)]
#[diesel(table_name = station_economy, check_for_backend(diesel::pg::Pg))]
pub struct NewStationEconomy {
    pub market_id: i64,
    pub name: String,
    pub proportion: f64,
}
pub type DbStationEconomy = NewStationEconomy;

#[derive(Debug, Clone, Insertable, Queryable, Selectable)]
#[diesel(table_name = station_service, check_for_backend(diesel::pg::Pg))]
pub struct NewStationService {
    pub market_id: i64,
    pub name: String,
}
pub type DbStationService = NewStationService;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = landmark, check_for_backend(diesel::pg::Pg))]
pub struct DbLandmark {
    pub id: i64,
    pub entry_id: Option<i64>,
    pub auxiliary_id: Option<String>,
    pub system_address: Option<i64>,
    pub body_id: Option<i64>,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Insertable, Queryable, Selectable)]
#[diesel(table_name = landmark_trait, check_for_backend(diesel::pg::Pg))]
pub struct NewLandmarkTrait {
    pub landmark_id: i64,
    pub trait_name: String,
}
pub type DbLandmarkTrait = NewLandmarkTrait;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = market, primary_key(market_id), check_for_backend(diesel::pg::Pg))]
pub struct DbMarket {
    pub market_id: i64,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Insertable, Queryable, Selectable)]
#[diesel(table_name = market_commodity, check_for_backend(diesel::pg::Pg))]
pub struct NewMarketCommodity {
    pub market_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub stock: i32,
    pub demand: i32,
    pub supply: i32,
    pub buy_price: i32,
    pub sell_price: i32,
}
pub type DbMarketCommodity = NewMarketCommodity;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = shipyard, primary_key(market_id), check_for_backend(diesel::pg::Pg))]
pub struct DbShipyard {
    pub market_id: i64,
    pub timestamp: Option<String>,
    pub num_ships: Option<i32>,
}

#[derive(Debug, Clone, Insertable, Queryable, Selectable)]
#[diesel(table_name = shipyard_ship, check_for_backend(diesel::pg::Pg))]
pub struct NewShipyardShip {
    pub market_id: i64,
    pub name: String,
}
pub type DbShipyardShip = NewShipyardShip;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = outfitting, primary_key(market_id), check_for_backend(diesel::pg::Pg))]
pub struct DbOutfitting {
    pub market_id: i64,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Insertable, Queryable, Selectable)]
#[diesel(table_name = outfitting_module, check_for_backend(diesel::pg::Pg))]
pub struct NewOutfittingModule {
    pub market_id: i64,
    pub name: String,
}
pub type DbOutfittingModule = NewOutfittingModule;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = signal, check_for_backend(diesel::pg::Pg))]
pub struct DbSignal {
    pub id: i64,
    pub system_address: i64,
    pub body_id: Option<i64>,
    pub signal_type: String,
    pub count: i32,
    pub signal_name: Option<String>,
}

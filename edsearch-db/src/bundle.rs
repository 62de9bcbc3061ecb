//! `DatabaseModels`: the normalizer's output bundle (§3.2, §9 "variant
//! result types"). One structure with eight named lists, each entity
//! carrying its own primary key and optional child collections.
//!
//! Every field is `Option` so a normalizer can express "this event did not
//! report this field" (preserved on upsert) versus "this event reports this
//! value" (overwrites on upsert), per the partial-merge invariant (§3.3.2).
//! Child collections are `Option<Vec<_>>` for the same reason: `None` means
//! "no information", `Some(list)` (possibly empty) means "replace with
//! exactly this set" (§3.3.3).

use std::collections::BTreeMap;

use serde_json::Value;

/// A type whose values carry a stable primary key, used to build the
/// canonical lock set (§4.4).
pub trait EntityKey {
    /// The `entityKind` component of the lock-set tuple, e.g. `"system"`.
    const KIND: &'static str;

    /// Primary-key fields, in any order; `primary_key_json` sorts them.
    fn primary_key_fields(&self) -> Vec<(&'static str, Value)>;

    /// `pk-json`: the JSON object of primary-key fields, in key-sorted
    /// order, serialized to a compact string.
    fn primary_key_json(&self) -> String {
        let map: BTreeMap<&'static str, Value> = self.primary_key_fields().into_iter().collect();
        serde_json::to_string(&map).expect("primary key fields always serialize")
    }
}

#[derive(Debug, Default, Clone)]
pub struct DatabaseModels {
    pub systems: Vec<SystemInput>,
    pub bodies: Vec<BodyInput>,
    pub stations: Vec<StationInput>,
    pub landmarks: Vec<LandmarkInput>,
    pub markets: Vec<MarketInput>,
    pub shipyards: Vec<ShipyardInput>,
    pub outfittings: Vec<OutfittingInput>,
    pub signals: Vec<SignalInput>,
}

impl DatabaseModels {
    /// A bundle with no rows across all eight collections causes the
    /// pipeline to count the event as skipped and perform no writes
    /// (§4.3).
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
            && self.bodies.is_empty()
            && self.stations.is_empty()
            && self.landmarks.is_empty()
            && self.markets.is_empty()
            && self.shipyards.is_empty()
            && self.outfittings.is_empty()
            && self.signals.is_empty()
    }
}

#[derive(Debug, Default, Clone)]
pub struct SystemInput {
    pub system_address: i64,
    pub star_system: Option<String>,
    pub pos: Option<(f64, f64, f64)>,
    pub allegiance: Option<String>,
    pub government: Option<String>,
    pub security: Option<String>,
    pub economy: Option<String>,
    pub second_economy: Option<String>,
    pub population: Option<i64>,
    pub powerplay_state: Option<String>,
    pub faction_name: Option<String>,
    pub powers: Option<Vec<String>>,
    pub factions: Option<Vec<FactionInput>>,
    pub conflicts: Option<Vec<ConflictInput>>,
}

impl EntityKey for SystemInput {
    const KIND: &'static str = "system";
    fn primary_key_fields(&self) -> Vec<(&'static str, Value)> {
        vec![("system_address", Value::from(self.system_address))]
    }
}

#[derive(Debug, Clone)]
pub struct FactionInput {
    pub name: String,
    pub influence: Option<f64>,
    pub happiness: Option<String>,
    pub allegiance: Option<String>,
    pub faction_state: Option<String>,
    pub government: Option<String>,
    pub squadron_faction: Option<bool>,
    /// `(state, trend)` triples for each of the active/pending/recovering
    /// buckets, tagged by `kind` when stored.
    pub active_states: Vec<(String, Option<i32>)>,
    pub pending_states: Vec<(String, Option<i32>)>,
    pub recovering_states: Vec<(String, Option<i32>)>,
}

#[derive(Debug, Clone)]
pub struct ConflictInput {
    pub faction1_name: String,
    pub faction2_name: String,
    pub status: Option<String>,
    pub war_type: Option<String>,
    pub faction1_stake: Option<String>,
    pub faction1_won_days: Option<i32>,
    pub faction2_stake: Option<String>,
    pub faction2_won_days: Option<i32>,
}

#[derive(Debug, Default, Clone)]
pub struct BodyInput {
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
    pub materials: Option<Vec<(String, f64)>>,
    pub atmosphere_composition: Option<Vec<(String, f64)>>,
    pub rings: Option<Vec<RingInput>>,
}

impl EntityKey for BodyInput {
    const KIND: &'static str = "body";
    fn primary_key_fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("system_address", Value::from(self.system_address)),
            ("body_id", Value::from(self.body_id)),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct RingInput {
    pub name: String,
    pub ring_class: Option<String>,
    pub mass_mt: Option<f64>,
    pub inner_rad: Option<f64>,
    pub outer_rad: Option<f64>,
}

#[derive(Debug, Default, Clone)]
pub struct StationInput {
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
    pub station_economies: Option<Vec<(String, f64)>>,
    pub station_services: Option<Vec<String>>,
}

impl EntityKey for StationInput {
    const KIND: &'static str = "station";
    fn primary_key_fields(&self) -> Vec<(&'static str, Value)> {
        vec![("market_id", Value::from(self.market_id))]
    }
}

#[derive(Debug, Default, Clone)]
pub struct LandmarkInput {
    pub entry_id: Option<i64>,
    pub auxiliary_id: Option<String>,
    pub system_address: Option<i64>,
    pub body_id: Option<i64>,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub traits: Option<Vec<String>>,
}

impl EntityKey for LandmarkInput {
    const KIND: &'static str = "landmark";
    fn primary_key_fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            (
                "entry_id",
                self.entry_id.map(Value::from).unwrap_or(Value::from(-1)),
            ),
            (
                "auxiliary_id",
                Value::from(self.auxiliary_id.clone().unwrap_or_default()),
            ),
        ]
    }
}

#[derive(Debug, Default, Clone)]
pub struct MarketInput {
    pub market_id: i64,
    pub timestamp: Option<String>,
    pub commodities: Option<Vec<CommodityInput>>,
}

impl EntityKey for MarketInput {
    const KIND: &'static str = "market";
    fn primary_key_fields(&self) -> Vec<(&'static str, Value)> {
        vec![("market_id", Value::from(self.market_id))]
    }
}

#[derive(Debug, Clone)]
pub struct CommodityInput {
    pub name: String,
    pub category: Option<String>,
    pub stock: i32,
    pub demand: i32,
    pub supply: i32,
    pub buy_price: i32,
    pub sell_price: i32,
}

#[derive(Debug, Default, Clone)]
pub struct ShipyardInput {
    pub market_id: i64,
    pub timestamp: Option<String>,
    pub num_ships: Option<i32>,
    pub ships: Option<Vec<String>>,
}

impl EntityKey for ShipyardInput {
    const KIND: &'static str = "shipyard";
    fn primary_key_fields(&self) -> Vec<(&'static str, Value)> {
        vec![("market_id", Value::from(self.market_id))]
    }
}

#[derive(Debug, Default, Clone)]
pub struct OutfittingInput {
    pub market_id: i64,
    pub timestamp: Option<String>,
    pub modules: Option<Vec<String>>,
}

impl EntityKey for OutfittingInput {
    const KIND: &'static str = "outfitting";
    fn primary_key_fields(&self) -> Vec<(&'static str, Value)> {
        vec![("market_id", Value::from(self.market_id))]
    }
}

#[derive(Debug, Clone)]
pub struct SignalInput {
    pub system_address: i64,
    pub body_id: Option<i64>,
    pub signal_type: String,
    pub count: i32,
    pub signal_name: Option<String>,
}

impl EntityKey for SignalInput {
    const KIND: &'static str = "signal";
    fn primary_key_fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("system_address", Value::from(self.system_address)),
            (
                "body_id",
                self.body_id.map(Value::from).unwrap_or(Value::from(-1)),
            ),
            ("type", Value::from(self.signal_type.clone())),
            (
                "signal_name",
                Value::from(self.signal_name.clone().unwrap_or_default()),
            ),
        ]
    }
}

/// Build the canonical lock set (§4.4): one `(entityKind, pk-json)` pair per
/// distinct entity touched anywhere in the bundle, deduplicated and sorted
/// lexicographically. All workers must acquire sentinels in this order.
pub fn canonical_lock_set(bundle: &DatabaseModels) -> Vec<(&'static str, String)> {
    let mut keys: Vec<(&'static str, String)> = Vec::new();

    for s in &bundle.systems {
        keys.push((SystemInput::KIND, s.primary_key_json()));
    }
    for b in &bundle.bodies {
        keys.push((BodyInput::KIND, b.primary_key_json()));
    }
    for st in &bundle.stations {
        keys.push((StationInput::KIND, st.primary_key_json()));
    }
    for l in &bundle.landmarks {
        keys.push((LandmarkInput::KIND, l.primary_key_json()));
    }
    for m in &bundle.markets {
        keys.push((MarketInput::KIND, m.primary_key_json()));
    }
    for sy in &bundle.shipyards {
        keys.push((ShipyardInput::KIND, sy.primary_key_json()));
    }
    for o in &bundle.outfittings {
        keys.push((OutfittingInput::KIND, o.primary_key_json()));
    }
    for sig in &bundle.signals {
        keys.push((SignalInput::KIND, sig.primary_key_json()));
    }

    keys.sort();
    keys.dedup();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landmark_pk_json_uses_coalesced_defaults() {
        let landmark = LandmarkInput {
            entry_id: None,
            auxiliary_id: Some("123-45-Hutton".to_string()),
            ..Default::default()
        };

        assert_eq!(
            landmark.primary_key_json(),
            r#"{"auxiliary_id":"123-45-Hutton","entry_id":-1}"#
        );
    }

    #[test]
    fn bundle_is_empty_when_all_collections_are_empty() {
        assert!(DatabaseModels::default().is_empty());
    }
}

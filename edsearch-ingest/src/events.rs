//! Strict per-event-kind shapes (§3.1, §4.1), one struct per journal event
//! carried by the archive. These are decoded from the envelope's `message`
//! value only after the dataset's event tag is known, so unknown/garbage
//! extra fields on the wire never fail the decode (`#[serde(default)]` on
//! every optional field, no `deny_unknown_fields`).

use serde::Deserialize;

fn default_independent() -> String {
    "Independent".to_string()
}

fn default_none_string() -> String {
    "None".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct FactionState {
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FactionActiveState {
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct FactionPendingState {
    pub state: String,
    pub trend: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct FactionRecoveringState {
    pub state: String,
    pub trend: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct Faction {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "FactionState")]
    pub faction_state: Option<String>,
    #[serde(rename = "Government")]
    pub government: Option<String>,
    #[serde(rename = "Influence")]
    pub influence: Option<f64>,
    #[serde(rename = "Allegiance")]
    pub allegiance: Option<String>,
    #[serde(rename = "Happiness")]
    pub happiness: Option<String>,
    #[serde(rename = "SquadronFaction")]
    pub squadron_faction: Option<bool>,
    #[serde(rename = "ActiveStates", default)]
    pub active_states: Vec<FactionActiveState>,
    #[serde(rename = "PendingStates", default)]
    pub pending_states: Vec<FactionPendingState>,
    #[serde(rename = "RecoveringStates", default)]
    pub recovering_states: Vec<FactionRecoveringState>,
}

#[derive(Debug, Deserialize)]
pub struct ConflictFaction {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Stake")]
    pub stake: Option<String>,
    #[serde(rename = "WonDays")]
    pub won_days: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct Conflict {
    #[serde(rename = "WarType")]
    pub war_type: Option<String>,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "Faction1")]
    pub faction1: ConflictFaction,
    #[serde(rename = "Faction2")]
    pub faction2: ConflictFaction,
}

#[derive(Debug, Deserialize)]
pub struct SystemFaction {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "FactionState")]
    pub faction_state: Option<String>,
}

/// FSDJump and CarrierJump both decode into this shape (§4.3): CarrierJump's
/// wire payload is a strict subset, every field beyond SystemAddress/Body
/// fields simply absent and defaulted to `None`/empty.
#[derive(Debug, Deserialize)]
pub struct FsdJump {
    #[serde(rename = "SystemAddress")]
    pub system_address: i64,
    #[serde(rename = "StarSystem")]
    pub star_system: Option<String>,
    #[serde(rename = "StarPos")]
    pub star_pos: Option<[f64; 3]>,
    #[serde(rename = "SystemAllegiance")]
    pub system_allegiance: Option<String>,
    #[serde(rename = "SystemGovernment")]
    pub system_government: Option<String>,
    #[serde(rename = "SystemSecurity")]
    pub system_security: Option<String>,
    #[serde(rename = "SystemEconomy")]
    pub system_economy: Option<String>,
    #[serde(rename = "SystemSecondEconomy")]
    pub system_second_economy: Option<String>,
    #[serde(rename = "Population")]
    pub population: Option<i64>,
    #[serde(rename = "PowerplayState")]
    pub powerplay_state: Option<String>,
    #[serde(rename = "SystemFaction")]
    pub system_faction: Option<SystemFaction>,
    #[serde(rename = "Powers", default)]
    pub powers: Option<Vec<String>>,
    #[serde(rename = "Factions", default)]
    pub factions: Option<Vec<Faction>>,
    #[serde(rename = "Conflicts", default)]
    pub conflicts: Option<Vec<Conflict>>,
    #[serde(rename = "BodyID")]
    pub body_id: Option<i64>,
    #[serde(rename = "Body")]
    pub body: Option<String>,
    #[serde(rename = "BodyType")]
    pub body_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScanParent {
    #[serde(rename = "Star")]
    pub star: Option<i64>,
    #[serde(rename = "Planet")]
    pub planet: Option<i64>,
    #[serde(rename = "Ring")]
    pub ring: Option<i64>,
    #[serde(rename = "Null")]
    pub null: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ScanMaterial {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Percent")]
    pub percent: f64,
}

#[derive(Debug, Deserialize)]
pub struct AtmosphereComposition {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Percent")]
    pub percent: f64,
}

#[derive(Debug, Deserialize)]
pub struct ScanComposition {
    #[serde(rename = "Ice")]
    pub ice: Option<f64>,
    #[serde(rename = "Metal")]
    pub metal: Option<f64>,
    #[serde(rename = "Rock")]
    pub rock: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ScanRing {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "RingClass")]
    pub ring_class: Option<String>,
    #[serde(rename = "MassMT")]
    pub mass_mt: Option<f64>,
    #[serde(rename = "InnerRad")]
    pub inner_rad: Option<f64>,
    #[serde(rename = "OuterRad")]
    pub outer_rad: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct Scan {
    #[serde(rename = "ScanType")]
    pub scan_type: String,
    #[serde(rename = "SystemAddress")]
    pub system_address: i64,
    #[serde(rename = "StarSystem")]
    pub star_system: Option<String>,
    #[serde(rename = "BodyID")]
    pub body_id: i64,
    #[serde(rename = "BodyName")]
    pub body_name: Option<String>,
    #[serde(rename = "DistanceFromArrivalLS")]
    pub distance_from_arrival_ls: Option<f64>,
    #[serde(rename = "Parents")]
    pub parents: Option<Vec<ScanParent>>,
    #[serde(rename = "TidalLock")]
    pub tidal_lock: Option<bool>,
    #[serde(rename = "RotationPeriod")]
    pub rotation_period: Option<f64>,
    #[serde(rename = "AxialTilt")]
    pub axial_tilt: Option<f64>,
    #[serde(rename = "Radius")]
    pub radius: Option<f64>,
    #[serde(rename = "MassEM")]
    pub mass_em: Option<f64>,
    #[serde(rename = "StarType")]
    pub star_type: Option<String>,
    #[serde(rename = "Subclass")]
    pub subclass: Option<i32>,
    #[serde(rename = "PlanetClass")]
    pub planet_class: Option<String>,
    #[serde(rename = "Atmosphere")]
    pub atmosphere: Option<String>,
    #[serde(rename = "Volcanism")]
    pub volcanism: Option<String>,
    #[serde(rename = "SurfaceGravity")]
    pub surface_gravity: Option<f64>,
    #[serde(rename = "SurfaceTemperature")]
    pub surface_temperature: Option<f64>,
    #[serde(rename = "SurfacePressure")]
    pub surface_pressure: Option<f64>,
    #[serde(rename = "Landable")]
    pub landable: Option<bool>,
    #[serde(rename = "TerraformState")]
    pub terraform_state: Option<String>,
    #[serde(rename = "Composition")]
    pub composition: Option<ScanComposition>,
    #[serde(rename = "SemiMajorAxis")]
    pub semi_major_axis: Option<f64>,
    #[serde(rename = "Eccentricity")]
    pub eccentricity: Option<f64>,
    #[serde(rename = "OrbitalInclination")]
    pub orbital_inclination: Option<f64>,
    #[serde(rename = "Periapsis")]
    pub periapsis: Option<f64>,
    #[serde(rename = "OrbitalPeriod")]
    pub orbital_period: Option<f64>,
    #[serde(rename = "AscendingNode")]
    pub ascending_node: Option<f64>,
    #[serde(rename = "MeanAnomaly")]
    pub mean_anomaly: Option<f64>,
    #[serde(rename = "Materials", default)]
    pub materials: Option<Vec<ScanMaterial>>,
    #[serde(rename = "AtmosphereComposition", default)]
    pub atmosphere_composition: Option<Vec<AtmosphereComposition>>,
    #[serde(rename = "Rings", default)]
    pub rings: Option<Vec<ScanRing>>,
}

#[derive(Debug, Deserialize)]
pub struct ScanBaryCentre {
    #[serde(rename = "SystemAddress")]
    pub system_address: i64,
    #[serde(rename = "StarSystem")]
    pub star_system: String,
    #[serde(rename = "BodyID")]
    pub body_id: i64,
    #[serde(rename = "SemiMajorAxis")]
    pub semi_major_axis: f64,
    #[serde(rename = "Eccentricity")]
    pub eccentricity: f64,
    #[serde(rename = "OrbitalInclination")]
    pub orbital_inclination: f64,
    #[serde(rename = "Periapsis")]
    pub periapsis: f64,
    #[serde(rename = "OrbitalPeriod")]
    pub orbital_period: f64,
    #[serde(rename = "AscendingNode")]
    pub ascending_node: f64,
    #[serde(rename = "MeanAnomaly")]
    pub mean_anomaly: f64,
}

#[derive(Debug, Deserialize)]
pub struct StationEconomy {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Proportion")]
    pub proportion: f64,
}

#[derive(Debug, Deserialize)]
pub struct StationFaction {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "FactionState", default = "default_none_string")]
    pub faction_state: String,
}

#[derive(Debug, Deserialize)]
pub struct LandingPads {
    #[serde(rename = "Small")]
    pub small: Option<i32>,
    #[serde(rename = "Medium")]
    pub medium: Option<i32>,
    #[serde(rename = "Large")]
    pub large: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct Docked {
    #[serde(rename = "SystemAddress")]
    pub system_address: i64,
    #[serde(rename = "MarketID")]
    pub market_id: i64,
    #[serde(rename = "StationName")]
    pub station_name: Option<String>,
    #[serde(rename = "StationType")]
    pub station_type: Option<String>,
    #[serde(rename = "DistFromStarLS")]
    pub dist_from_star_ls: Option<f64>,
    #[serde(rename = "StationGovernment")]
    pub station_government: Option<String>,
    #[serde(rename = "StationAllegiance", default = "default_independent")]
    pub station_allegiance: String,
    #[serde(rename = "StationEconomies", default)]
    pub station_economies: Vec<StationEconomy>,
    #[serde(rename = "StationFaction")]
    pub station_faction: Option<StationFaction>,
    #[serde(rename = "StationServices", default)]
    pub station_services: Vec<String>,
    #[serde(rename = "StationState", default = "default_none_string")]
    pub station_state: String,
    #[serde(rename = "LandingPads")]
    pub landing_pads: Option<LandingPads>,
}

#[derive(Debug, Deserialize)]
pub struct ApproachSettlement {
    #[serde(rename = "SystemAddress")]
    pub system_address: i64,
    #[serde(rename = "MarketID")]
    pub market_id: Option<i64>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "BodyID")]
    pub body_id: i64,
    #[serde(rename = "BodyName")]
    pub body_name: Option<String>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(rename = "StationGovernment", default = "default_none_string")]
    pub station_government: String,
    #[serde(rename = "StationAllegiance", default = "default_independent")]
    pub station_allegiance: String,
    #[serde(rename = "StationEconomies", default)]
    pub station_economies: Vec<StationEconomy>,
    #[serde(rename = "StationFaction", default)]
    pub station_faction: FactionState,
    #[serde(rename = "StationServices", default)]
    pub station_services: Vec<String>,
}

/// CarrierJump carries none of FSDJump's system or body detail fields on the
/// wire (§4.3 groups it with FSDJump regardless); only these are present.
#[derive(Debug, Deserialize)]
pub struct CarrierJump {
    #[serde(rename = "SystemAddress")]
    pub system_address: i64,
    #[serde(rename = "StarSystem")]
    pub star_system: Option<String>,
    #[serde(rename = "StarPos")]
    pub star_pos: Option<[f64; 3]>,
    #[serde(rename = "BodyID")]
    pub body_id: Option<i64>,
    #[serde(rename = "Body")]
    pub body: Option<String>,
    #[serde(rename = "BodyType")]
    pub body_type: Option<String>,
    #[serde(rename = "MarketID")]
    pub market_id: Option<i64>,
    #[serde(rename = "StationName")]
    pub station_name: Option<String>,
    #[serde(rename = "StationType")]
    pub station_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MarketCommodity {
    pub name: String,
    pub category: Option<String>,
    pub stock: i32,
    pub demand: i32,
    pub supply: i32,
    #[serde(rename = "buyPrice")]
    pub buy_price: i32,
    #[serde(rename = "sellPrice")]
    pub sell_price: i32,
}

#[derive(Debug, Deserialize)]
pub struct Market {
    #[serde(rename = "marketId")]
    pub market_id: i64,
    #[serde(default)]
    pub commodities: Vec<MarketCommodity>,
}

#[derive(Debug, Deserialize)]
pub struct Outfitting {
    #[serde(rename = "marketId")]
    pub market_id: i64,
    #[serde(default)]
    pub modules: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Shipyard {
    #[serde(rename = "marketId")]
    pub market_id: i64,
    #[serde(default)]
    pub ships: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaaSignal {
    #[serde(rename = "Type")]
    pub signal_type: String,
    #[serde(rename = "Count")]
    pub count: i32,
}

#[derive(Debug, Deserialize)]
pub struct SaaGenus {
    #[serde(rename = "Genus")]
    pub genus: String,
}

#[derive(Debug, Deserialize)]
pub struct SaaSignalsFound {
    #[serde(rename = "SystemAddress")]
    pub system_address: i64,
    #[serde(rename = "BodyID")]
    pub body_id: i64,
    #[serde(rename = "BodyName")]
    pub body_name: Option<String>,
    #[serde(rename = "Signals", default)]
    pub signals: Vec<SaaSignal>,
    #[serde(rename = "Genuses", default)]
    pub genuses: Vec<SaaGenus>,
}

#[derive(Debug, Deserialize)]
pub struct FssSignal {
    #[serde(rename = "SystemAddress")]
    pub system_address: Option<i64>,
    #[serde(rename = "SignalName")]
    pub signal_name: String,
    #[serde(rename = "SignalType")]
    pub signal_type: Option<String>,
    #[serde(rename = "IsStation", default)]
    pub is_station: bool,
}

/// The wrapper's list field is lowercase `signals` in the original, unlike
/// every other per-entry `Signals` field in this file.
#[derive(Debug, Deserialize)]
pub struct FssSignalDiscovered {
    #[serde(rename = "SystemAddress")]
    pub system_address: i64,
    #[serde(default)]
    pub signals: Vec<FssSignal>,
}

#[derive(Debug, Deserialize)]
pub struct FssBodySignal {
    #[serde(rename = "Type")]
    pub signal_type: String,
    #[serde(rename = "Count")]
    pub count: i32,
}

#[derive(Debug, Deserialize)]
pub struct FssBodySignals {
    #[serde(rename = "SystemAddress")]
    pub system_address: i64,
    #[serde(rename = "BodyID")]
    pub body_id: i64,
    #[serde(rename = "BodyName")]
    pub body_name: Option<String>,
    #[serde(rename = "Signals", default)]
    pub signals: Vec<FssBodySignal>,
}

//! The Normalizer (C3, §4.3): one function per dataset, each turning a
//! strictly-decoded event plus the envelope's timestamp into a
//! [`DatabaseModels`] bundle. A normalizer never fails on a semantically
//! empty input — an event that names no entities returns
//! `DatabaseModels::default()`, which the pipeline counts as skipped.

use edsearch_db::bundle::{
    BodyInput, CommodityInput, ConflictInput, DatabaseModels, FactionInput, LandmarkInput,
    MarketInput, OutfittingInput, RingInput, ShipyardInput, SignalInput, StationInput, SystemInput,
};

use crate::events::{
    ApproachSettlement, CarrierJump, Docked, FsdJump, FssBodySignals, FssSignalDiscovered, Market,
    Outfitting, SaaSignalsFound, Scan, ScanBaryCentre, Shipyard,
};

fn faction_input(f: &crate::events::Faction) -> FactionInput {
    FactionInput {
        name: f.name.clone(),
        influence: f.influence,
        happiness: f.happiness.clone(),
        allegiance: f.allegiance.clone(),
        faction_state: f.faction_state.clone(),
        government: f.government.clone(),
        squadron_faction: f.squadron_faction,
        active_states: f
            .active_states
            .iter()
            .map(|s| (s.state.clone(), None))
            .collect(),
        pending_states: f
            .pending_states
            .iter()
            .map(|s| (s.state.clone(), s.trend))
            .collect(),
        recovering_states: f
            .recovering_states
            .iter()
            .map(|s| (s.state.clone(), s.trend))
            .collect(),
    }
}

fn conflict_input(c: &crate::events::Conflict) -> ConflictInput {
    ConflictInput {
        faction1_name: c.faction1.name.clone(),
        faction2_name: c.faction2.name.clone(),
        status: c.status.clone(),
        war_type: c.war_type.clone(),
        faction1_stake: c.faction1.stake.clone(),
        faction1_won_days: c.faction1.won_days,
        faction2_stake: c.faction2.stake.clone(),
        faction2_won_days: c.faction2.won_days,
    }
}

/// FSDJump: one System (full detail) plus one minimal Body for the arrival
/// star/body, with Faction/Conflict children and the power list attached to
/// the System (§4.3).
pub fn normalize_fsd_jump(event: &FsdJump) -> DatabaseModels {
    let mut bundle = DatabaseModels::default();

    bundle.systems.push(SystemInput {
        system_address: event.system_address,
        star_system: event.star_system.clone(),
        pos: event.star_pos.map(|p| (p[0], p[1], p[2])),
        allegiance: event.system_allegiance.clone(),
        government: event.system_government.clone(),
        security: event.system_security.clone(),
        economy: event.system_economy.clone(),
        second_economy: event.system_second_economy.clone(),
        population: event.population,
        powerplay_state: event.powerplay_state.clone(),
        faction_name: event.system_faction.as_ref().map(|f| f.name.clone()),
        powers: event.powers.clone(),
        factions: event
            .factions
            .as_ref()
            .map(|fs| fs.iter().map(faction_input).collect()),
        conflicts: event
            .conflicts
            .as_ref()
            .map(|cs| cs.iter().map(conflict_input).collect()),
    });

    if let Some(body_id) = event.body_id {
        bundle.bodies.push(BodyInput {
            system_address: event.system_address,
            body_id,
            body_name: event.body.clone(),
            body_type: event.body_type.clone(),
            ..Default::default()
        });
    }

    bundle
}

/// CarrierJump is normalized identically to FSDJump (§4.3) even though its
/// wire payload carries almost none of FSDJump's detail fields; the System
/// row it produces is mostly null beyond the primary key, consistent with
/// every scalar field meaning "unknown" rather than "empty" (§3.3.1).
pub fn normalize_carrier_jump(event: &CarrierJump) -> DatabaseModels {
    let mut bundle = DatabaseModels::default();

    bundle.systems.push(SystemInput {
        system_address: event.system_address,
        star_system: event.star_system.clone(),
        pos: event.star_pos.map(|p| (p[0], p[1], p[2])),
        ..Default::default()
    });

    if let Some(body_id) = event.body_id {
        bundle.bodies.push(BodyInput {
            system_address: event.system_address,
            body_id,
            body_name: event.body.clone(),
            body_type: event.body_type.clone(),
            ..Default::default()
        });
    }

    if let Some(market_id) = event.market_id {
        bundle.stations.push(StationInput {
            market_id,
            system_address: Some(event.system_address),
            station_name: event.station_name.clone(),
            station_type: event.station_type.clone(),
            ..Default::default()
        });
    }

    bundle
}

/// Derive `BodyType` the way the original ingest does: `Star` if `StarType`
/// is present, else `Planet` if `PlanetClass` is present, else `Unknown`.
fn scan_body_type(event: &Scan) -> String {
    if event.star_type.is_some() {
        "Star".to_string()
    } else if event.planet_class.is_some() {
        "Planet".to_string()
    } else {
        "Unknown".to_string()
    }
}

/// Derive `Parent` the way the original ingest does: `None` when `Parents`
/// is entirely absent, `-1` when `Parents` is present but empty, otherwise
/// the first non-null field (Star, then Planet, then Ring, then Null) of
/// the first entry.
fn scan_parent(event: &Scan) -> Option<i64> {
    let parents = event.parents.as_ref()?;
    let Some(first) = parents.first() else {
        return Some(-1);
    };
    first
        .star
        .or(first.planet)
        .or(first.ring)
        .or(first.null)
}

/// Scan: one Body keyed by `(SystemAddress, BodyID)`, with Materials,
/// AtmosphereComposition and Rings as child collections (§4.3).
pub fn normalize_scan(event: &Scan) -> DatabaseModels {
    let mut bundle = DatabaseModels::default();

    bundle.bodies.push(BodyInput {
        system_address: event.system_address,
        body_id: event.body_id,
        body_name: event.body_name.clone(),
        body_type: Some(scan_body_type(event)),
        parent: scan_parent(event),
        distance_from_arrival_ls: event.distance_from_arrival_ls,
        star_type: event.star_type.clone(),
        subclass: event.subclass,
        planet_class: event.planet_class.clone(),
        atmosphere: event.atmosphere.clone(),
        volcanism: event.volcanism.clone(),
        mass_em: event.mass_em,
        radius: event.radius,
        surface_gravity: event.surface_gravity,
        surface_temperature: event.surface_temperature,
        surface_pressure: event.surface_pressure,
        landable: event.landable,
        terraform_state: event.terraform_state.clone(),
        tidal_lock: event.tidal_lock,
        composition_ice: event.composition.as_ref().and_then(|c| c.ice),
        composition_metal: event.composition.as_ref().and_then(|c| c.metal),
        composition_rock: event.composition.as_ref().and_then(|c| c.rock),
        semi_major_axis: event.semi_major_axis,
        eccentricity: event.eccentricity,
        orbital_inclination: event.orbital_inclination,
        periapsis: event.periapsis,
        orbital_period: event.orbital_period,
        ascending_node: event.ascending_node,
        mean_anomaly: event.mean_anomaly,
        axial_tilt: event.axial_tilt,
        rotation_period: event.rotation_period,
        materials: event
            .materials
            .as_ref()
            .map(|ms| ms.iter().map(|m| (m.name.clone(), m.percent)).collect()),
        atmosphere_composition: event
            .atmosphere_composition
            .as_ref()
            .map(|cs| cs.iter().map(|c| (c.name.clone(), c.percent)).collect()),
        rings: event.rings.as_ref().map(|rs| {
            rs.iter()
                .map(|r| RingInput {
                    name: r.name.clone(),
                    ring_class: r.ring_class.clone(),
                    mass_mt: r.mass_mt,
                    inner_rad: r.inner_rad,
                    outer_rad: r.outer_rad,
                })
                .collect()
        }),
    });

    bundle
}

/// ScanBaryCentre: a minimal Body entry carrying only the orbital elements a
/// barycentre reports, with a synthesized name (§4.3).
pub fn normalize_scan_bary_centre(event: &ScanBaryCentre) -> DatabaseModels {
    let mut bundle = DatabaseModels::default();

    bundle.bodies.push(BodyInput {
        system_address: event.system_address,
        body_id: event.body_id,
        body_name: Some(format!("{} Barycentre", event.star_system)),
        body_type: Some("Barycentre".to_string()),
        semi_major_axis: Some(event.semi_major_axis),
        eccentricity: Some(event.eccentricity),
        orbital_inclination: Some(event.orbital_inclination),
        periapsis: Some(event.periapsis),
        orbital_period: Some(event.orbital_period),
        ascending_node: Some(event.ascending_node),
        mean_anomaly: Some(event.mean_anomaly),
        ..Default::default()
    });

    bundle
}

/// Docked: one Station keyed by `MarketID`, with StationEconomies and
/// StationServices as child collections (§4.3).
pub fn normalize_docked(event: &Docked) -> DatabaseModels {
    let mut bundle = DatabaseModels::default();

    bundle.stations.push(StationInput {
        market_id: event.market_id,
        system_address: Some(event.system_address),
        station_name: event.station_name.clone(),
        station_type: event.station_type.clone(),
        dist_from_star_ls: event.dist_from_star_ls,
        government: event.station_government.clone(),
        allegiance: Some(event.station_allegiance.clone()),
        faction_name: event.station_faction.as_ref().map(|f| f.name.clone()),
        faction_state: event
            .station_faction
            .as_ref()
            .map(|f| f.faction_state.clone()),
        state: Some(event.station_state.clone()),
        landing_pads_large: event.landing_pads.as_ref().and_then(|p| p.large),
        landing_pads_medium: event.landing_pads.as_ref().and_then(|p| p.medium),
        landing_pads_small: event.landing_pads.as_ref().and_then(|p| p.small),
        station_economies: Some(
            event
                .station_economies
                .iter()
                .map(|e| (e.name.clone(), e.proportion))
                .collect(),
        ),
        station_services: Some(event.station_services.clone()),
        ..Default::default()
    });

    bundle
}

/// ApproachSettlement: when `MarketID` is present it normalizes into a
/// Station row with `StationType = "Settlement"` (settlements are
/// dockable); when absent (the station primary key is not nullable), it
/// normalizes into a Landmark instead, with `EntryID = null` and
/// `AuxiliaryID = "<SystemAddress>-<BodyID>-<Name>"` (§4.3).
pub fn normalize_approach_settlement(event: &ApproachSettlement) -> DatabaseModels {
    let mut bundle = DatabaseModels::default();

    match event.market_id {
        Some(market_id) => {
            bundle.stations.push(StationInput {
                market_id,
                system_address: Some(event.system_address),
                station_name: Some(event.name.clone()),
                station_type: Some("Settlement".to_string()),
                body_id: Some(event.body_id),
                latitude: event.latitude,
                longitude: event.longitude,
                government: Some(event.station_government.clone()),
                allegiance: Some(event.station_allegiance.clone()),
                faction_state: event.station_faction.state.clone(),
                station_economies: Some(
                    event
                        .station_economies
                        .iter()
                        .map(|e| (e.name.clone(), e.proportion))
                        .collect(),
                ),
                station_services: Some(event.station_services.clone()),
                ..Default::default()
            });
        }
        None => {
            bundle.landmarks.push(LandmarkInput {
                entry_id: None,
                auxiliary_id: Some(format!(
                    "{}-{}-{}",
                    event.system_address, event.body_id, event.name
                )),
                system_address: Some(event.system_address),
                body_id: Some(event.body_id),
                name: Some(event.name.clone()),
                latitude: event.latitude,
                longitude: event.longitude,
                traits: None,
            });
        }
    }

    bundle
}

/// Market: one Market row keyed by `marketId`, with Commodities replaced in
/// full (§4.3). The envelope's message timestamp is carried along so the
/// freshness gate can compare it against prior market snapshots.
pub fn normalize_market(event: &Market, timestamp: &str) -> DatabaseModels {
    let mut bundle = DatabaseModels::default();

    bundle.markets.push(MarketInput {
        market_id: event.market_id,
        timestamp: Some(timestamp.to_string()),
        commodities: Some(
            event
                .commodities
                .iter()
                .map(|c| CommodityInput {
                    name: c.name.clone(),
                    category: c.category.clone(),
                    stock: c.stock,
                    demand: c.demand,
                    supply: c.supply,
                    buy_price: c.buy_price,
                    sell_price: c.sell_price,
                })
                .collect(),
        ),
    });

    bundle
}

/// Outfitting: one Outfitting row keyed by `marketId`, with the module list
/// replaced in full (§4.3).
pub fn normalize_outfitting(event: &Outfitting, timestamp: &str) -> DatabaseModels {
    let mut bundle = DatabaseModels::default();

    bundle.outfittings.push(OutfittingInput {
        market_id: event.market_id,
        timestamp: Some(timestamp.to_string()),
        modules: Some(event.modules.clone()),
    });

    bundle
}

/// The CAPI shipyard feed tag that gates a Shipyard event (§4.3). Anything
/// else (including a missing `gameversion`) produces an empty bundle.
const CAPI_LIVE_SHIPYARD: &str = "CAPI-Live-shipyard";

/// Shipyard: one Shipyard row keyed by `marketId`, with the ship list
/// replaced in full — unless the envelope's `gameversion` isn't the CAPI
/// shipyard feed tag, in which case the event is semantically empty (§4.3).
pub fn normalize_shipyard(event: &Shipyard, timestamp: &str, gameversion: Option<&str>) -> DatabaseModels {
    if gameversion != Some(CAPI_LIVE_SHIPYARD) {
        return DatabaseModels::default();
    }

    let mut bundle = DatabaseModels::default();

    bundle.shipyards.push(ShipyardInput {
        market_id: event.market_id,
        timestamp: Some(timestamp.to_string()),
        num_ships: Some(event.ships.len() as i32),
        ships: Some(event.ships.clone()),
    });

    bundle
}

/// SAASignalsFound: one Signal per reported `Signals[]` entry, plus one
/// additional Signal per `Genuses[]` entry with `Type = Genus`, `Count = 1`
/// (§4.3).
pub fn normalize_saa_signals_found(event: &SaaSignalsFound) -> DatabaseModels {
    let mut bundle = DatabaseModels::default();

    for signal in &event.signals {
        bundle.signals.push(SignalInput {
            system_address: event.system_address,
            body_id: Some(event.body_id),
            signal_type: signal.signal_type.clone(),
            count: signal.count,
            signal_name: None,
        });
    }

    for genus in &event.genuses {
        bundle.signals.push(SignalInput {
            system_address: event.system_address,
            body_id: Some(event.body_id),
            signal_type: genus.genus.clone(),
            count: 1,
            signal_name: None,
        });
    }

    bundle
}

/// FSSSignalDiscovered: one Signal per entry, skipping entries with no
/// `SignalType` or with `SignalType = "FleetCarrier"`; `SystemAddress`
/// falls back from the envelope when absent on the signal; `Count = 1`
/// (§4.3).
pub fn normalize_fss_signal_discovered(event: &FssSignalDiscovered) -> DatabaseModels {
    let mut bundle = DatabaseModels::default();

    for signal in &event.signals {
        let Some(signal_type) = signal.signal_type.as_deref() else {
            continue;
        };
        if signal_type == "FleetCarrier" {
            continue;
        }

        bundle.signals.push(SignalInput {
            system_address: signal.system_address.unwrap_or(event.system_address),
            body_id: None,
            signal_type: signal_type.to_string(),
            count: 1,
            signal_name: Some(signal.signal_name.clone()),
        });
    }

    bundle
}

/// FSSBodySignals: one Signal per entry, keyed by body (§4.3).
pub fn normalize_fss_body_signals(event: &FssBodySignals) -> DatabaseModels {
    let mut bundle = DatabaseModels::default();

    for signal in &event.signals {
        bundle.signals.push(SignalInput {
            system_address: event.system_address,
            body_id: Some(event.body_id),
            signal_type: signal.signal_type.clone(),
            count: signal.count,
            signal_name: None,
        });
    }

    bundle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ScanParent;

    #[test]
    fn scan_parent_absent_is_none() {
        let event_json = serde_json::json!({
            "ScanType": "Detailed",
            "SystemAddress": 1i64,
            "BodyID": 2i64,
        });
        let event: Scan = serde_json::from_value(event_json).unwrap();
        assert_eq!(scan_parent(&event), None);
    }

    #[test]
    fn scan_parent_empty_list_is_minus_one() {
        let mut event_json = serde_json::json!({
            "ScanType": "Detailed",
            "SystemAddress": 1i64,
            "BodyID": 2i64,
        });
        event_json["Parents"] = serde_json::json!([]);
        let event: Scan = serde_json::from_value(event_json).unwrap();
        assert_eq!(scan_parent(&event), Some(-1));
    }

    #[test]
    fn scan_parent_first_non_null_field_wins() {
        let event_json = serde_json::json!({
            "ScanType": "Detailed",
            "SystemAddress": 1i64,
            "BodyID": 2i64,
            "Parents": [{"Planet": 3}],
        });
        let event: Scan = serde_json::from_value(event_json).unwrap();
        assert_eq!(scan_parent(&event), Some(3));
        let _ = ScanParent {
            star: None,
            planet: None,
            ring: None,
            null: None,
        };
    }

    #[test]
    fn scan_body_type_prefers_star_type() {
        let event_json = serde_json::json!({
            "ScanType": "Detailed",
            "SystemAddress": 1i64,
            "BodyID": 2i64,
            "StarType": "K",
            "PlanetClass": "Icy body",
        });
        let event: Scan = serde_json::from_value(event_json).unwrap();
        assert_eq!(scan_body_type(&event), "Star");
    }

    #[test]
    fn approach_settlement_without_market_id_becomes_landmark() {
        let event = ApproachSettlement {
            system_address: 1,
            market_id: None,
            name: "Hutton Orbital".to_string(),
            body_id: 2,
            body_name: None,
            latitude: Some(10.0),
            longitude: Some(20.0),
            station_government: "None".to_string(),
            station_allegiance: "Independent".to_string(),
            station_economies: Vec::new(),
            station_faction: crate::events::FactionState::default(),
            station_services: Vec::new(),
        };

        let bundle = normalize_approach_settlement(&event);
        assert!(bundle.stations.is_empty());
        assert_eq!(bundle.landmarks.len(), 1);
        assert_eq!(
            bundle.landmarks[0].auxiliary_id.as_deref(),
            Some("1-2-Hutton Orbital")
        );
    }

    #[test]
    fn shipyard_wrong_gameversion_is_empty() {
        let event = Shipyard {
            market_id: 1,
            ships: vec!["Sidewinder".to_string()],
        };
        assert!(normalize_shipyard(&event, "2026-01-01T00:00:00Z", Some("journal")).is_empty());
        assert!(
            !normalize_shipyard(&event, "2026-01-01T00:00:00Z", Some(CAPI_LIVE_SHIPYARD))
                .is_empty()
        );
    }

    #[test]
    fn fss_signal_discovered_skips_fleet_carriers_and_untyped() {
        let event = FssSignalDiscovered {
            system_address: 1,
            signals: vec![
                crate::events::FssSignal {
                    system_address: None,
                    signal_name: "$USS".to_string(),
                    signal_type: Some("FleetCarrier".to_string()),
                    is_station: false,
                },
                crate::events::FssSignal {
                    system_address: None,
                    signal_name: "Untyped".to_string(),
                    signal_type: None,
                    is_station: false,
                },
                crate::events::FssSignal {
                    system_address: None,
                    signal_name: "$Resource_Extraction".to_string(),
                    signal_type: Some("USS".to_string()),
                    is_station: false,
                },
            ],
        };

        let bundle = normalize_fss_signal_discovered(&event);
        assert_eq!(bundle.signals.len(), 1);
        assert_eq!(
            bundle.signals[0].signal_name.as_deref(),
            Some("$Resource_Extraction")
        );
    }
}

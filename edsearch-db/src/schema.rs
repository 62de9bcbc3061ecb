//! Diesel table declarations for the entity store (§3.2) and the
//! freshness gate's persistent sentinel table (§4.4).

diesel::table! {
    system (system_address) {
        system_address -> Int8,
        star_system -> Nullable<Text>,
        pos_x -> Nullable<Float8>,
        pos_y -> Nullable<Float8>,
        pos_z -> Nullable<Float8>,
        allegiance -> Nullable<Text>,
        government -> Nullable<Text>,
        security -> Nullable<Text>,
        economy -> Nullable<Text>,
        second_economy -> Nullable<Text>,
        population -> Nullable<Int8>,
        powerplay_state -> Nullable<Text>,
        faction_name -> Nullable<Text>,
    }
}

diesel::table! {
    system_power (system_address, power_name) {
        system_address -> Int8,
        power_name -> Text,
    }
}

diesel::table! {
    system_faction (system_address, name) {
        system_address -> Int8,
        name -> Text,
        influence -> Nullable<Float8>,
        happiness -> Nullable<Text>,
        allegiance -> Nullable<Text>,
        faction_state -> Nullable<Text>,
        government -> Nullable<Text>,
        squadron_faction -> Nullable<Bool>,
    }
}

diesel::table! {
    system_faction_state (system_address, faction_name, kind, state) {
        system_address -> Int8,
        faction_name -> Text,
        kind -> Text,
        state -> Text,
        trend -> Nullable<Int4>,
    }
}

diesel::table! {
    system_conflict (system_address, faction1_name, faction2_name) {
        system_address -> Int8,
        faction1_name -> Text,
        faction2_name -> Text,
        status -> Nullable<Text>,
        war_type -> Nullable<Text>,
        faction1_stake -> Nullable<Text>,
        faction1_won_days -> Nullable<Int4>,
        faction2_stake -> Nullable<Text>,
        faction2_won_days -> Nullable<Int4>,
    }
}

diesel::table! {
    body (system_address, body_id) {
        system_address -> Int8,
        body_id -> Int8,
        body_name -> Nullable<Text>,
        body_type -> Nullable<Text>,
        parent -> Nullable<Int8>,
        distance_from_arrival_ls -> Nullable<Float8>,
        star_type -> Nullable<Text>,
        subclass -> Nullable<Int4>,
        planet_class -> Nullable<Text>,
        atmosphere -> Nullable<Text>,
        volcanism -> Nullable<Text>,
        mass_em -> Nullable<Float8>,
        radius -> Nullable<Float8>,
        surface_gravity -> Nullable<Float8>,
        surface_temperature -> Nullable<Float8>,
        surface_pressure -> Nullable<Float8>,
        landable -> Nullable<Bool>,
        terraform_state -> Nullable<Text>,
        tidal_lock -> Nullable<Bool>,
        composition_ice -> Nullable<Float8>,
        composition_metal -> Nullable<Float8>,
        composition_rock -> Nullable<Float8>,
        semi_major_axis -> Nullable<Float8>,
        eccentricity -> Nullable<Float8>,
        orbital_inclination -> Nullable<Float8>,
        periapsis -> Nullable<Float8>,
        orbital_period -> Nullable<Float8>,
        ascending_node -> Nullable<Float8>,
        mean_anomaly -> Nullable<Float8>,
        axial_tilt -> Nullable<Float8>,
        rotation_period -> Nullable<Float8>,
    }
}

diesel::table! {
    body_material (system_address, body_id, name) {
        system_address -> Int8,
        body_id -> Int8,
        name -> Text,
        percent -> Float8,
    }
}

diesel::table! {
    body_atmosphere_composition (system_address, body_id, name) {
        system_address -> Int8,
        body_id -> Int8,
        name -> Text,
        percent -> Float8,
    }
}

diesel::table! {
    body_ring (system_address, body_id, name) {
        system_address -> Int8,
        body_id -> Int8,
        name -> Text,
        ring_class -> Nullable<Text>,
        mass_mt -> Nullable<Float8>,
        inner_rad -> Nullable<Float8>,
        outer_rad -> Nullable<Float8>,
    }
}

diesel::table! {
    station (market_id) {
        market_id -> Int8,
        system_address -> Nullable<Int8>,
        station_name -> Nullable<Text>,
        station_type -> Nullable<Text>,
        body_id -> Nullable<Int8>,
        latitude -> Nullable<Float8>,
        longitude -> Nullable<Float8>,
        dist_from_star_ls -> Nullable<Float8>,
        government -> Nullable<Text>,
        allegiance -> Nullable<Text>,
        faction_name -> Nullable<Text>,
        faction_state -> Nullable<Text>,
        economy -> Nullable<Text>,
        state -> Nullable<Text>,
        num_services -> Nullable<Int4>,
        num_economies -> Nullable<Int4>,
        landing_pads_large -> Nullable<Int4>,
        landing_pads_medium -> Nullable<Int4>,
        landing_pads_small -> Nullable<Int4>,
    }
}

diesel::table! {
    station_economy (market_id, name) {
        market_id -> Int8,
        name -> Text,
        proportion -> Float8,
    }
}

diesel::table! {
    station_service (market_id, name) {
        market_id -> Int8,
        name -> Text,
    }
}

diesel::table! {
    landmark (id) {
        id -> Int8,
        entry_id -> Nullable<Int8>,
        auxiliary_id -> Nullable<Text>,
        system_address -> Nullable<Int8>,
        body_id -> Nullable<Int8>,
        name -> Nullable<Text>,
        latitude -> Nullable<Float8>,
        longitude -> Nullable<Float8>,
    }
}

diesel::table! {
    landmark_trait (landmark_id, trait_name) {
        landmark_id -> Int8,
        trait_name -> Text,
    }
}

diesel::table! {
    market (market_id) {
        market_id -> Int8,
        timestamp -> Nullable<Text>,
    }
}

diesel::table! {
    market_commodity (market_id, name) {
        market_id -> Int8,
        name -> Text,
        category -> Nullable<Text>,
        stock -> Int4,
        demand -> Int4,
        supply -> Int4,
        buy_price -> Int4,
        sell_price -> Int4,
    }
}

diesel::table! {
    shipyard (market_id) {
        market_id -> Int8,
        timestamp -> Nullable<Text>,
        num_ships -> Nullable<Int4>,
    }
}

diesel::table! {
    shipyard_ship (market_id, name) {
        market_id -> Int8,
        name -> Text,
    }
}

diesel::table! {
    outfitting (market_id) {
        market_id -> Int8,
        timestamp -> Nullable<Text>,
    }
}

diesel::table! {
    outfitting_module (market_id, name) {
        market_id -> Int8,
        name -> Text,
    }
}

diesel::table! {
    signal (id) {
        id -> Int8,
        system_address -> Int8,
        body_id -> Nullable<Int8>,
        #[sql_name = "type"]
        signal_type -> Text,
        count -> Int4,
        signal_name -> Nullable<Text>,
    }
}

diesel::table! {
    ingestion_lock (entity_kind, pk_json, event_kind) {
        entity_kind -> Text,
        pk_json -> Text,
        event_kind -> Text,
        timestamp -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    system,
    system_power,
    system_faction,
    system_faction_state,
    system_conflict,
    body,
    body_material,
    body_atmosphere_composition,
    body_ring,
    station,
    station_economy,
    station_service,
    landmark,
    landmark_trait,
    market,
    market_commodity,
    shipyard,
    shipyard_ship,
    outfitting,
    outfitting_module,
    signal,
    ingestion_lock,
);

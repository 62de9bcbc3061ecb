//! The dataset descriptor table (§6, §9): for each of the twelve datasets
//! the archive publishes, the basename of its daily file, the event tag
//! that selects it out of a multiplexed archive, and the strict-decode +
//! normalize step that turns one matching envelope into a bundle.

use serde_json::Value;

use crate::events::{
    ApproachSettlement, CarrierJump, Docked, FsdJump, FssBodySignals, FssSignalDiscovered, Market,
    Outfitting, SaaSignalsFound, Scan, ScanBaryCentre, Shipyard,
};
use crate::normalize;
use edsearch_db::bundle::DatabaseModels;

pub struct Dataset {
    /// Identifies the dataset on the command line and in logs.
    pub name: &'static str,
    /// The archive file basename, e.g. `Journal.FSDJump`.
    pub file_base: &'static str,
    /// The EDDN `message.event` tag this dataset's archive lines carry.
    pub event_tag: &'static str,
    decode_and_normalize: fn(&Value, &str, Option<&str>) -> Result<DatabaseModels, serde_json::Error>,
}

impl Dataset {
    pub fn decode_and_normalize(
        &self,
        message: &Value,
        timestamp: &str,
        gameversion: Option<&str>,
    ) -> Result<DatabaseModels, serde_json::Error> {
        (self.decode_and_normalize)(message, timestamp, gameversion)
    }
}

macro_rules! dataset {
    ($name:literal, $file_base:literal, $event_tag:literal, $event_ty:ty, $normalize:expr) => {
        Dataset {
            name: $name,
            file_base: $file_base,
            event_tag: $event_tag,
            decode_and_normalize: |message, timestamp, gameversion| {
                let event: $event_ty = serde_json::from_value(message.clone())?;
                Ok(($normalize)(&event, timestamp, gameversion))
            },
        }
    };
}

/// Wrap a normalizer that needs neither the event timestamp nor the
/// envelope's `gameversion`.
fn plain<E>(f: impl Fn(&E) -> DatabaseModels) -> impl Fn(&E, &str, Option<&str>) -> DatabaseModels {
    move |event, _timestamp, _gameversion| f(event)
}

/// Wrap a normalizer that needs the event timestamp but not `gameversion`.
fn with_timestamp<E>(
    f: impl Fn(&E, &str) -> DatabaseModels,
) -> impl Fn(&E, &str, Option<&str>) -> DatabaseModels {
    move |event, timestamp, _gameversion| f(event, timestamp)
}

/// All twelve datasets this service ingests (§6). Order matches the table
/// in the specification.
pub fn all_datasets() -> Vec<Dataset> {
    vec![
        dataset!(
            "FSDJump",
            "Journal.FSDJump",
            "FSDJump",
            FsdJump,
            plain(normalize::normalize_fsd_jump)
        ),
        dataset!(
            "CarrierJump",
            "Journal.CarrierJump",
            "CarrierJump",
            CarrierJump,
            plain(normalize::normalize_carrier_jump)
        ),
        dataset!(
            "Scan",
            "Journal.Scan",
            "Scan",
            Scan,
            plain(normalize::normalize_scan)
        ),
        dataset!(
            "ScanBaryCentre",
            "Journal.ScanBaryCentre",
            "ScanBaryCentre",
            ScanBaryCentre,
            plain(normalize::normalize_scan_bary_centre)
        ),
        dataset!(
            "Docked",
            "Journal.Docked",
            "Docked",
            Docked,
            plain(normalize::normalize_docked)
        ),
        dataset!(
            "ApproachSettlement",
            "Journal.ApproachSettlement",
            "ApproachSettlement",
            ApproachSettlement,
            plain(normalize::normalize_approach_settlement)
        ),
        dataset!(
            "Market",
            "Commodity",
            "Market",
            Market,
            with_timestamp(normalize::normalize_market)
        ),
        dataset!(
            "Outfitting",
            "Outfitting",
            "Outfitting",
            Outfitting,
            with_timestamp(normalize::normalize_outfitting)
        ),
        dataset!(
            "Shipyard",
            "Shipyard",
            "Shipyard",
            Shipyard,
            normalize::normalize_shipyard
        ),
        dataset!(
            "SAASignalsFound",
            "Journal.SAASignalsFound",
            "SAASignalsFound",
            SaaSignalsFound,
            plain(normalize::normalize_saa_signals_found)
        ),
        dataset!(
            "FSSSignalDiscovered",
            "Journal.FSSSignalDiscovered",
            "FSSSignalDiscovered",
            FssSignalDiscovered,
            plain(normalize::normalize_fss_signal_discovered)
        ),
        dataset!(
            "FSSBodySignals",
            "Journal.FSSBodySignals",
            "FSSBodySignals",
            FssBodySignals,
            plain(normalize::normalize_fss_body_signals)
        ),
    ]
}

pub fn find_dataset(name: &str) -> Option<Dataset> {
    all_datasets().into_iter().find(|d| d.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_datasets_have_distinct_names() {
        let datasets = all_datasets();
        let mut names: Vec<&str> = datasets.iter().map(|d| d.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), datasets.len());
    }

    #[test]
    fn find_dataset_by_name() {
        assert!(find_dataset("Scan").is_some());
        assert!(find_dataset("NotADataset").is_none());
    }
}

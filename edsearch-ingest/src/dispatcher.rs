//! The Run Dispatcher (C8, §4.8): accepts a day and either one dataset name
//! or "all", and fans out to up to four datasets running concurrently. Each
//! dataset's failure is captured into its own report rather than aborting
//! the others.

use chrono::NaiveDate;
use eddn_feed::ArchiveFeed;
use edsearch_db::ConnectionPool;
use futures::stream::{self, StreamExt};
use log::error;

use crate::dataset::{Dataset, all_datasets, find_dataset};
use crate::pipeline::{self, RunReport};

pub enum DatasetSelector {
    All,
    One(String),
}

/// Resolve a selector into the concrete datasets to run, in the table's
/// declared order.
fn resolve(selector: &DatasetSelector) -> Result<Vec<Dataset>, String> {
    match selector {
        DatasetSelector::All => Ok(all_datasets()),
        DatasetSelector::One(name) => {
            find_dataset(name).map(|d| vec![d]).ok_or_else(|| format!("unknown dataset: {name}"))
        }
    }
}

/// Run every selected dataset for `date`, at most `dataset_concurrency` at a
/// time (§5 "Concurrency & Resource Model", default 4 per §4.8). A dataset
/// whose run returns an archive-level error (not an individual line failure)
/// still yields a report with zero counters rather than aborting the batch.
pub async fn dispatch(
    base_url: &str,
    pool: &ConnectionPool,
    selector: DatasetSelector,
    date: NaiveDate,
    dataset_concurrency: usize,
    cache_capacity: usize,
) -> Result<Vec<RunReport>, String> {
    let datasets = resolve(&selector)?;
    let feed = ArchiveFeed::new();

    let reports = stream::iter(datasets)
        .map(|dataset| {
            let feed = &feed;
            let pool = pool.clone();
            async move {
                match pipeline::run(feed, &pool, base_url, &dataset, date, cache_capacity).await {
                    Ok(report) => report,
                    Err(err) => {
                        error!("dataset {} aborted: {}", dataset.name, err);
                        RunReport {
                            dataset: dataset.name.to_string(),
                            date: Some(date),
                            ..Default::default()
                        }
                    }
                }
            }
        })
        .buffer_unordered(dataset_concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    Ok(reports)
}

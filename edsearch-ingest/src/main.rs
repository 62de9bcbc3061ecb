//! CLI entrypoint: ingest one dataset, or all datasets, for one day (§10.6).
//!
//! Usage: `edsearch-ingest <YYYY-MM-DD> <dataset-name|all>`

mod cache;
mod config;
mod dataset;
mod dispatcher;
mod envelope;
mod events;
mod gate;
mod normalize;
mod pipeline;

use chrono::NaiveDate;
use dispatcher::DatasetSelector;
use log::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = config::IngestConfig::load()?;

    let mut args = std::env::args().skip(1);
    let date_arg = args.next().ok_or("usage: edsearch-ingest <YYYY-MM-DD> <dataset-name|all>")?;
    let dataset_arg = args.next().ok_or("usage: edsearch-ingest <YYYY-MM-DD> <dataset-name|all>")?;

    let date = NaiveDate::parse_from_str(&date_arg, "%Y-%m-%d")?;
    let selector = if dataset_arg.eq_ignore_ascii_case("all") {
        DatasetSelector::All
    } else {
        DatasetSelector::One(dataset_arg)
    };

    if config.run_migrations_on_startup {
        edsearch_db::run_migrations()?;
    }

    let pool = edsearch_db::get_pool(config.db_pool_size)?;

    let reports = dispatcher::dispatch(
        &config.archive_base_url,
        &pool,
        selector,
        date,
        config.dataset_concurrency,
        config.timestamp_cache_capacity,
    )
    .await?;

    for report in &reports {
        info!(
            "{}: {} lines, {} applied, {} skipped, {} failed",
            report.dataset, report.total_lines, report.applied, report.skipped, report.failed
        );
    }

    if reports.iter().any(|r| r.failed > 0 && r.applied == 0 && r.total_lines == r.failed) {
        error!("one or more datasets failed every line in their run");
    }

    Ok(())
}

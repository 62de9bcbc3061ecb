//! The Pipeline Driver (C6, §4.6): wires the Archive Reader, envelope/event
//! decode, normalizer, and freshness gate together for one dataset's one
//! day, and produces a [`RunReport`] describing what happened.

use chrono::NaiveDate;
use eddn_feed::{ArchiveFeed, ArchiveRequest, ArchiveStreamError};
use edsearch_db::ConnectionPool;
use futures::StreamExt;
use log::{info, warn};
use miette::{Diagnostic, GraphicalReportHandler};
use thiserror::Error;

use crate::cache::TimestampCache;
use crate::dataset::Dataset;
use crate::envelope::{Envelope, MessageHeader};
use crate::gate::{self, GateOutcome};

const PROGRESS_EVERY: u64 = 1_000;

#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    #[error("error opening archive stream")]
    Archive(#[from] ArchiveStreamError),
}

#[derive(Debug, Default, Clone)]
pub struct RunReport {
    pub dataset: String,
    pub date: Option<NaiveDate>,
    pub total_lines: u64,
    pub applied: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl RunReport {
    fn new(dataset: &str, date: NaiveDate) -> Self {
        Self {
            dataset: dataset.to_string(),
            date: Some(date),
            ..Default::default()
        }
    }
}

/// Render a `miette` diagnostic the way the archive's own failure logs do,
/// so per-line errors keep their full causal chain in the run report.
fn diagnostic_to_string(err: &(dyn Diagnostic + 'static)) -> String {
    let mut out = String::new();
    let _ = GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor())
        .render_report(&mut out, err);
    out
}

/// Ingest one dataset's one day of archive lines (§4.6). Errors decoding or
/// normalizing an individual line are counted as failures and logged, not
/// propagated; only archive-open and pool-checkout failures abort the whole
/// run, per the error taxonomy in §7.
pub async fn run(
    feed: &ArchiveFeed,
    pool: &ConnectionPool,
    base_url: &str,
    dataset: &Dataset,
    date: NaiveDate,
    cache_capacity: usize,
) -> Result<RunReport, PipelineError> {
    let mut report = RunReport::new(dataset.name, date);
    let mut cache = TimestampCache::new(cache_capacity);

    let request = ArchiveRequest {
        base_url: base_url.to_string(),
        file_base: dataset.file_base.to_string(),
        date,
    };

    let mut lines = Box::pin(feed.lines(request));

    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                report.failed += 1;
                warn!("archive stream error for {}: {}", dataset.name, diagnostic_to_string(&err));
                continue;
            }
        };

        report.total_lines += 1;
        if report.total_lines % PROGRESS_EVERY == 0 {
            info!(
                "{} {}: {} lines processed ({} applied, {} skipped, {} failed)",
                dataset.name, date, report.total_lines, report.applied, report.skipped, report.failed
            );
        }

        process_line(dataset, &line, pool, &mut cache, &mut report);
    }

    info!(
        "{} {} finished: {} lines, {} applied, {} skipped, {} failed",
        dataset.name, date, report.total_lines, report.applied, report.skipped, report.failed
    );

    Ok(report)
}

fn process_line(
    dataset: &Dataset,
    line: &str,
    pool: &ConnectionPool,
    cache: &mut TimestampCache,
    report: &mut RunReport,
) {
    let envelope: Envelope = match serde_json::from_str(line) {
        Ok(envelope) => envelope,
        Err(_) => {
            // Parse error: counted as a failure (§7), not fatal to the run.
            report.failed += 1;
            return;
        }
    };

    let message_header: MessageHeader = match serde_json::from_value(envelope.message.clone()) {
        Ok(header) => header,
        Err(_) => {
            report.failed += 1;
            return;
        }
    };

    if !message_header.is_processable() || message_header.event != dataset.event_tag {
        report.skipped += 1;
        return;
    }

    let bundle = match dataset.decode_and_normalize(
        &envelope.message,
        &message_header.timestamp,
        envelope.header.gameversion.as_deref(),
    ) {
        Ok(bundle) => bundle,
        Err(_) => {
            report.failed += 1;
            return;
        }
    };

    if bundle.is_empty() {
        report.skipped += 1;
        return;
    }

    let mut conn = match pool.get() {
        Ok(conn) => conn,
        Err(err) => {
            report.failed += 1;
            warn!("pool checkout failed: {err}");
            return;
        }
    };

    match gate::apply(
        &mut conn,
        cache,
        &bundle,
        dataset.event_tag,
        &message_header.timestamp,
    ) {
        Ok(GateOutcome::Applied) => report.applied += 1,
        Ok(GateOutcome::Stale) => report.skipped += 1,
        Err(err) => {
            report.failed += 1;
            warn!("gate error for {}: {}", dataset.name, diagnostic_to_string(&err));
        }
    }
}

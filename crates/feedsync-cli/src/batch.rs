//! Sequential batch driver
//!
//! Jobs run one after another. A failing job is logged and recorded in the
//! [`BatchReport`]; it never stops the jobs after it.

use feedsync_common::Result;
use feedsync_convert::TransformOptions;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::jobs::{Job, JobList, RejectedLine};
use crate::loader::SourceLoader;
use crate::sink::Sink;

/// A job that did not reach its destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobFailure {
    pub source: String,
    pub destination: String,
    /// [`feedsync_common::FeedError::kind`] of the failure
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Destination names delivered, in job order
    pub delivered: Vec<String>,
    pub failures: Vec<JobFailure>,
    /// 1-based line numbers of rejected job lines
    pub rejected: Vec<usize>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.delivered.len() + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.rejected.is_empty()
    }
}

/// Run every job in `list` against `loader` and `sink`.
pub async fn run_batch(
    list: &JobList,
    loader: &dyn SourceLoader,
    sink: &dyn Sink,
    options: &TransformOptions,
) -> BatchReport {
    let mut report = BatchReport::default();

    for RejectedLine { line, content } in &list.rejected {
        warn!(line, content = %content, "Skipping job line without a destination name");
        report.rejected.push(*line);
    }

    info!(jobs = list.jobs.len(), sink = %sink.describe(), "Starting batch");

    for job in &list.jobs {
        match run_job(job, loader, sink, options).await {
            Ok(()) => report.delivered.push(job.destination.clone()),
            Err(e) => {
                error!(
                    source = %job.source,
                    destination = %job.destination,
                    kind = e.kind(),
                    error = %e,
                    "Job failed"
                );
                report.failures.push(JobFailure {
                    source: job.source.clone(),
                    destination: job.destination.clone(),
                    kind: e.kind().to_string(),
                    message: e.to_string(),
                });
            },
        }
    }

    info!(
        delivered = report.delivered.len(),
        failed = report.failures.len(),
        rejected = report.rejected.len(),
        "Batch finished"
    );

    report
}

/// Load, convert and deliver a single job.
#[instrument(skip_all, fields(line = job.line, source = %job.source, destination = %job.destination))]
pub async fn run_job(
    job: &Job,
    loader: &dyn SourceLoader,
    sink: &dyn Sink,
    options: &TransformOptions,
) -> Result<()> {
    let raw = loader.load(&job.source).await?;
    let catalog = feedsync_convert::convert(&raw, options)?;
    sink.deliver(&catalog, &job.destination).await?;
    info!(bytes = catalog.len(), "Job delivered");
    Ok(())
}

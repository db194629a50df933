// src/pipeline.rs
//! One polling run: list jobs, detail the ones with applications, announce
//! hires that were not announced before, remember them.
//!
//! Jobs are handled strictly in feed order, one request at a time. Any error
//! aborts the run; IDs announced before the error are already on disk.

use anyhow::{Context, Result};
use metrics::counter;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::geocode::Geocoder;
use crate::hires::{detect_new_hires, HireScan};
use crate::metrics::{ensure_described, HIRES_ANNOUNCED, JOBS_SKIPPED, WEBHOOK_POSTS};
use crate::notify::format::build_message;
use crate::notify::Publisher;
use crate::portal::{JobSummary, Portal};
use crate::seen::SeenStore;
use crate::stations::StationTable;

/// External collaborators of a run.
pub struct Services<'a> {
    pub portal: &'a dyn Portal,
    pub geocoder: &'a dyn Geocoder,
    pub publisher: &'a dyn Publisher,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub jobs_listed: usize,
    pub details_fetched: usize,
    pub notifications: usize,
    pub hires_announced: usize,
    pub skipped_no_applications: usize,
    pub skipped_no_hires: usize,
    pub skipped_already_announced: usize,
    pub skipped_no_location: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobOutcome {
    NoHires,
    AlreadyAnnounced,
    NoLocation,
    Announced { hires: usize },
}

pub async fn run_once(
    services: &Services<'_>,
    stations: &StationTable,
    seen: &mut SeenStore,
    settings: &Settings,
) -> Result<RunSummary> {
    ensure_described();
    let mut summary = RunSummary::default();

    let jobs = services.portal.list_jobs().await?;
    summary.jobs_listed = jobs.len();
    info!(jobs = jobs.len(), "job list fetched");

    let total = jobs.len();
    for (i, job) in jobs.iter().enumerate() {
        if job.has_no_applications() {
            summary.skipped_no_applications += 1;
            counter!(JOBS_SKIPPED, "reason" => "no_applications").increment(1);
            continue;
        }

        info!(job = %job.id, progress = %format!("{}/{}", i + 1, total), "fetching job detail");
        let outcome = process_job(services, stations, seen, settings, job)
            .await
            .with_context(|| format!("processing job {} ({}/{})", job.id, i + 1, total))?;
        summary.details_fetched += 1;

        match outcome {
            JobOutcome::NoHires => {
                summary.skipped_no_hires += 1;
                counter!(JOBS_SKIPPED, "reason" => "no_hires").increment(1);
            }
            JobOutcome::AlreadyAnnounced => {
                summary.skipped_already_announced += 1;
                counter!(JOBS_SKIPPED, "reason" => "already_announced").increment(1);
            }
            JobOutcome::NoLocation => {
                summary.skipped_no_location += 1;
                counter!(JOBS_SKIPPED, "reason" => "no_location").increment(1);
            }
            JobOutcome::Announced { hires } => {
                summary.notifications += 1;
                summary.hires_announced += hires;
            }
        }
    }

    seen.flush()?;
    info!(
        listed = summary.jobs_listed,
        detailed = summary.details_fetched,
        notifications = summary.notifications,
        hires = summary.hires_announced,
        "run complete"
    );
    Ok(summary)
}

async fn process_job(
    services: &Services<'_>,
    stations: &StationTable,
    seen: &mut SeenStore,
    settings: &Settings,
    job: &JobSummary,
) -> Result<JobOutcome> {
    let detail = services.portal.job_detail(&job.id).await?;

    let hires = match detect_new_hires(&detail, seen.set())? {
        HireScan::NoHires => {
            debug!(job = %job.id, "no hires yet");
            return Ok(JobOutcome::NoHires);
        }
        HireScan::AllSeen => {
            debug!(job = %job.id, "all hires already announced");
            return Ok(JobOutcome::AlreadyAnnounced);
        }
        HireScan::New(hires) => hires,
    };

    let postal = detail.postal_code();
    let place = if postal.trim().is_empty() {
        None
    } else {
        services.geocoder.search(postal.trim()).await?
    };
    let Some(place) = place else {
        // Hires stay unrecorded, so the job is retried on the next run.
        warn!(job = %job.id, postal = %postal, "office address not found, skipping job");
        return Ok(JobOutcome::NoLocation);
    };
    let nearest = stations.nearest(place.coord);
    if nearest.is_none() {
        warn!(job = %job.id, "station table has no usable coordinates");
    }

    let message = build_message(&detail, &settings.job_link(&job.id), &hires, &place, nearest)?;
    debug!(payload = %serde_json::to_string(&message).unwrap_or_default(), "webhook payload");

    let status = services.publisher.publish(&message).await?;
    counter!(WEBHOOK_POSTS).increment(1);
    info!(job = %job.id, status, hires = hires.len(), "webhook posted");
    if !(200..300).contains(&status) {
        warn!(job = %job.id, status, "webhook answered with a non-success status");
    }

    let added = seen.record(hires.iter().map(|h| h.id));
    counter!(HIRES_ANNOUNCED).increment(added as u64);
    seen.save()?;

    Ok(JobOutcome::Announced { hires: hires.len() })
}

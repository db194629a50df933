// src/metrics.rs
//! Counter names. Recording is a no-op unless a recorder is installed.

use metrics::describe_counter;
use once_cell::sync::OnceCell;

pub const PORTAL_JOBS_LISTED: &str = "portal_jobs_listed_total";
pub const PORTAL_JOB_DETAILS: &str = "portal_job_details_total";
pub const GEOCODER_REQUESTS: &str = "geocoder_requests_total";
pub const GEOCODER_MISSES: &str = "geocoder_misses_total";
pub const WEBHOOK_POSTS: &str = "webhook_posts_total";
pub const HIRES_ANNOUNCED: &str = "hires_announced_total";
pub const JOBS_SKIPPED: &str = "jobs_skipped_total";

/// One-time metrics registration (so series carry descriptions).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(PORTAL_JOBS_LISTED, "Jobs returned by the portal list endpoint.");
        describe_counter!(PORTAL_JOB_DETAILS, "Job detail requests issued.");
        describe_counter!(GEOCODER_REQUESTS, "Geocoder search requests issued.");
        describe_counter!(GEOCODER_MISSES, "Geocoder searches with no result.");
        describe_counter!(WEBHOOK_POSTS, "Webhook messages posted.");
        describe_counter!(HIRES_ANNOUNCED, "Applicants announced for the first time.");
        describe_counter!(JOBS_SKIPPED, "Jobs skipped, labelled by reason.");
    });
}

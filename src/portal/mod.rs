// src/portal/mod.rs
pub mod types;

use async_trait::async_trait;
use chrono::Utc;
use metrics::counter;
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::metrics::{PORTAL_JOBS_LISTED, PORTAL_JOB_DETAILS};
pub use types::{HireRecord, JobDetail, JobSummary};

#[derive(Error, Debug)]
pub enum FeedError {
    /// The list response carried no `jobs` field: the portal treats an
    /// expired or invalid session this way.
    #[error("no jobs field in portal response; check the portal auth cookie")]
    Unauthorized,
    #[error("portal request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("portal returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("portal returned no detail for job {job_id}")]
    MissingDetail { job_id: String },
}

impl FeedError {
    pub fn is_network(&self) -> bool {
        matches!(self, FeedError::Http(e) if e.is_connect() || e.is_timeout())
    }
}

#[async_trait]
pub trait Portal: Send + Sync {
    async fn list_jobs(&self) -> Result<Vec<JobSummary>, FeedError>;
    async fn job_detail(&self, job_id: &str) -> Result<JobDetail, FeedError>;
}

/// HTTP client for the portal's job API, authenticated by session cookie.
pub struct PortalClient {
    client: Client,
    base_url: String,
    cookie: String,
    timeout: Option<Duration>,
}

#[derive(Deserialize)]
struct DetailEnvelope {
    #[serde(default)]
    jobs: Vec<JobDetail>,
}

impl PortalClient {
    /// `base_url` like `https://host/roboroy/api/v1` (no trailing slash).
    pub fn new(base_url: &str, cookie: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn get_text(&self, url: &str) -> Result<String, FeedError> {
        let mut req = self.client.get(url).header(header::COOKIE, &self.cookie);
        if let Some(t) = self.timeout {
            req = req.timeout(t);
        }
        let resp = req.send().await?;
        info!(status = %resp.status(), url = %resp.url(), "portal request");
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl Portal for PortalClient {
    async fn list_jobs(&self) -> Result<Vec<JobSummary>, FeedError> {
        let url = format!("{}/jobs/list", self.base_url);
        let body = self.get_text(&url).await?;
        let jobs = parse_job_list(&body)?;
        counter!(PORTAL_JOBS_LISTED).increment(jobs.len() as u64);
        Ok(jobs)
    }

    async fn job_detail(&self, job_id: &str) -> Result<JobDetail, FeedError> {
        // `_` busts any cache between us and the portal.
        let ts = Utc::now().timestamp_millis();
        let url = format!("{}/jobs/{job_id}?_={ts}&jobId={job_id}", self.base_url);
        let body = self.get_text(&url).await?;
        counter!(PORTAL_JOB_DETAILS).increment(1);
        parse_job_detail(job_id, &body)
    }
}

pub fn parse_job_list(body: &str) -> Result<Vec<JobSummary>, FeedError> {
    let v: Value = serde_json::from_str(body)?;
    match v.get("jobs") {
        None | Some(Value::Null) => Err(FeedError::Unauthorized),
        Some(jobs) => Ok(serde_json::from_value(jobs.clone())?),
    }
}

pub fn parse_job_detail(job_id: &str, body: &str) -> Result<JobDetail, FeedError> {
    let env: DetailEnvelope = serde_json::from_str(body)?;
    env.jobs
        .into_iter()
        .next()
        .ok_or_else(|| FeedError::MissingDetail {
            job_id: job_id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = include_str!("../../tests/fixtures/job_detail.json");

    #[test]
    fn missing_jobs_field_means_unauthorized() {
        let err = parse_job_list(r#"{"message":"unauthorised"}"#).unwrap_err();
        assert!(matches!(err, FeedError::Unauthorized));
    }

    #[test]
    fn job_list_parses_ids_and_counts() {
        let jobs = parse_job_list(
            r#"{"jobs":[{"_id":"a1","totalApplications":3},{"_id":"b2","totalApplications":0}]}"#,
        )
        .unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, "a1");
        assert_eq!(jobs[0].total_applications, Some(3));
        assert_eq!(jobs[1].total_applications, Some(0));
    }

    #[test]
    fn null_count_does_not_reject_the_feed() {
        let jobs = parse_job_list(
            r#"{"jobs":[{"_id":"a","totalApplications":null},{"_id":"b","totalApplications":3}]}"#,
        )
        .unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].total_applications, None);
        assert!(!jobs[0].has_no_applications());
    }

    #[test]
    fn null_detail_strings_do_not_reject_the_job() {
        let mut v: Value = serde_json::from_str(DETAIL).unwrap();
        let job = &mut v["jobs"][0];
        job["dashboard"]["hiredApplnsArray"][0]["applicantProfile"]["residentStatus"] = Value::Null;
        job["user"]["designation"] = Value::Null;
        job["company"]["website"] = Value::Null;
        let d = parse_job_detail("63a0", &v.to_string()).unwrap();
        assert_eq!(d.dashboard.hired_applns_array[0].applicant_profile.resident_status, "");
        assert_eq!(d.user.designation, "");
        assert_eq!(d.company.website, "");
    }

    #[test]
    fn malformed_list_is_a_decode_error() {
        assert!(matches!(
            parse_job_list("<html>").unwrap_err(),
            FeedError::Decode(_)
        ));
    }

    #[test]
    fn detail_takes_first_job() {
        let d = parse_job_detail("63a0", DETAIL).unwrap();
        assert_eq!(d.jobname.name_name, "software engineering intern");
        assert_eq!(d.dashboard.hired_applns, 2);
        assert_eq!(d.dashboard.hired_applns_array.len(), 2);
        assert_eq!(d.postal_code(), "138623");
    }

    #[test]
    fn empty_detail_array_is_reported() {
        let err = parse_job_detail("x", r#"{"jobs":[]}"#).unwrap_err();
        assert!(matches!(err, FeedError::MissingDetail { job_id } if job_id == "x"));
    }
}

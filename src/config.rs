// src/config.rs
//! Environment-sourced configuration.
//!
//! Split in two: `Settings` carries endpoints and file paths (all defaulted),
//! `Credentials` carries the secrets a polling run cannot start without.

use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://internship.sp.edu.sg/roboroy/api/v1";
pub const DEFAULT_JOB_URL_BASE: &str = "https://internship.sp.edu.sg/app/campus/candidate/job";
pub const DEFAULT_GEOCODER_URL: &str = "https://www.onemap.gov.sg/api/common/elastic/search";
pub const DISCORD_WEBHOOK_BASE: &str = "https://discord.com/api/webhooks";

const SESSION_COOKIE_NAME: &str = "connect.sid=";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub job_url_base: String,
    pub geocoder_url: String,
    pub seen_path: PathBuf,
    pub station_names_path: PathBuf,
    pub station_cache_path: PathBuf,
    pub lock_path: PathBuf,
    /// `None` keeps the HTTP client's default (no timeout).
    pub http_timeout: Option<Duration>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let http_timeout = match lookup("HTTP_TIMEOUT_SECS").filter(|v| !v.trim().is_empty()) {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("HTTP_TIMEOUT_SECS must be a whole number, got {raw:?}"))?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            base_url: get("BASE_URL", DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            job_url_base: get("JOB_URL_BASE", DEFAULT_JOB_URL_BASE)
                .trim_end_matches('/')
                .to_string(),
            geocoder_url: get("GEOCODER_URL", DEFAULT_GEOCODER_URL),
            seen_path: PathBuf::from(get("SEEN_PATH", "interns.json")),
            station_names_path: PathBuf::from(get("STATION_NAMES_PATH", "mrt.json")),
            station_cache_path: PathBuf::from(get("STATION_CACHE_PATH", "stations.json")),
            lock_path: PathBuf::from(get("LOCK_PATH", "intern-watch.lock")),
            http_timeout,
        })
    }

    /// Deep link to a posting on the portal's candidate UI.
    pub fn job_link(&self, job_id: &str) -> String {
        format!("{}/{}", self.job_url_base, job_id)
    }
}

#[derive(Clone, PartialEq)]
pub struct Credentials {
    /// Full `Cookie` header value, always carrying the session key name.
    pub cookie: String,
    pub webhook_url: String,
}

// Keep secrets out of logs and panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("cookie_len", &self.cookie.len())
            .field("webhook_url", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow!("{key} is missing or empty"))
        };

        let cookie = normalize_cookie(&required("COOKIE")?);

        let webhook_url = match lookup("WEBHOOK_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => url.trim().to_string(),
            None => format!(
                "{}/{}/{}",
                DISCORD_WEBHOOK_BASE,
                required("WEBHOOK_ID")?,
                required("WEBHOOK_TOKEN")?
            ),
        };

        Ok(Self {
            cookie,
            webhook_url,
        })
    }
}

/// Accept either the bare session value or a full `connect.sid=...` pair.
pub fn normalize_cookie(raw: &str) -> String {
    if raw.contains(SESSION_COOKIE_NAME) {
        raw.to_string()
    } else {
        format!("{SESSION_COOKIE_NAME}{raw}")
    }
}

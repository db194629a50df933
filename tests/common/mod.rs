// tests/common/mod.rs
// In-process stand-ins for the portal, geocoder and webhook.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use intern_watch::geo::Coord;
use intern_watch::geocode::{Geocoder, Place};
use intern_watch::notify::{Publisher, WebhookMessage};
use intern_watch::portal::{FeedError, JobDetail, JobSummary, Portal};
use intern_watch::stations::{Station, StationTable};
use intern_watch::Settings;

pub struct FakePortal {
    pub jobs: Vec<JobSummary>,
    pub details: HashMap<String, Value>,
    pub detail_calls: Mutex<Vec<String>>,
}

impl FakePortal {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            details: HashMap::new(),
            detail_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_job(mut self, id: &str, total_applications: u64, detail: Option<Value>) -> Self {
        self.jobs.push(JobSummary {
            id: id.to_string(),
            total_applications: Some(total_applications),
        });
        if let Some(d) = detail {
            self.details.insert(id.to_string(), d);
        }
        self
    }

    /// A list entry whose `totalApplications` came back as `null`.
    pub fn with_unknown_count_job(mut self, id: &str, detail: Value) -> Self {
        self.jobs.push(JobSummary {
            id: id.to_string(),
            total_applications: None,
        });
        self.details.insert(id.to_string(), detail);
        self
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Portal for FakePortal {
    async fn list_jobs(&self) -> Result<Vec<JobSummary>, FeedError> {
        Ok(self.jobs.clone())
    }

    async fn job_detail(&self, job_id: &str) -> Result<JobDetail, FeedError> {
        self.detail_calls.lock().unwrap().push(job_id.to_string());
        match self.details.get(job_id) {
            Some(v) => Ok(serde_json::from_value(v.clone())?),
            None => Err(FeedError::MissingDetail {
                job_id: job_id.to_string(),
            }),
        }
    }
}

/// Resolves every query to the same office, unless built with `none()`.
pub struct FakeGeocoder {
    pub place: Option<Place>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn office() -> Self {
        Self {
            place: Some(office_place()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn none() -> Self {
        Self {
            place: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn search(&self, query: &str) -> Result<Option<Place>> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.place.clone())
    }
}

pub struct RecordingPublisher {
    pub status: u16,
    pub sent: Mutex<Vec<WebhookMessage>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            status: 204,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<WebhookMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, message: &WebhookMessage) -> Result<u16> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(self.status)
    }
}

pub fn office_place() -> Place {
    Place {
        building: "MAPLETREE BUSINESS CITY".into(),
        block: "20".into(),
        road: "PASIR PANJANG ROAD".into(),
        postal: "117439".into(),
        coord: Coord::new(1.275_042_841, 103.799_020_022),
    }
}

pub fn stations() -> StationTable {
    StationTable::new(vec![
        Station::new("Labrador Park MRT Station", Some(Coord::new(1.272_220, 103.802_600))),
        Station::new("Haw Par Villa MRT Station", Some(Coord::new(1.282_530, 103.781_820))),
        Station::new("Lost Station", None),
    ])
}

pub fn settings() -> Settings {
    Settings::from_lookup(|_| None).unwrap()
}

/// Minimal detail payload whose hired array carries `hire_ids` in order.
pub fn detail_json(job_id: &str, total_applications: u64, hire_ids: &[i64]) -> Value {
    let hires: Vec<Value> = hire_ids
        .iter()
        .map(|id| {
            json!({
                "applicantProfile": {
                    "genderId": 2,
                    "firstName": format!("Student {id}"),
                    "email": format!("{id}@ichat.sp.edu.sg"),
                    "residentStatus": "Singapore Citizen",
                    "linkedin": null
                },
                "applicantStudentProfile": { "studentUniversityId": id.to_string() },
                "applicationData": { "shortlistedDate": "2023-01-05T02:00:00.000Z" }
            })
        })
        .collect();

    json!({
        "_id": job_id,
        "jobname": { "nameName": "data analyst intern" },
        "approvedList": [ { "updatedDate": "2022-12-20T10:00:00.000Z" } ],
        "maxSalary": 1000,
        "vacancy": 1,
        "dashboard": {
            "totalApplications": total_applications,
            "hiredApplns": hire_ids.len(),
            "hiredApplnsArray": hires
        },
        "company": { "website": "acme.sg", "displayCompanyName": "Acme" },
        "user": {
            "firstname": "Ben",
            "lastname": " ",
            "designation": "Lead",
            "email": "ben@acme.sg",
            "contactnumber": 62345678
        },
        "office": { "address": { "zipcode": "117439" } }
    })
}

pub fn seen_file(dir: &Path, ids: &[i64]) -> PathBuf {
    let p = dir.join("interns.json");
    std::fs::write(&p, serde_json::to_string(ids).unwrap()).unwrap();
    p
}

pub fn read_ids(path: &Path) -> Vec<i64> {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// src/portal/types.rs
//! Wire model of the placement portal's job endpoints.
//!
//! The portal is loose with scalar types (IDs, salaries and postal codes show
//! up as either strings or numbers), so those fields stay `serde_json::Value`
//! and are rendered through [`plain`].

use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One entry of `GET /jobs/list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    #[serde(rename = "_id")]
    pub id: String,
    /// `None` when the portal omits the count or sends `null`.
    #[serde(default)]
    pub total_applications: Option<u64>,
}

impl JobSummary {
    /// Only an explicit zero rules a job out; an unknown count is detailed.
    pub fn has_no_applications(&self) -> bool {
        self.total_applications == Some(0)
    }
}

/// First element of `GET /jobs/{id}`'s `jobs` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub jobname: JobName,
    #[serde(default, deserialize_with = "null_as_default")]
    pub approved_list: Vec<Approval>,
    #[serde(default)]
    pub max_salary: Value,
    #[serde(default)]
    pub vacancy: Value,
    pub dashboard: Dashboard,
    pub company: Company,
    pub user: Poster,
    pub office: Office,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobName {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub updated_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_applications: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hired_applns: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hired_applns_array: Vec<HireRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_company_name: String,
}

/// Contact person who posted the job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Poster {
    #[serde(default, deserialize_with = "null_as_default")]
    pub firstname: String,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub designation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub contactnumber: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Office {
    pub address: OfficeAddress,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfficeAddress {
    #[serde(default)]
    pub zipcode: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HireRecord {
    pub applicant_profile: ApplicantProfile,
    pub applicant_student_profile: StudentProfile,
    pub application_data: ApplicationData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    #[serde(default)]
    pub gender_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resident_status: String,
    #[serde(default)]
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub student_university_id: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationData {
    pub shortlisted_date: String,
}

impl JobDetail {
    pub fn posted_date(&self) -> Result<&str> {
        self.approved_list
            .first()
            .map(|a| a.updated_date.as_str())
            .ok_or_else(|| anyhow!("job {} has an empty approvedList", self.id))
    }

    pub fn postal_code(&self) -> String {
        plain(&self.office.address.zipcode)
    }
}

impl HireRecord {
    /// Numeric student ID; the dedup key for announcements.
    pub fn applicant_id(&self) -> Result<i64> {
        let raw = &self.applicant_student_profile.student_university_id;
        match raw {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| anyhow!("studentUniversityId {n} is not an integer")),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| anyhow!("studentUniversityId {s:?} is not an integer")),
            other => Err(anyhow!("studentUniversityId has unexpected shape: {other}")),
        }
    }
}

/// Like `#[serde(default)]`, but an explicit `null` also yields the default.
fn null_as_default<'de, D, T>(de: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Render a loosely-typed scalar the way a human expects: strings without
/// quotes, null as empty.
pub fn plain(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// src/notify/format.rs
//! Turns a job, its new hires and its location into a webhook message.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use super::discord::{Embed, EmbedAuthor, EmbedField, WebhookMessage, EMBED_COLOR};
use crate::geocode::Place;
use crate::hires::NewHire;
use crate::portal::types::{plain, Poster};
use crate::portal::JobDetail;
use crate::stations::Nearest;

const PORTAL_TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
const DISPLAY_DATE_FORMAT: &str = "%a %d %b %Y";
const LINKEDIN_EMOJI: &str = "<:linkedin:1051501235171229776>";

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Alphabetic}+").unwrap());

/// Capitalize each run of letters and lowercase the rest of it:
/// `"SOFTWARE eng. intern (3d)"` → `"Software Eng. Intern (3D)"`.
pub fn title_case(s: &str) -> String {
    RE_WORD
        .replace_all(s, |caps: &regex::Captures| {
            let word = &caps[0];
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .into_owned()
}

/// Discord rejects author URLs without a scheme.
pub fn normalize_website(raw: &str) -> Option<String> {
    let site = raw.trim();
    if site.is_empty() {
        return None;
    }
    let lower = site.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Some(site.to_string())
    } else {
        Some(format!("https://{site}"))
    }
}

/// `2022-11-14T03:21:45.123Z` → `Mon 14 Nov 2022`.
pub fn display_date(portal_ts: &str) -> Result<String> {
    let dt = NaiveDateTime::parse_from_str(portal_ts.trim(), PORTAL_TS_FORMAT)
        .with_context(|| format!("unexpected portal timestamp {portal_ts:?}"))?;
    Ok(dt.format(DISPLAY_DATE_FORMAT).to_string())
}

pub fn build_message(
    job: &JobDetail,
    job_url: &str,
    hires: &[NewHire<'_>],
    place: &Place,
    nearest: Option<Nearest<'_>>,
) -> Result<WebhookMessage> {
    let description = format!(
        ":date: **Posted:** {}\n:moneybag: **Salary:** ${}\n:busts_in_silhouette: **Vacancies:** {}\n:envelope_with_arrow: **Applications:** {}",
        display_date(job.posted_date()?)?,
        plain(&job.max_salary),
        plain(&job.vacancy),
        job.dashboard.total_applications,
    );

    let author_name = job.company.display_company_name.trim();
    let author = (!author_name.is_empty()).then(|| EmbedAuthor {
        name: author_name.to_string(),
        url: normalize_website(&job.company.website),
    });

    let mut msg = WebhookMessage::single_embed(Embed {
        title: title_case(&job.jobname.name_name),
        url: job_url.to_string(),
        description,
        color: EMBED_COLOR,
        fields: Vec::with_capacity(hires.len() + 2),
        author,
    });

    for hire in hires {
        msg.push_field(hire_field(hire)?);
    }
    msg.push_field(company_field(&job.user));
    msg.push_field(location_field(place, nearest));
    Ok(msg)
}

fn hire_field(hire: &NewHire<'_>) -> Result<EmbedField> {
    let profile = &hire.record.applicant_profile;
    let icon = if profile.gender_id == Some(1) {
        ":mens:"
    } else {
        ":womens:"
    };
    let offered = display_date(&hire.record.application_data.shortlisted_date)?;

    let mut value = format!(
        "{icon} **Name:** {}\n:email: **Email:** {}\n:id: **ID:** {}\n:date: **Offered:** {offered}\n:passport_control: **Residency:** {}",
        profile.first_name,
        profile.email,
        plain(&hire.record.applicant_student_profile.student_university_id).trim(),
        profile.resident_status,
    );
    if let Some(url) = profile.linkedin.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        value.push_str(&format!("\n{LINKEDIN_EMOJI} **LinkedIn:** {url}"));
    }

    Ok(EmbedField {
        name: format!("Intern #{}", hire.position),
        value,
        inline: true,
    })
}

fn company_field(poster: &Poster) -> EmbedField {
    let name = [Some(poster.firstname.as_str()), poster.lastname.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    EmbedField {
        name: "Company".to_string(),
        value: format!(
            ":bust_in_silhouette: **Name:** {name}\n:briefcase: **Role:** {}\n:email: **Email:** {}\n:telephone: **Contact:** {}",
            poster.designation,
            poster.email,
            plain(&poster.contactnumber),
        ),
        inline: false,
    }
}

fn location_field(place: &Place, nearest: Option<Nearest<'_>>) -> EmbedField {
    let station = match nearest {
        Some(n) => format!("> {}\n> {}m", n.name, n.meters.round() as i64),
        None => "> unavailable".to_string(),
    };
    EmbedField {
        name: "Location".to_string(),
        value: format!(
            ":map: **Address:**\n> {}\n> {} {}\n> SINGAPORE {}\n:station: **Nearest MRT:**\n{station}",
            place.building, place.block, place.road, place.postal,
        ),
        inline: false,
    }
}

// src/hires.rs
//! Pick out hires that have not been announced yet. Pure: no I/O, the seen
//! set is only read.

use anyhow::{Context, Result};

use crate::portal::{HireRecord, JobDetail};
use crate::seen::SeenSet;

#[derive(Debug, Clone, PartialEq)]
pub struct NewHire<'a> {
    /// 1-based position in the portal's hired array, unaffected by filtering.
    pub position: usize,
    pub id: i64,
    pub record: &'a HireRecord,
}

/// Result of scanning a job's hired list. Only `New` warrants a notification.
#[derive(Debug, Clone, PartialEq)]
pub enum HireScan<'a> {
    /// The portal reports no hires for the job.
    NoHires,
    /// Every hire was announced on an earlier run.
    AllSeen,
    New(Vec<NewHire<'a>>),
}

impl<'a> HireScan<'a> {
    pub fn into_new(self) -> Vec<NewHire<'a>> {
        match self {
            HireScan::New(hires) => hires,
            HireScan::NoHires | HireScan::AllSeen => Vec::new(),
        }
    }
}

/// Hires of `job` whose IDs are not in `seen`, in portal order.
pub fn detect_new_hires<'a>(job: &'a JobDetail, seen: &SeenSet) -> Result<HireScan<'a>> {
    if job.dashboard.hired_applns == 0 {
        return Ok(HireScan::NoHires);
    }

    let mut fresh = Vec::new();
    for (i, record) in job.dashboard.hired_applns_array.iter().enumerate() {
        let id = record
            .applicant_id()
            .with_context(|| format!("hire #{} of job {}", i + 1, job.id))?;
        if seen.contains(id) {
            continue;
        }
        fresh.push(NewHire {
            position: i + 1,
            id,
            record,
        });
    }
    if fresh.is_empty() {
        return Ok(HireScan::AllSeen);
    }
    Ok(HireScan::New(fresh))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::parse_job_detail;

    fn job() -> JobDetail {
        parse_job_detail("63a0", include_str!("../tests/fixtures/job_detail.json")).unwrap()
    }

    #[test]
    fn all_new_hires_keep_positions() {
        let job = job();
        let hires = detect_new_hires(&job, &SeenSet::new()).unwrap().into_new();
        let got: Vec<_> = hires.iter().map(|h| (h.position, h.id)).collect();
        assert_eq!(got, vec![(1, 2201001), (2, 2201002)]);
    }

    #[test]
    fn seen_hires_are_dropped_but_numbering_is_stable() {
        let job = job();
        let seen: SeenSet = [2201001].into_iter().collect();
        let hires = detect_new_hires(&job, &seen).unwrap().into_new();
        assert_eq!(hires.len(), 1);
        assert_eq!(hires[0].position, 2);
        assert_eq!(hires[0].id, 2201002);
        assert_eq!(hires[0].record.applicant_profile.first_name, "Nur Aisyah");
    }

    #[test]
    fn everything_seen_yields_nothing() {
        let job = job();
        let seen: SeenSet = [2201001, 2201002].into_iter().collect();
        assert_eq!(detect_new_hires(&job, &seen).unwrap(), HireScan::AllSeen);
    }

    #[test]
    fn zero_hired_count_short_circuits() {
        let mut job = job();
        job.dashboard.hired_applns = 0;
        assert_eq!(detect_new_hires(&job, &SeenSet::new()).unwrap(), HireScan::NoHires);
    }
}

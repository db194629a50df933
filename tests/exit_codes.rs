// tests/exit_codes.rs
// Failures coming out of a run, mapped to exit codes and operator hints.
mod common;

use async_trait::async_trait;
use common::*;
use intern_watch::exit::{exit_code, FailureKind, EXIT_FAILURE, EXIT_OK};
use intern_watch::portal::{FeedError, JobDetail, JobSummary, Portal, PortalClient};
use intern_watch::{run_once, SeenStore, Services};

struct ExpiredSession;

#[async_trait]
impl Portal for ExpiredSession {
    async fn list_jobs(&self) -> Result<Vec<JobSummary>, FeedError> {
        Err(FeedError::Unauthorized)
    }

    async fn job_detail(&self, job_id: &str) -> Result<JobDetail, FeedError> {
        Err(FeedError::MissingDetail {
            job_id: job_id.to_string(),
        })
    }
}

async fn run_with(portal: &dyn Portal) -> anyhow::Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let path = seen_file(dir.path(), &[]);
    let geocoder = FakeGeocoder::office();
    let publisher = RecordingPublisher::new();
    let services = Services {
        portal,
        geocoder: &geocoder,
        publisher: &publisher,
    };
    let mut seen = SeenStore::open(&path).unwrap();
    run_once(&services, &stations(), &mut seen, &settings()).await?;
    Ok(())
}

#[tokio::test]
async fn clean_run_exits_zero() {
    let portal = FakePortal::new().with_job("idle", 0, None);
    let result = run_with(&portal).await;
    assert_eq!(exit_code(&result), EXIT_OK);
}

#[tokio::test]
async fn expired_cookie_exits_one_with_cookie_hint() {
    let result = run_with(&ExpiredSession).await;
    assert_eq!(exit_code(&result), EXIT_FAILURE);
    let kind = FailureKind::of(result.as_ref().unwrap_err());
    assert_eq!(kind, FailureKind::Auth);
    assert!(kind.hint().unwrap().contains("auth cookie"));
}

#[tokio::test]
async fn unreachable_portal_exits_one_with_network_hint() {
    // bind then release a port so nothing is listening on it
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let portal = PortalClient::new(&format!("http://{addr}/api/v1"), "connect.sid=x".into());

    let result = run_with(&portal).await;
    assert_eq!(exit_code(&result), EXIT_FAILURE);
    assert_eq!(FailureKind::of(result.as_ref().unwrap_err()), FailureKind::Network);
}

#[tokio::test]
async fn failure_inside_a_job_keeps_its_context_and_exits_one() {
    // detail missing for a job with applications
    let portal = FakePortal::new().with_job("ghost", 2, None);
    let result = run_with(&portal).await;
    assert_eq!(exit_code(&result), EXIT_FAILURE);
    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("processing job ghost"));
    assert_eq!(FailureKind::of(&err), FailureKind::Other);
    assert!(err.downcast_ref::<FeedError>().is_some());
}

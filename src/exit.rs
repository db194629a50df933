// src/exit.rs
//! How a finished run maps onto the process exit code and the one-line hint
//! printed for operators.

use crate::portal::FeedError;

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The portal rejected the session cookie.
    Auth,
    /// A remote service could not be reached or timed out.
    Network,
    Other,
}

impl FailureKind {
    pub fn of(err: &anyhow::Error) -> Self {
        if matches!(err.downcast_ref::<FeedError>(), Some(FeedError::Unauthorized)) {
            return FailureKind::Auth;
        }
        let network = err.chain().any(|cause| {
            cause
                .downcast_ref::<reqwest::Error>()
                .is_some_and(|e| e.is_connect() || e.is_timeout())
        });
        if network {
            FailureKind::Network
        } else {
            FailureKind::Other
        }
    }

    pub fn hint(self) -> Option<&'static str> {
        match self {
            FailureKind::Auth => {
                Some("No jobs found. Please check your portal auth cookie and try again.")
            }
            FailureKind::Network => {
                Some("There was a problem reaching a remote service. Please try again later.")
            }
            FailureKind::Other => None,
        }
    }
}

pub fn exit_code<T>(result: &anyhow::Result<T>) -> u8 {
    match result {
        Ok(_) => EXIT_OK,
        Err(_) => EXIT_FAILURE,
    }
}

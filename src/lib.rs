// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod exit;
pub mod geo;
pub mod geocode;
pub mod hires;
pub mod lock;
pub mod metrics;
pub mod notify;
pub mod pipeline;
pub mod portal;
pub mod seen;
pub mod stations;

mod fsio;

// ---- Re-exports for stable public API ----
pub use crate::config::{Credentials, Settings};
pub use crate::pipeline::{run_once, RunSummary, Services};
pub use crate::portal::FeedError;
pub use crate::seen::{SeenSet, SeenStore};
pub use crate::stations::StationTable;

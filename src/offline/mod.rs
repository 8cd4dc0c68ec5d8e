//! Offline support: precache on install, purge old versions on activate,
//! cache-first fetch with a network fallback.

pub mod cache;
pub mod service;
pub mod worker;

pub use cache::Request;
pub use service::{Fetched, OfflineService};
pub use worker::{HttpNetwork, Network, OfflineWorker};

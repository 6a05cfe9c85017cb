// src/core/mod.rs
//! Remote service access used by the view controller

pub mod backend;
pub mod service_client;

pub use backend::{JobsBackend, ScrapeRequest};
pub use service_client::ServiceClient;

// src/core/backend.rs
//! The seam between the view controller and the remote services

use async_trait::async_trait;

use crate::config::ScrapeSettings;
use crate::error::ViewError;
use crate::types::{JobDetail, JobSummary};

/// Parameters for a manual scrape trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub source: String,
    pub max_results: u32,
    pub max_job_age_days: u32,
}

impl From<&ScrapeSettings> for ScrapeRequest {
    fn from(settings: &ScrapeSettings) -> Self {
        Self {
            source: settings.source.clone(),
            max_results: settings.max_results,
            max_job_age_days: settings.max_job_age_days,
        }
    }
}

#[async_trait]
pub trait JobsBackend: Send + Sync {
    /// `GET /jobs/recent?days=N`
    async fn recent_jobs(&self, days: u32) -> Result<Vec<JobSummary>, ViewError>;

    /// `GET /jobs/{id}`
    async fn job_detail(&self, id: i64) -> Result<JobDetail, ViewError>;

    /// `POST /scraper/trigger/{source}`; the response body is ignored.
    async fn trigger_scrape(&self, request: &ScrapeRequest) -> Result<(), ViewError>;
}

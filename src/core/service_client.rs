// src/core/service_client.rs
//! HTTP client for the Jobs API and the scraper service

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::ViewConfig;
use crate::core::backend::{JobsBackend, ScrapeRequest};
use crate::error::ViewError;
use crate::types::{JobDetail, JobSummary};

const RECENT_JOBS_ENDPOINT: &str = "/jobs/recent";
const JOB_ENDPOINT: &str = "/jobs";
const SCRAPER_TRIGGER_ENDPOINT: &str = "/scraper/trigger";

pub struct ServiceClient {
    client: reqwest::Client,
    api_base_url: String,
    scraper_base_url: String,
}

impl ServiceClient {
    pub fn new(api_base_url: String, scraper_base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_base_url,
            scraper_base_url,
        })
    }

    pub fn from_config(config: &ViewConfig) -> Result<Self> {
        Self::new(
            config.api_base_url.clone(),
            config.scraper_base_url.clone(),
            config.timings.request_timeout(),
        )
    }

    pub fn recent_jobs_url(&self, days: u32) -> String {
        format!("{}{}?days={}", self.api_base_url, RECENT_JOBS_ENDPOINT, days)
    }

    pub fn job_url(&self, id: i64) -> String {
        format!("{}{}/{}", self.api_base_url, JOB_ENDPOINT, id)
    }

    pub fn scrape_url(&self, request: &ScrapeRequest) -> String {
        format!(
            "{}{}/{}?maxResults={}&maxJobAgeDays={}",
            self.scraper_base_url,
            SCRAPER_TRIGGER_ENDPOINT,
            request.source,
            request.max_results,
            request.max_job_age_days
        )
    }

    async fn get_json<R>(&self, url: &str) -> Result<R, ViewError>
    where
        R: DeserializeOwned,
    {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            ViewError::Network(e.to_string())
        })?;

        let response = ensure_success(url, response).await?;

        // Read the body first so malformed JSON is reported as a parse failure.
        let body = response
            .text()
            .await
            .map_err(|e| ViewError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse response from {}: {}", url, e);
            ViewError::from(e)
        })
    }
}

async fn ensure_success(url: &str, response: Response) -> Result<Response, ViewError> {
    let status = response.status();
    debug!("Response status from {}: {}", url, status);

    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    error!("{} returned error status {}: {}", url, status, error_text);
    Err(ViewError::http(status.as_u16(), error_text))
}

#[async_trait]
impl JobsBackend for ServiceClient {
    async fn recent_jobs(&self, days: u32) -> Result<Vec<JobSummary>, ViewError> {
        let url = self.recent_jobs_url(days);
        info!("Loading jobs from the last {} days", days);

        let jobs: Vec<JobSummary> = self.get_json(&url).await?;
        info!("Loaded {} jobs", jobs.len());
        Ok(jobs)
    }

    async fn job_detail(&self, id: i64) -> Result<JobDetail, ViewError> {
        let url = self.job_url(id);
        info!("Loading job detail: {}", id);
        self.get_json(&url).await
    }

    async fn trigger_scrape(&self, request: &ScrapeRequest) -> Result<(), ViewError> {
        let url = self.scrape_url(request);
        info!("Triggering {} scrape: {}", request.source, url);

        let response = self.client.post(&url).send().await.map_err(|e| {
            error!("Scrape trigger to {} failed: {}", url, e);
            ViewError::Network(e.to_string())
        })?;

        ensure_success(&url, response).await?;
        info!("Scrape trigger accepted for {}", request.source);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer a single request on a local port with a 200 and `body`; returns the base URL.
    async fn serve_once(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 2048];
            let _ = socket.read(&mut request).await;

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}/api", addr)
    }

    fn local_client(base: String) -> ServiceClient {
        ServiceClient::new(base.clone(), base, Duration::from_secs(5)).unwrap()
    }

    fn client() -> ServiceClient {
        ServiceClient::new(
            "http://localhost:8082/api".to_string(),
            "http://scraper:8081/api".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let client = client();
        assert_eq!(
            client.recent_jobs_url(7),
            "http://localhost:8082/api/jobs/recent?days=7"
        );
        assert_eq!(client.job_url(42), "http://localhost:8082/api/jobs/42");

        let request = ScrapeRequest {
            source: "linkedin".to_string(),
            max_results: 10,
            max_job_age_days: 1,
        };
        assert_eq!(
            client.scrape_url(&request),
            "http://scraper:8081/api/scraper/trigger/linkedin?maxResults=10&maxJobAgeDays=1"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_failure() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = ServiceClient::new(
            "http://127.0.0.1:9/api".to_string(),
            "http://127.0.0.1:9/api".to_string(),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client.recent_jobs(7).await.unwrap_err();
        assert!(err.is_network_like());
    }

    #[tokio::test]
    async fn test_non_json_body_is_parse_failure() {
        let client = local_client(serve_once("<html>maintenance</html>").await);

        let err = client.recent_jobs(7).await.unwrap_err();
        assert!(matches!(err, ViewError::Parse(_)), "got {:?}", err);
        assert!(err.is_network_like());
    }

    #[tokio::test]
    async fn test_detail_missing_url_is_parse_failure() {
        let client = local_client(serve_once(r#"{"id": 3, "title": "Engineer"}"#).await);

        let err = client.job_detail(3).await.unwrap_err();
        assert!(matches!(err, ViewError::Parse(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_well_formed_body_parses() {
        let client = local_client(
            serve_once(r#"[{"id": 1, "title": "Engineer", "source": {"name": "LinkedIn"}}]"#).await,
        );

        let jobs = client.recent_jobs(7).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].source_name(), Some("LinkedIn"));
    }
}

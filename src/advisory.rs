//! # advisory: interface to the remote recommendation and clinical-report services
//!
//! This module defines a single trait ([`AdvisoryClient`]) plus the wire
//! types for the two advisory endpoints the dashboard consumes: a
//! recommendation engine fed the raw dataset content, and a clinical-report
//! generator fed summary statistics of a completed run.
//!
//! ## Interface & Extensibility
//! - Implement [`AdvisoryClient`] to create new advisory backends.
//! - Both methods are async and have exactly one success or one failure
//!   outcome; there are no partial results and no retries.
//! - All transport failures surface as [`TransportError`] so callers can
//!   match on the failure kind.
//!
//! ## Mocking & Testing
//! The trait is annotated for `mockall`, so consumers can generate
//! deterministic mocks for unit/integration tests (gated behind the
//! `test-export-mocks` feature, on by default).
//!
//! The production implementation is [`HttpAdvisoryClient`]: JSON bodies over
//! HTTP POST to the configured endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::config::AdvisoryConfig;

/// Summary statistics of a completed run, posted to the clinical-report
/// endpoint. Field names on the wire follow the endpoint contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClinicalSummary {
    #[serde(rename = "n_samples")]
    pub sample_count: u64,
    pub accuracy: f64,
    pub sensitivity: f64,
    pub specificity: f64,
}

#[derive(Debug, Serialize)]
struct RecommendRequest<'a> {
    dataset: &'a str,
}

#[derive(Debug, Deserialize)]
struct RecommendResponse {
    recommendations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ClinicalReportResponse {
    report: String,
}

/// Transport-level failure of an advisory call: endpoint unreachable,
/// non-success status, or a body that is not the documented JSON.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("advisory endpoint unreachable: {0}")]
    Http(#[from] reqwest::Error),
    #[error("advisory endpoint returned status {0}")]
    Status(u16),
    #[error("advisory response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Trait for fetching advisory artifacts derived from the current pipeline
/// state. Implemented by the HTTP client and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait AdvisoryClient: Send + Sync {
    /// Request tuning recommendations for the given raw dataset content.
    async fn fetch_recommendations<'a>(
        &self,
        dataset: &'a str,
    ) -> Result<Vec<String>, TransportError>;

    /// Request the clinical narrative for a completed evaluation run.
    async fn fetch_clinical_report(
        &self,
        summary: ClinicalSummary,
    ) -> Result<String, TransportError>;
}

/// Concrete advisory client speaking JSON over HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpAdvisoryClient {
    http: reqwest::Client,
    recommend_url: String,
    clinical_report_url: String,
}

impl HttpAdvisoryClient {
    pub fn new(config: &AdvisoryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            recommend_url: config.recommend_url.clone(),
            clinical_report_url: config.clinical_report_url.clone(),
        }
    }

    async fn post_json<B>(&self, url: &str, body: &B) -> Result<String, TransportError>
    where
        B: Serialize + Sync,
    {
        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            error!(status = %status, url, "Advisory endpoint returned error status");
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(text)
    }
}

#[async_trait]
impl AdvisoryClient for HttpAdvisoryClient {
    async fn fetch_recommendations<'a>(
        &self,
        dataset: &'a str,
    ) -> Result<Vec<String>, TransportError> {
        info!(
            url = %self.recommend_url,
            dataset_bytes = dataset.len(),
            "Requesting recommendations"
        );
        let text = self
            .post_json(&self.recommend_url, &RecommendRequest { dataset })
            .await?;
        let body: RecommendResponse = serde_json::from_str(&text)?;
        info!(count = body.recommendations.len(), "Recommendations received");
        Ok(body.recommendations)
    }

    async fn fetch_clinical_report(
        &self,
        summary: ClinicalSummary,
    ) -> Result<String, TransportError> {
        info!(
            url = %self.clinical_report_url,
            samples = summary.sample_count,
            "Requesting clinical report"
        );
        let text = self.post_json(&self.clinical_report_url, &summary).await?;
        let body: ClinicalReportResponse = serde_json::from_str(&text)?;
        info!(report_bytes = body.report.len(), "Clinical report received");
        Ok(body.report)
    }
}

// src/web/types.rs

use chrono::Utc;
use rocket::serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::types::{ExtractionOutcome, JobRecord};

pub const FALLBACK_WARNING: &str = "Used fallback data due to extraction error";

#[derive(Debug, Default, Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase", default)]
pub struct ScrapeRequest {
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub company_name: Option<String>,
}

impl ScrapeRequest {
    /// The URL, or `None` when absent or blank.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ScrapeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub data: JobRecord,
}

impl From<ExtractionOutcome> for ScrapeResponse {
    fn from(outcome: ExtractionOutcome) -> Self {
        let warning = outcome.is_degraded().then(|| FALLBACK_WARNING.to_string());
        Self {
            success: true,
            warning,
            data: outcome.into_record(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, error_code: &str, suggestions: &[&str]) -> Self {
        Self {
            success: false,
            error: error.into(),
            error_code: error_code.to_string(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn missing_url() -> Self {
        Self::new(
            "URL is required",
            "MISSING_URL",
            &["Send a JSON body with a \"url\" field"],
        )
    }
}

impl From<&PipelineError> for ErrorResponse {
    fn from(error: &PipelineError) -> Self {
        match error {
            PipelineError::Validation(message) => Self::new(
                message.clone(),
                error.code(),
                &["Provide an absolute URL such as https://example.com/jobs/123"],
            ),
            PipelineError::Acquisition(cause) => Self::new(
                format!("Scraping failed: {}", cause),
                error.code(),
                &[
                    "Check that the page is publicly reachable",
                    "Try again in a few moments",
                ],
            ),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Job Scraper API is running".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct EndpointListing {
    pub message: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct EndpointInfo {
    pub name: String,
    pub route: String,
}

// src/types/payload.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::job_record::JobRecord;

/// Rendered page content, reduced to the region most likely to hold the job body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedPayload {
    pub url: String,
    pub title: String,
    pub reduced_html: String,
    pub full_html: String,
    /// Visible text with scripts and styles stripped. Empty on a blank page.
    pub text: String,
    pub captured_at: DateTime<Utc>,
}

impl ScrapedPayload {
    /// Payload carrying only the source URL, for callers that still want a
    /// fallback record after acquisition failed.
    pub fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: String::new(),
            reduced_html: String::new(),
            full_html: String::new(),
            text: String::new(),
            captured_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    payload: ScrapedPayload,
    image_url: Option<String>,
    company_name: Option<String>,
}

impl ExtractionRequest {
    /// Blank hints are treated as absent.
    pub fn new(payload: ScrapedPayload, image_url: Option<&str>, company_name: Option<&str>) -> Self {
        Self {
            payload,
            image_url: non_blank(image_url),
            company_name: non_blank(company_name),
        }
    }

    pub fn payload(&self) -> &ScrapedPayload {
        &self.payload
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company_name.as_deref()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Result of the structuring stage. `Degraded` is a warning, not a failure.
#[derive(Debug, Clone)]
pub enum ExtractionOutcome {
    Success { data: JobRecord },
    Degraded { error_message: String, fallback: JobRecord },
}

impl ExtractionOutcome {
    pub fn record(&self) -> &JobRecord {
        match self {
            Self::Success { data } => data,
            Self::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn into_record(self) -> JobRecord {
        match self {
            Self::Success { data } => data,
            Self::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Degraded { error_message, .. } => Some(error_message),
        }
    }
}

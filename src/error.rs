// src/error.rs
//! Error taxonomy for the extraction pipeline

use std::time::Duration;
use thiserror::Error;

/// Errors returned to the caller of the pipeline. Structuring failures never
/// show up here; they are absorbed into a degraded outcome.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Acquisition(#[from] FetchError),
}

impl PipelineError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "INVALID_URL",
            Self::Acquisition(_) => "SCRAPING_ERROR",
        }
    }
}

/// Content acquisition failures. All of them are fatal for the request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Browser launch timeout after {0:?}")]
    LaunchTimeout(Duration),
    #[error("Failed to launch browser: {0}")]
    Launch(String),
    #[error("Navigation timeout of {0:?} exceeded")]
    NavigationTimeout(Duration),
    #[error("Navigation failed: {0}")]
    Navigation(String),
    #[error("Failed to capture page content: {0}")]
    Capture(String),
}

/// Raised by a browser session; the fetcher maps these onto `FetchError`.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("{0}")]
    Launch(String),
    #[error("{0}")]
    Navigation(String),
    #[error("{0}")]
    Page(String),
    #[error("{0}")]
    Close(String),
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,
    #[error("Generative API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Generative API returned error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Generative API response was blocked: {0}")]
    Blocked(String),
    #[error("Generative API returned no text")]
    EmptyResponse,
}

/// Everything that can go wrong between prompt and validated record.
#[derive(Debug, Error)]
pub enum StructuringError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),
    #[error("Model response is not valid job JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Model response is missing required fields: {0}")]
    Incomplete(String),
}

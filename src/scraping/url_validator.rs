// src/scraping/url_validator.rs
use serde::Serialize;
use url::Url;

const JOB_KEYWORDS: [&str; 7] = [
    "job", "career", "position", "hiring", "vacancy", "apply", "recruit",
];

pub const INVALID_URL_MESSAGE: &str = "Invalid URL format";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlValidation {
    pub url: String,
    pub valid: bool,
    pub likely_job_posting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Checks that `input` is an absolute URL and whether it looks like a job
/// posting. The keyword check is advisory and never rejects a URL.
pub fn validate_job_url(input: &str) -> UrlValidation {
    match Url::parse(input) {
        Ok(_) => {
            let lower = input.to_lowercase();
            UrlValidation {
                url: input.to_string(),
                valid: true,
                likely_job_posting: JOB_KEYWORDS.iter().any(|k| lower.contains(k)),
                error: None,
            }
        }
        Err(_) => UrlValidation {
            url: input.to_string(),
            valid: false,
            likely_job_posting: false,
            error: Some(INVALID_URL_MESSAGE.to_string()),
        },
    }
}

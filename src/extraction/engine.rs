// src/extraction/engine.rs
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::fallback::synthesize_fallback;
use super::generator::TextGenerator;
use super::prompt::{build_extraction_prompt, COMPANY_NAME_PLACEHOLDER};
use super::response::strip_code_fence;
use crate::error::StructuringError;
use crate::types::{ExtractionOutcome, ExtractionRequest, JobRecord};

/// Turns scraped text into a `JobRecord`. Never fails: any problem yields a
/// degraded outcome carrying the fallback record.
pub struct StructuringEngine {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl StructuringEngine {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub async fn extract(&self, request: &ExtractionRequest) -> ExtractionOutcome {
        info!("Starting AI extraction for {}", request.payload().url);

        match self.try_extract(request).await {
            Ok(data) => {
                info!("Successfully extracted job data: {}", data.title);
                ExtractionOutcome::Success { data }
            }
            Err(e) => {
                warn!("AI extraction failed, using fallback data: {}", e);
                ExtractionOutcome::Degraded {
                    error_message: e.to_string(),
                    fallback: synthesize_fallback(
                        request.payload(),
                        request.company_name(),
                        request.image_url(),
                    ),
                }
            }
        }
    }

    async fn try_extract(&self, request: &ExtractionRequest) -> Result<JobRecord, StructuringError> {
        let payload = request.payload();
        let prompt = build_extraction_prompt(&payload.text, &payload.url, request.company_name());
        debug!("Prompt built ({} chars)", prompt.chars().count());

        let response = timeout(self.timeout, self.generator.generate(&prompt))
            .await
            .map_err(|_| StructuringError::Timeout(self.timeout))??;

        let mut record = parse_job_record(&response)?;
        apply_request_hints(&mut record, request);

        let missing = record.missing_fields();
        if !missing.is_empty() {
            return Err(StructuringError::Incomplete(missing.join(", ")));
        }

        Ok(record)
    }
}

/// Parses a raw model answer, tolerating markdown fences around the JSON.
pub fn parse_job_record(response: &str) -> Result<JobRecord, StructuringError> {
    Ok(serde_json::from_str(strip_code_fence(response))?)
}

fn apply_request_hints(record: &mut JobRecord, request: &ExtractionRequest) {
    if record.apply_url.trim().is_empty() {
        record.apply_url = request.payload().url.clone();
    }

    if let Some(image_url) = request.image_url() {
        record.company_info.image_url = Some(image_url.to_string());
    }

    if let Some(company_name) = request.company_name() {
        let current = record.company_info.name.trim();
        if current.is_empty() || current == COMPANY_NAME_PLACEHOLDER {
            record.company_info.name = company_name.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_model_json, FakeGenerator, FakeReply};
    use crate::types::ScrapedPayload;

    const URL: &str = "https://example.com/jobs/42";

    fn request(company: Option<&str>, image: Option<&str>) -> ExtractionRequest {
        let payload = ScrapedPayload {
            title: "Engineer | Acme".to_string(),
            text: "We are hiring a Software Engineer.".to_string(),
            ..ScrapedPayload::empty(URL)
        };
        ExtractionRequest::new(payload, image, company)
    }

    fn engine(generator: FakeGenerator) -> (StructuringEngine, Arc<FakeGenerator>) {
        let generator = Arc::new(generator);
        (
            StructuringEngine::new(generator.clone(), Duration::from_millis(200)),
            generator,
        )
    }

    fn model_json_with(edit: impl FnOnce(&mut serde_json::Value)) -> String {
        let mut value: serde_json::Value = serde_json::from_str(&sample_model_json(URL)).unwrap();
        edit(&mut value);
        value.to_string()
    }

    #[tokio::test]
    async fn test_plain_json_succeeds() {
        let (engine, generator) = engine(FakeGenerator::replying(sample_model_json(URL)));

        let outcome = engine.extract(&request(None, None)).await;

        assert!(!outcome.is_degraded());
        assert_eq!(outcome.record().title, "Software Engineer");
        assert_eq!(generator.prompts().len(), 1);
        assert!(generator.prompts()[0].contains("We are hiring a Software Engineer."));
    }

    #[tokio::test]
    async fn test_fenced_json_is_parsed() {
        let fenced = format!("```json\n{}\n```", sample_model_json(URL));
        let (engine, _) = engine(FakeGenerator::replying(fenced));

        let outcome = engine.extract(&request(None, None)).await;

        assert!(!outcome.is_degraded(), "{:?}", outcome.error_message());
        assert_eq!(outcome.record().company_info.technologies, vec!["Rust", "Postgres"]);
    }

    #[tokio::test]
    async fn test_unparseable_text_degrades() {
        let (engine, _) = engine(FakeGenerator::replying("Sorry, I cannot help with that."));

        let outcome = engine.extract(&request(None, None)).await;

        match outcome {
            ExtractionOutcome::Degraded { error_message, fallback } => {
                assert!(error_message.contains("not valid job JSON"));
                assert_eq!(fallback.eligibility_criteria.len(), 1);
                assert_eq!(fallback.faqs.len(), 1);
                assert_eq!(fallback.title, "Engineer | Acme");
                assert_eq!(fallback.apply_url, URL);
            }
            other => panic!("expected degraded outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_placeholder_company_name_is_replaced() {
        let json = model_json_with(|v| v["companyInfo"]["name"] = "Company name".into());
        let (engine, _) = engine(FakeGenerator::replying(json));

        let outcome = engine.extract(&request(Some("Acme"), None)).await;

        assert!(!outcome.is_degraded());
        assert_eq!(outcome.record().company_info.name, "Acme");
    }

    #[tokio::test]
    async fn test_real_company_name_is_kept() {
        let json = model_json_with(|v| v["companyInfo"]["name"] = "Acme Corp Ltd".into());
        let (engine, _) = engine(FakeGenerator::replying(json));

        let outcome = engine.extract(&request(Some("Acme"), None)).await;
        assert_eq!(outcome.record().company_info.name, "Acme Corp Ltd");
    }

    #[tokio::test]
    async fn test_missing_apply_url_and_company_info_are_filled() {
        let json = model_json_with(|v| {
            let obj = v.as_object_mut().unwrap();
            obj.remove("applyUrl");
            obj.insert(
                "companyInfo".to_string(),
                serde_json::json!({ "technologies": ["Go"] }),
            );
        });
        let (engine, _) = engine(FakeGenerator::replying(json));

        let outcome = engine
            .extract(&request(Some("Acme"), Some("https://cdn.example.com/logo.png")))
            .await;

        assert!(!outcome.is_degraded(), "{:?}", outcome.error_message());
        let record = outcome.record();
        assert_eq!(record.apply_url, URL);
        assert_eq!(record.company_info.name, "Acme");
        assert_eq!(
            record.company_info.image_url.as_deref(),
            Some("https://cdn.example.com/logo.png")
        );
    }

    #[tokio::test]
    async fn test_empty_arrays_degrade() {
        let json = model_json_with(|v| v["faqs"] = serde_json::json!([]));
        let (engine, _) = engine(FakeGenerator::replying(json));

        let outcome = engine.extract(&request(None, None)).await;

        assert!(outcome.is_degraded());
        assert!(outcome.error_message().unwrap().contains("faqs"));
        assert!(outcome.record().is_complete());
    }

    #[tokio::test]
    async fn test_generator_error_degrades() {
        let (engine, _) = engine(FakeGenerator::new(vec![FakeReply::Error("quota".to_string())]));

        let outcome = engine.extract(&request(Some("Acme"), None)).await;

        assert!(outcome.is_degraded());
        assert!(outcome.error_message().unwrap().contains("quota"));
        assert_eq!(outcome.record().company_info.name, "Acme");
    }

    #[tokio::test]
    async fn test_slow_model_times_out_into_fallback() {
        let (engine, _) = engine(FakeGenerator::hanging());

        let outcome = engine.extract(&request(None, None)).await;

        assert!(outcome.is_degraded());
        assert!(outcome.error_message().unwrap().contains("timed out"));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(parse_job_record("\"just a sentence\"").is_err());
        assert!(parse_job_record("```json\n```").is_err());
        assert!(parse_job_record("").is_err());
    }
}

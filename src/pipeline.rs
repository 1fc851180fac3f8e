// src/pipeline.rs
use std::sync::Arc;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::error::PipelineError;
use crate::extraction::{GeneratorSettings, StructuringEngine, TextGenerator};
use crate::scraping::{validate_job_url, BrowserSettings, ContentFetcher, HeadlessBrowser};
use crate::types::{ExtractionOutcome, ExtractionRequest};

/// Validate, fetch, reduce and structure one job posting URL.
///
/// Clients are injected and owned by the caller. The pipeline holds no
/// mutable state, so one instance serves concurrent requests.
pub struct JobPipeline {
    fetcher: ContentFetcher,
    engine: StructuringEngine,
}

impl JobPipeline {
    pub fn new(
        browser: Arc<dyn HeadlessBrowser>,
        generator: Arc<dyn TextGenerator>,
        browser_settings: BrowserSettings,
        generator_settings: &GeneratorSettings,
    ) -> Self {
        Self {
            fetcher: ContentFetcher::new(browser, browser_settings),
            engine: StructuringEngine::new(generator, generator_settings.timeout()),
        }
    }

    pub async fn process(
        &self,
        url: &str,
        image_url: Option<&str>,
        company_name: Option<&str>,
    ) -> Result<ExtractionOutcome, PipelineError> {
        let span = tracing::info_span!("process", request_id = %Uuid::new_v4(), url = %url);
        self.run(url, image_url, company_name).instrument(span).await
    }

    async fn run(
        &self,
        url: &str,
        image_url: Option<&str>,
        company_name: Option<&str>,
    ) -> Result<ExtractionOutcome, PipelineError> {
        info!("New scraping request");
        if let Some(company) = company_name {
            info!("Company: {}", company);
        }
        if let Some(image) = image_url {
            info!("Image: {}", image);
        }

        let validation = validate_job_url(url);
        if !validation.valid {
            let message = validation.error.unwrap_or_else(|| "Invalid URL format".to_string());
            warn!("Rejected URL: {}", message);
            return Err(PipelineError::Validation(message));
        }
        if !validation.likely_job_posting {
            warn!("URL may not be a job posting");
        }

        let payload = self.fetcher.fetch(url).await?;

        let request = ExtractionRequest::new(payload, image_url, company_name);
        let outcome = self.engine.extract(&request).await;

        if outcome.is_degraded() {
            warn!("Returning fallback data");
        } else {
            info!("Successfully processed job posting");
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_model_json, FakeBrowser, FakeGenerator, FakePage};

    fn settings() -> BrowserSettings {
        BrowserSettings {
            launch_timeout_ms: 200,
            navigation_timeout_ms: 100,
            settle_delay_ms: 0,
            ..BrowserSettings::default()
        }
    }

    #[tokio::test]
    async fn test_invalid_url_skips_fetch() {
        let browser = Arc::new(FakeBrowser::new(FakePage::default()));
        let generator = Arc::new(FakeGenerator::replying("{}"));
        let pipeline = JobPipeline::new(
            browser.clone(),
            generator.clone(),
            settings(),
            &GeneratorSettings::default(),
        );

        let err = pipeline.process("not a url", None, None).await.unwrap_err();

        assert!(matches!(err, PipelineError::Validation(ref m) if m == "Invalid URL format"));
        assert_eq!(browser.launch_count(), 0);
        assert!(generator.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_non_job_url_is_still_processed() {
        let url = "https://example.com/blog/post";
        let browser = Arc::new(FakeBrowser::new(FakePage::new("Post", "<html></html>", "text")));
        let generator = Arc::new(FakeGenerator::replying(sample_model_json(url)));
        let pipeline = JobPipeline::new(browser.clone(), generator, settings(), &GeneratorSettings::default());

        let outcome = pipeline.process(url, None, None).await.unwrap();

        assert!(!outcome.is_degraded());
        assert_eq!(browser.close_count(), 1);
    }
}

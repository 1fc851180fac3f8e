// src/scraping/fetcher.rs
use chrono::Utc;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::browser::{BrowserSession, BrowserSettings, HeadlessBrowser, NavigateOptions, WaitUntil};
use super::reducer::reduce_html;
use crate::error::{BrowserError, FetchError};
use crate::types::ScrapedPayload;

/// Renders a URL in a fresh browser session and reduces it to a payload.
pub struct ContentFetcher {
    browser: Arc<dyn HeadlessBrowser>,
    settings: BrowserSettings,
}

impl ContentFetcher {
    pub fn new(browser: Arc<dyn HeadlessBrowser>, settings: BrowserSettings) -> Self {
        Self { browser, settings }
    }

    pub fn settings(&self) -> &BrowserSettings {
        &self.settings
    }

    pub async fn fetch(&self, url: &str) -> Result<ScrapedPayload, FetchError> {
        info!("Scraping URL: {}", url);

        let launch_timeout = self.settings.launch_timeout();
        let mut session = timeout(launch_timeout, self.browser.launch(&self.settings))
            .await
            .map_err(|_| FetchError::LaunchTimeout(launch_timeout))?
            .map_err(|e| FetchError::Launch(e.to_string()))?;

        debug!("Browser launched");

        let result = self.capture(session.as_mut(), url).await;

        // Dropping a stuck close still tears the session down through its Drop.
        let close_timeout = self.settings.close_timeout();
        match timeout(close_timeout, session.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to close browser session: {}", e),
            Err(_) => warn!("Browser session did not close within {:?}", close_timeout),
        }

        match &result {
            Ok(payload) => info!(
                "Successfully scraped: {} ({} chars of text)",
                payload.title,
                payload.text.chars().count()
            ),
            Err(e) => warn!("Scraping failed for {}: {}", url, e),
        }

        result
    }

    async fn capture(&self, session: &mut dyn BrowserSession, url: &str) -> Result<ScrapedPayload, FetchError> {
        let navigation_timeout = self.settings.navigation_timeout();
        let options = NavigateOptions {
            wait_until: WaitUntil::DomContentLoaded,
        };

        timeout(navigation_timeout, session.navigate(url, options))
            .await
            .map_err(|_| FetchError::NavigationTimeout(navigation_timeout))?
            .map_err(|e| FetchError::Navigation(e.to_string()))?;

        debug!("Page loaded, settling for {:?}", self.settings.settle_delay());
        tokio::time::sleep(self.settings.settle_delay()).await;

        let full_html = session.html().await.map_err(capture_error)?;
        let title = session.title().await.map_err(capture_error)?;
        let text = session.extract_text().await.map_err(capture_error)?;

        let reduced_html = reduce_html(&full_html);

        Ok(ScrapedPayload {
            url: url.to_string(),
            title,
            reduced_html,
            full_html,
            text: text.trim().to_string(),
            captured_at: Utc::now(),
        })
    }
}

fn capture_error(e: BrowserError) -> FetchError {
    FetchError::Capture(e.to_string())
}

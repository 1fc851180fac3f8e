// src/scraping/browser.rs
//! Headless browser capability and its Chromium implementation

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::Deserialize;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use tempfile::TempDir;

use crate::error::BrowserError;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const READY_STATE_POLL: Duration = Duration::from_millis(50);

// chromiumoxide's own launch deadline sits past the fetcher's, so expiry
// surfaces as a launch timeout rather than a websocket error.
const INNER_LAUNCH_TIMEOUT_MARGIN: Duration = Duration::from_secs(2);

const PROCESS_EXIT_WAIT: Duration = Duration::from_secs(3);

const PROFILE_PREFIX: &str = "job-scraper-";

// Runs after the HTML snapshot has been taken, so removing nodes is safe.
const VISIBLE_TEXT_SCRIPT: &str = r#"(() => {
    document.querySelectorAll('script, style, noscript').forEach(el => el.remove());
    return document.body ? document.body.innerText : '';
})()"#;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub executable_path: Option<PathBuf>,
    /// Parent of the per-launch profile directories. System temp by default.
    pub profile_root: Option<PathBuf>,
    pub headless: bool,
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub args: Vec<String>,
    pub launch_timeout_ms: u64,
    pub navigation_timeout_ms: u64,
    pub settle_delay_ms: u64,
    pub close_timeout_ms: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            executable_path: None,
            profile_root: None,
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            viewport_width: 1920,
            viewport_height: 1080,
            args: vec![
                "--no-sandbox".to_string(),
                "--disable-setuid-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--disable-gpu".to_string(),
            ],
            launch_timeout_ms: 10_000,
            navigation_timeout_ms: 15_000,
            settle_delay_ms: 1_000,
            close_timeout_ms: 5_000,
        }
    }
}

impl BrowserSettings {
    pub fn launch_timeout(&self) -> Duration {
        Duration::from_millis(self.launch_timeout_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn close_timeout(&self) -> Duration {
        Duration::from_millis(self.close_timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// Return as soon as the document has been parsed.
    DomContentLoaded,
    /// Wait for the load event.
    Load,
}

#[derive(Debug, Clone, Copy)]
pub struct NavigateOptions {
    pub wait_until: WaitUntil,
}

/// Starts isolated browser sessions. Implementations must not share state
/// (cookies, profile, cache) between sessions.
#[async_trait]
pub trait HeadlessBrowser: Send + Sync {
    async fn launch(&self, settings: &BrowserSettings) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// A single page in a freshly launched browser. `close` consumes the session
/// so it can only run once.
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str, options: NavigateOptions) -> Result<(), BrowserError>;
    async fn title(&mut self) -> Result<String, BrowserError>;
    async fn html(&mut self) -> Result<String, BrowserError>;
    async fn extract_text(&mut self) -> Result<String, BrowserError>;
    async fn close(self: Box<Self>) -> Result<(), BrowserError>;
}

/// Launches a local Chrome/Chromium through the DevTools protocol.
#[derive(Debug, Default, Clone)]
pub struct ChromiumBrowser;

impl ChromiumBrowser {
    pub fn new() -> Self {
        Self
    }

    fn create_profile_dir(settings: &BrowserSettings) -> Result<TempDir, BrowserError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(PROFILE_PREFIX);
        let dir = match &settings.profile_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        dir.map_err(|e| BrowserError::Launch(format!("Failed to create browser profile: {}", e)))
    }

    fn build_config(settings: &BrowserSettings, profile_dir: &TempDir) -> Result<BrowserConfig, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .viewport(Viewport {
                width: settings.viewport_width,
                height: settings.viewport_height,
                device_scale_factor: Some(1.0),
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            })
            .window_size(settings.viewport_width, settings.viewport_height)
            .user_data_dir(profile_dir.path())
            .launch_timeout(settings.launch_timeout() + INNER_LAUNCH_TIMEOUT_MARGIN)
            .args(settings.args.clone());

        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &settings.executable_path {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(BrowserError::Launch)
    }
}

#[async_trait]
impl HeadlessBrowser for ChromiumBrowser {
    async fn launch(&self, settings: &BrowserSettings) -> Result<Box<dyn BrowserSession>, BrowserError> {
        // Removed on drop, so a failed or cancelled launch leaves nothing behind.
        let profile_dir = Self::create_profile_dir(settings)?;
        let config = Self::build_config(settings, &profile_dir)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let mut session = ChromiumSession {
            browser,
            page: None,
            handler_task: Some(handler_task),
            profile_dir: Some(profile_dir),
        };

        match session.open_page(&settings.user_agent).await {
            Ok(()) => Ok(Box::new(session)),
            Err(e) => {
                if let Err(close_err) = Box::new(session).close().await {
                    warn!("Failed to close browser after page setup error: {}", close_err);
                }
                Err(e)
            }
        }
    }
}

pub struct ChromiumSession {
    browser: Browser,
    page: Option<Page>,
    handler_task: Option<JoinHandle<()>>,
    // Declared last so the directory outlives the browser process handle.
    profile_dir: Option<TempDir>,
}

impl ChromiumSession {
    async fn open_page(&mut self, user_agent: &str) -> Result<(), BrowserError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Launch(format!("Failed to create page: {}", e)))?;

        page.set_user_agent(user_agent)
            .await
            .map_err(|e| BrowserError::Launch(format!("Failed to set user agent: {}", e)))?;

        self.page = Some(page);
        Ok(())
    }

    fn page(&self) -> Result<&Page, BrowserError> {
        self.page
            .as_ref()
            .ok_or_else(|| BrowserError::Page("Browser page is not open".to_string()))
    }

    async fn ready_state(page: &Page) -> Result<String, BrowserError> {
        page.evaluate("document.readyState")
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?
            .into_value::<String>()
            .map_err(|e| BrowserError::Navigation(e.to_string()))
    }
}

/// Polls `ready_state` until it satisfies `wait_until`. Evaluation errors count
/// as "not ready": the old execution context disappears while a navigation
/// commits. The caller bounds the loop with its navigation timeout.
pub async fn wait_for_ready_state<F, Fut>(wait_until: WaitUntil, mut ready_state: F) -> String
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, BrowserError>>,
{
    loop {
        match ready_state().await {
            Ok(state) => {
                let ready = match wait_until {
                    WaitUntil::DomContentLoaded => state != "loading",
                    WaitUntil::Load => state == "complete",
                };
                if ready {
                    return state;
                }
            }
            Err(e) => debug!("readyState not available yet: {}", e),
        }
        tokio::time::sleep(READY_STATE_POLL).await;
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str, options: NavigateOptions) -> Result<(), BrowserError> {
        let response = self
            .page()?
            .execute(NavigateParams::new(url))
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;

        if let Some(error_text) = response.result.error_text.clone() {
            return Err(BrowserError::Navigation(error_text));
        }

        let page = self.page()?.clone();
        let state = wait_for_ready_state(options.wait_until, || Self::ready_state(&page)).await;
        debug!("Navigation reached readyState={}", state);
        Ok(())
    }

    async fn title(&mut self) -> Result<String, BrowserError> {
        let title = self
            .page()?
            .get_title()
            .await
            .map_err(|e| BrowserError::Page(e.to_string()))?;
        Ok(title.unwrap_or_default())
    }

    async fn html(&mut self) -> Result<String, BrowserError> {
        self.page()?
            .content()
            .await
            .map_err(|e| BrowserError::Page(e.to_string()))
    }

    async fn extract_text(&mut self) -> Result<String, BrowserError> {
        let text = self
            .page()?
            .evaluate(VISIBLE_TEXT_SCRIPT)
            .await
            .map_err(|e| BrowserError::Page(e.to_string()))?
            .into_value::<Option<String>>()
            .map_err(|e| BrowserError::Page(e.to_string()))?;
        Ok(text.unwrap_or_default())
    }

    async fn close(mut self: Box<Self>) -> Result<(), BrowserError> {
        self.page = None;

        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Close(e.to_string()));

        if let Err(e) = &closed {
            warn!("Graceful browser close failed, killing process: {}", e);
            if let Some(Err(kill_err)) = self.browser.kill().await {
                warn!("Failed to kill browser process: {}", kill_err);
            }
        }

        match tokio::time::timeout(PROCESS_EXIT_WAIT, self.browser.wait()).await {
            Ok(Err(e)) => warn!("Failed to reap browser process: {}", e),
            Err(_) => warn!("Browser process did not exit within {:?}", PROCESS_EXIT_WAIT),
            Ok(Ok(_)) => {}
        }

        if let Some(task) = self.handler_task.take() {
            task.abort();
        }

        if let Some(dir) = self.profile_dir.take() {
            if let Err(e) = dir.close() {
                debug!("Failed to remove browser profile: {}", e);
            }
        }

        closed
    }
}

// Covers futures dropped mid-flight. `Browser` kills its child process on
// drop and the `TempDir` removes the profile; the CDP handler task is ours.
impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
    }
}

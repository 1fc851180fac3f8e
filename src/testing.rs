// src/testing.rs
//! In-memory browser and text generator for exercising the pipeline without
//! launching Chrome or calling a model.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::{BrowserError, GenerationError};
use crate::extraction::generator::TextGenerator;
use crate::scraping::browser::{BrowserSession, BrowserSettings, HeadlessBrowser, NavigateOptions};

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Canned page served by every session of a `FakeBrowser`.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub title: String,
    pub html: String,
    pub text: String,
    pub navigation_delay: Option<Duration>,
    pub navigation_error: Option<String>,
    pub close_delay: Option<Duration>,
}

impl FakePage {
    pub fn new(title: &str, html: &str, text: &str) -> Self {
        Self {
            title: title.to_string(),
            html: html.to_string(),
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn with_navigation_delay(mut self, delay: Duration) -> Self {
        self.navigation_delay = Some(delay);
        self
    }

    pub fn with_navigation_error(mut self, message: &str) -> Self {
        self.navigation_error = Some(message.to_string());
        self
    }

    /// Makes `close` stall, like a browser that ignores the close command.
    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = Some(delay);
        self
    }
}

#[derive(Default)]
struct BrowserStats {
    launches: AtomicUsize,
    closes: AtomicUsize,
    navigations: Mutex<Vec<String>>,
}

pub struct FakeBrowser {
    page: FakePage,
    launch_delay: Option<Duration>,
    launch_error: Option<String>,
    stats: Arc<BrowserStats>,
}

impl FakeBrowser {
    pub fn new(page: FakePage) -> Self {
        Self {
            page,
            launch_delay: None,
            launch_error: None,
            stats: Arc::new(BrowserStats::default()),
        }
    }

    pub fn with_launch_delay(mut self, delay: Duration) -> Self {
        self.launch_delay = Some(delay);
        self
    }

    pub fn with_launch_error(mut self, message: &str) -> Self {
        self.launch_error = Some(message.to_string());
        self
    }

    pub fn launch_count(&self) -> usize {
        self.stats.launches.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.stats.closes.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> Vec<String> {
        locked(&self.stats.navigations).clone()
    }
}

#[async_trait]
impl HeadlessBrowser for FakeBrowser {
    async fn launch(&self, _settings: &BrowserSettings) -> Result<Box<dyn BrowserSession>, BrowserError> {
        if let Some(delay) = self.launch_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.launch_error {
            return Err(BrowserError::Launch(message.clone()));
        }

        self.stats.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            page: self.page.clone(),
            stats: self.stats.clone(),
        }))
    }
}

struct FakeSession {
    page: FakePage,
    stats: Arc<BrowserStats>,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &str, _options: NavigateOptions) -> Result<(), BrowserError> {
        locked(&self.stats.navigations).push(url.to_string());
        if let Some(delay) = self.page.navigation_delay {
            tokio::time::sleep(delay).await;
        }
        match &self.page.navigation_error {
            Some(message) => Err(BrowserError::Navigation(message.clone())),
            None => Ok(()),
        }
    }

    async fn title(&mut self) -> Result<String, BrowserError> {
        Ok(self.page.title.clone())
    }

    async fn html(&mut self) -> Result<String, BrowserError> {
        Ok(self.page.html.clone())
    }

    async fn extract_text(&mut self) -> Result<String, BrowserError> {
        Ok(self.page.text.clone())
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.page.close_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}

/// Scripted reply for `FakeGenerator`.
#[derive(Debug, Clone)]
pub enum FakeReply {
    Text(String),
    Error(String),
    Hang,
}

/// Replays queued replies in order; the last one repeats once the queue
/// is drained. Every prompt is recorded.
pub struct FakeGenerator {
    replies: Mutex<VecDeque<FakeReply>>,
    last: Mutex<Option<FakeReply>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn new(replies: Vec<FakeReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(vec![FakeReply::Text(text.into())])
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(vec![FakeReply::Error(message.into())])
    }

    pub fn hanging() -> Self {
        Self::new(vec![FakeReply::Hang])
    }

    pub fn prompts(&self) -> Vec<String> {
        locked(&self.prompts).clone()
    }

    fn next_reply(&self) -> Option<FakeReply> {
        let mut last = locked(&self.last);
        if let Some(reply) = locked(&self.replies).pop_front() {
            *last = Some(reply);
        }
        last.clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        locked(&self.prompts).push(prompt.to_string());

        match self.next_reply() {
            Some(FakeReply::Text(text)) => Ok(text),
            Some(FakeReply::Error(message)) => Err(GenerationError::Api {
                status: 500,
                body: message,
            }),
            Some(FakeReply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(GenerationError::EmptyResponse)
            }
            None => Err(GenerationError::EmptyResponse),
        }
    }
}

/// A complete model answer for a job posting, as the prompt asks for it.
pub fn sample_model_json(apply_url: &str) -> String {
    serde_json::json!({
        "title": "Software Engineer",
        "subtitle": "Build payment systems at scale",
        "postedDate": "2026-10-01",
        "postedBy": "Acme Careers",
        "location": "Bengaluru",
        "jobType": "Full-time",
        "applyUrl": apply_url,
        "fullDescription": "Work on the core payments platform.",
        "jobDetails": {
            "role": "Software Engineer",
            "category": "IT Services",
            "qualification": "Graduation",
            "batch": "2025/2026",
            "experience": "Freshers",
            "salary": "6 - 10 LPA",
            "lastDate": "ASAP"
        },
        "eligibilityCriteria": ["B.E/B.Tech in any stream", "Strong coding skills"],
        "responsibilities": [{ "task": "Ship features" }],
        "interviewTips": [{ "tip": "Practice data structures" }],
        "selectionProcess": [{ "stage": "Online test" }, { "stage": "Interview" }],
        "careerGrowth": {
            "description": "Clear path to senior roles",
            "futureRoles": ["Senior Engineer"]
        },
        "companyInfo": {
            "name": "Acme",
            "foundedYear": "1998",
            "employeeCount": "5000+",
            "about": "Acme builds things.",
            "technologies": ["Rust", "Postgres"]
        },
        "faqs": [{ "question": "Is it remote?", "answer": "No" }]
    })
    .to_string()
}

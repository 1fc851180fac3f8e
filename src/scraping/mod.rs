// src/scraping/mod.rs
//! Content acquisition: URL checks, browser rendering and HTML reduction

pub mod browser;
pub mod fetcher;
pub mod reducer;
pub mod url_validator;

pub use browser::{BrowserSession, BrowserSettings, ChromiumBrowser, HeadlessBrowser};
pub use fetcher::ContentFetcher;
pub use reducer::reduce_html;
pub use url_validator::{validate_job_url, UrlValidation};

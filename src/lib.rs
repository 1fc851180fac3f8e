//! Job posting URL to structured job record.
//!
//! A request is validated, rendered in a headless browser, reduced to the
//! relevant HTML, and structured by a generative model into a [`JobRecord`].
//! Model failures never surface as errors: they degrade to a deterministic
//! placeholder record.

pub mod cli;
pub mod core;
pub mod error;
pub mod extraction;
pub mod logging;
pub mod pipeline;
pub mod scraping;
pub mod testing;
pub mod types;
pub mod web;

pub use error::{FetchError, PipelineError, StructuringError};
pub use pipeline::JobPipeline;
pub use types::{ExtractionOutcome, JobRecord, ScrapedPayload};
pub use web::start_web_server;

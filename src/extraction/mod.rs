// src/extraction/mod.rs
//! Structuring: prompt, model call, response parsing and fallback records

pub mod engine;
pub mod fallback;
pub mod generator;
pub mod prompt;
pub mod response;

pub use engine::{parse_job_record, StructuringEngine};
pub use fallback::synthesize_fallback;
pub use generator::{GeminiClient, GeneratorSettings, TextGenerator};
pub use prompt::build_extraction_prompt;
pub use response::strip_code_fence;

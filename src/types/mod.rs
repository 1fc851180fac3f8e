// src/types/mod.rs
pub mod job_record;
pub mod payload;

pub use job_record::{
    CareerGrowth, CompanyInfo, Faq, InterviewTip, JobDetails, JobRecord, Responsibility,
    SelectionStage,
};
pub use payload::{ExtractionOutcome, ExtractionRequest, ScrapedPayload};

// src/extraction/fallback.rs
use chrono::{NaiveDate, Utc};

use crate::types::{
    CareerGrowth, CompanyInfo, Faq, InterviewTip, JobDetails, JobRecord, Responsibility,
    ScrapedPayload, SelectionStage,
};

const DEFAULT_TITLE: &str = "Job Opportunity";

/// Placeholder record built only from what is known locally. Always
/// satisfies the completeness rules of `JobRecord`.
pub fn synthesize_fallback(
    payload: &ScrapedPayload,
    company_name: Option<&str>,
    image_url: Option<&str>,
) -> JobRecord {
    synthesize_fallback_on(payload, company_name, image_url, Utc::now().date_naive())
}

pub fn synthesize_fallback_on(
    payload: &ScrapedPayload,
    company_name: Option<&str>,
    image_url: Option<&str>,
    today: NaiveDate,
) -> JobRecord {
    let title = match payload.title.trim() {
        "" => DEFAULT_TITLE.to_string(),
        t => t.to_string(),
    };

    JobRecord {
        title,
        subtitle: format!(
            "Exciting career opportunity at {}",
            company_name.unwrap_or("Top Company")
        ),
        posted_date: today.format("%Y-%m-%d").to_string(),
        posted_by: match company_name {
            Some(name) => format!("{} Careers", name),
            None => "Company Careers".to_string(),
        },
        location: "Not specified".to_string(),
        job_type: "Full-time".to_string(),
        apply_url: payload.url.clone(),
        full_description: "Please visit the job posting for full details.".to_string(),
        job_details: JobDetails {
            role: "Not specified".to_string(),
            category: "General".to_string(),
            qualification: "As per job requirements".to_string(),
            batch: "N/A".to_string(),
            experience: "Not specified".to_string(),
            salary: "Not disclosed".to_string(),
            last_date: "Not specified".to_string(),
        },
        eligibility_criteria: vec![
            "Please check the original posting for eligibility criteria".to_string(),
        ],
        responsibilities: vec![Responsibility {
            task: "As described in the job posting".to_string(),
        }],
        interview_tips: vec![
            InterviewTip {
                tip: format!("Research {} thoroughly", company_name.unwrap_or("the company")),
            },
            InterviewTip {
                tip: "Prepare for behavioral questions".to_string(),
            },
            InterviewTip {
                tip: "Review the job requirements carefully".to_string(),
            },
        ],
        selection_process: ["Application Review", "Interview", "Offer"]
            .into_iter()
            .map(|stage| SelectionStage {
                stage: stage.to_string(),
            })
            .collect(),
        career_growth: CareerGrowth {
            description: "Career growth opportunities available".to_string(),
            future_roles: vec!["Senior Role".to_string(), "Leadership Role".to_string()],
        },
        company_info: CompanyInfo {
            name: company_name.unwrap_or("Company").to_string(),
            founded_year: "Not specified".to_string(),
            employee_count: "Not specified".to_string(),
            about: format!(
                "Please visit the {} website for more information",
                company_name.unwrap_or("company")
            ),
            technologies: vec!["Various".to_string()],
            image_url: Some(image_url.unwrap_or_default().to_string()),
        },
        faqs: vec![Faq {
            question: "Where can I find more details?".to_string(),
            answer: "Please visit the original job posting URL".to_string(),
        }],
    }
}

// src/types/job_record.rs
//! Fixed output schema for a structured job posting

use serde::{Deserialize, Deserializer, Serialize};

// ===== Job Record =====

/// Structured job posting. Every array is expected to hold at least one
/// entry once the record leaves the extraction stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub subtitle: String,
    #[serde(deserialize_with = "lenient_string")]
    pub posted_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub posted_by: String,
    #[serde(deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(deserialize_with = "lenient_string")]
    pub job_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub apply_url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub full_description: String,
    pub job_details: JobDetails,
    pub eligibility_criteria: Vec<String>,
    pub responsibilities: Vec<Responsibility>,
    pub interview_tips: Vec<InterviewTip>,
    pub selection_process: Vec<SelectionStage>,
    pub career_growth: CareerGrowth,
    pub company_info: CompanyInfo,
    pub faqs: Vec<Faq>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobDetails {
    #[serde(deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(deserialize_with = "lenient_string")]
    pub qualification: String,
    #[serde(deserialize_with = "lenient_string")]
    pub batch: String,
    #[serde(deserialize_with = "lenient_string")]
    pub experience: String,
    #[serde(deserialize_with = "lenient_string")]
    pub salary: String,
    #[serde(deserialize_with = "lenient_string")]
    pub last_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Responsibility {
    #[serde(default, deserialize_with = "lenient_string")]
    pub task: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewTip {
    #[serde(default, deserialize_with = "lenient_string")]
    pub tip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionStage {
    #[serde(default, deserialize_with = "lenient_string")]
    pub stage: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CareerGrowth {
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    pub future_roles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub founded_year: String,
    #[serde(deserialize_with = "lenient_string")]
    pub employee_count: String,
    #[serde(deserialize_with = "lenient_string")]
    pub about: String,
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    #[serde(default, deserialize_with = "lenient_string")]
    pub question: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub answer: String,
}

impl JobRecord {
    /// Names of the fields that break the completeness rules, empty when the
    /// record is ready to hand out.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.apply_url.trim().is_empty() {
            missing.push("applyUrl");
        }
        if self.eligibility_criteria.is_empty() {
            missing.push("eligibilityCriteria");
        }
        if self.responsibilities.is_empty() {
            missing.push("responsibilities");
        }
        if self.interview_tips.is_empty() {
            missing.push("interviewTips");
        }
        if self.selection_process.is_empty() {
            missing.push("selectionProcess");
        }
        if self.career_growth.future_roles.is_empty() {
            missing.push("careerGrowth.futureRoles");
        }
        if self.company_info.technologies.is_empty() {
            missing.push("companyInfo.technologies");
        }
        if self.faqs.is_empty() {
            missing.push("faqs");
        }

        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

// Models regularly answer `"foundedYear": 1998` or `"salary": null`; keep
// those as text instead of rejecting the whole record.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

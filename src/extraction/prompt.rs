// src/extraction/prompt.rs
use chrono::{NaiveDate, Utc};

/// Characters of page text handed to the model.
pub const MAX_PROMPT_TEXT_CHARS: usize = 8000;

/// Placeholder company name in the schema template when none is supplied.
pub const COMPANY_NAME_PLACEHOLDER: &str = "Company name";

pub fn build_extraction_prompt(text: &str, url: &str, company_name: Option<&str>) -> String {
    build_extraction_prompt_on(text, url, company_name, Utc::now().date_naive())
}

/// Same as [`build_extraction_prompt`] with an explicit "today" for the
/// default posting date.
pub fn build_extraction_prompt_on(
    text: &str,
    url: &str,
    company_name: Option<&str>,
    today: NaiveDate,
) -> String {
    let company_context = match company_name {
        Some(name) => format!(
            "The company name is \"{}\". Use this to infer company details if not explicitly stated.",
            name
        ),
        None => String::new(),
    };
    let posted_by = company_name.unwrap_or("Company");
    let info_name = company_name.unwrap_or(COMPANY_NAME_PLACEHOLDER);
    let knowledge_subject = company_name.unwrap_or("the company");

    format!(
        r#"You are a job posting data extraction expert. Extract all relevant information from the following job posting and return it as a JSON object.

IMPORTANT: Return ONLY valid JSON, no explanations or markdown formatting outside the JSON.

{company_context}

Job Posting Content:
{content}

Source URL: {url}

Extract and structure the data in this EXACT format:
{{
  "title": "Full job title exactly as posted",
  "subtitle": "A catchy subtitle summarizing the opportunity",
  "postedDate": "YYYY-MM-DD format (use today's date if not found: {today})",
  "postedBy": "{posted_by} Careers",
  "location": "City name or 'Remote' or 'Pan India'",
  "jobType": "Full-time/Part-time/Contract/Internship",
  "applyUrl": "{url}",
  "fullDescription": "Comprehensive 2-3 sentence description of the role and opportunity",
  "jobDetails": {{
    "role": "Specific role title",
    "category": "Off Campus/On Campus/IT Services/Finance/etc",
    "qualification": "Required education (e.g., Graduation / Post Graduation)",
    "batch": "Target graduation year like '2024/2025' or 'N/A'",
    "experience": "Experience level (e.g., 'Freshers', '2-5 years')",
    "salary": "Salary range like '4 - 9 LPA' or 'Not disclosed'",
    "lastDate": "Application deadline or 'ASAP' or 'Not specified'"
  }},
  "eligibilityCriteria": [
    "Criterion 1",
    "Criterion 2"
  ],
  "responsibilities": [
    {{ "task": "Responsibility 1" }},
    {{ "task": "Responsibility 2" }}
  ],
  "interviewTips": [
    {{ "tip": "Helpful tip 1" }},
    {{ "tip": "Helpful tip 2" }}
  ],
  "selectionProcess": [
    {{ "stage": "Stage 1" }},
    {{ "stage": "Stage 2" }}
  ],
  "careerGrowth": {{
    "description": "Career progression opportunities at this company",
    "futureRoles": [
      "Next role 1",
      "Next role 2"
    ]
  }},
  "companyInfo": {{
    "name": "{info_name}",
    "foundedYear": "Year (e.g. 1998) or 'Not specified'",
    "employeeCount": "Number (e.g. 5000+) or 'Not specified'",
    "about": "2-3 sentence company description",
    "technologies": [
      "Tech 1",
      "Tech 2"
    ]
  }},
  "faqs": [
    {{
      "question": "Common question 1",
      "answer": "Detailed answer"
    }}
  ]
}}

GUIDELINES:
1. Extract actual information from the posting where available
2. For missing fields, provide reasonable defaults or industry-standard information based on the job title and company.
3. If the content is empty or blocked, use your knowledge about "{knowledge_subject}" and the job title to GENERATE plausible details.
4. Interview tips should be relevant to the specific role/company
5. Selection process should reflect typical hiring for this role
6. Career growth should be realistic based on the role level
7. All arrays should have at least 1 item
8. Dates should be in the specified formats
9. DO NOT include an "id" field
10. Return ONLY the JSON object, nothing else"#,
        content = truncate_chars(text, MAX_PROMPT_TEXT_CHARS),
        today = today.format("%Y-%m-%d"),
    )
}

/// Hard cut after `max` characters, never inside a UTF-8 sequence.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

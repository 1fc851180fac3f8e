// src/web/handlers/scrape_handlers.rs

use crate::error::PipelineError;
use crate::pipeline::JobPipeline;
use crate::web::types::{ErrorResponse, ScrapeRequest, ScrapeResponse};

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};

pub type ScrapeResult = Result<Json<ScrapeResponse>, (Status, Json<ErrorResponse>)>;

pub async fn scrape_handler(request: Json<ScrapeRequest>, pipeline: &State<JobPipeline>) -> ScrapeResult {
    let Some(url) = request.url() else {
        warn!("Scrape request without URL");
        return Err((Status::BadRequest, Json(ErrorResponse::missing_url())));
    };

    match pipeline
        .process(
            url,
            request.image_url.as_deref(),
            request.company_name.as_deref(),
        )
        .await
    {
        Ok(outcome) => {
            if let Some(message) = outcome.error_message() {
                warn!("Extraction degraded: {}", message);
            }
            Ok(Json(ScrapeResponse::from(outcome)))
        }
        Err(e) => {
            let status = match &e {
                PipelineError::Validation(_) => Status::BadRequest,
                PipelineError::Acquisition(_) => Status::InternalServerError,
            };
            if status == Status::BadRequest {
                info!("Rejected scrape request: {}", e);
            } else {
                error!("Scraping failed for {}: {}", url, e);
            }
            Err((status, Json(ErrorResponse::from(&e))))
        }
    }
}

// src/web/handlers/system_handlers.rs
use crate::web::types::{EndpointInfo, EndpointListing, HealthResponse};

use rocket::serde::json::Json;
use tracing::debug;

pub async fn health_handler() -> Json<HealthResponse> {
    debug!("Health check");
    Json(HealthResponse::ok())
}

pub async fn test_handler() -> Json<EndpointListing> {
    let endpoint = |name: &str, route: &str| EndpointInfo {
        name: name.to_string(),
        route: route.to_string(),
    };

    Json(EndpointListing {
        message: "API is working!".to_string(),
        endpoints: vec![
            endpoint("health", "GET /health"),
            endpoint(
                "scrape",
                "POST /api/scrape (body: { url, imageUrl?, companyName? })",
            ),
            endpoint("test", "GET /api/test"),
        ],
    })
}

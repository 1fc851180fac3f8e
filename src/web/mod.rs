// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::core::ServerSettings;
use crate::pipeline::JobPipeline;
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::info;

/// Adds CORS headers for the configured frontend origin.
pub struct Cors {
    origin: String,
}

impl Cors {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new(
            "Access-Control-Allow-Origin",
            self.origin.clone(),
        ));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[post("/scrape", data = "<request>")]
pub async fn scrape(request: Json<ScrapeRequest>, pipeline: &State<JobPipeline>) -> ScrapeResult {
    handlers::scrape_handler(request, pipeline).await
}

#[get("/health")]
pub async fn health() -> Json<HealthResponse> {
    handlers::health_handler().await
}

#[get("/test")]
pub async fn test_endpoint() -> Json<EndpointListing> {
    handlers::test_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Invalid request format",
        "BAD_REQUEST",
        &[
            "Check your request JSON format",
            "Send a JSON body with a \"url\" field",
        ],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable_entity() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Request body has the wrong shape",
        "UNPROCESSABLE_ENTITY",
        &["url, imageUrl and companyName must be strings"],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Internal server error",
        "INTERNAL_ERROR",
        &["Try again in a few moments"],
    ))
}

/// Assemble the server without launching it.
pub fn build_rocket(server: &ServerSettings, pipeline: JobPipeline) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("port", server.port))
        .merge(("address", server.address.clone()));

    rocket::custom(figment)
        .attach(Cors::new(server.frontend_url.clone()))
        .manage(pipeline)
        .register(
            "/",
            catchers![bad_request, unprocessable_entity, internal_error],
        )
        .mount("/", routes![health, options])
        .mount("/api", routes![scrape, health, test_endpoint])
}

pub async fn start_web_server(server: &ServerSettings, pipeline: JobPipeline) -> Result<()> {
    info!("Starting Job Scraper API server");
    info!("Health check: http://{}:{}/health", server.address, server.port);
    info!("Test endpoint: http://{}:{}/api/test", server.address, server.port);
    info!("CORS origin: {}", server.frontend_url);

    build_rocket(server, pipeline)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket server failed: {}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::GeneratorSettings;
    use crate::scraping::BrowserSettings;
    use crate::testing::{sample_model_json, FakeBrowser, FakeGenerator, FakePage};
    use rocket::http::ContentType;
    use rocket::local::asynchronous::Client;
    use rocket::serde::json::Value;
    use std::sync::Arc;
    use std::time::Duration;

    const JOB_URL: &str = "https://example.com/careers/rust-engineer";

    fn page() -> FakePage {
        FakePage::new(
            "Rust Engineer",
            "<html><body><main>Build things.</main></body></html>",
            "Rust Engineer at Acme. Build things.",
        )
    }

    async fn client_with(browser: Arc<FakeBrowser>, generator: Arc<FakeGenerator>) -> Client {
        let settings = BrowserSettings {
            launch_timeout_ms: 200,
            navigation_timeout_ms: 100,
            settle_delay_ms: 0,
            ..BrowserSettings::default()
        };
        let generator_settings = GeneratorSettings {
            timeout_secs: 1,
            ..GeneratorSettings::default()
        };
        let pipeline = JobPipeline::new(browser, generator, settings, &generator_settings);
        let server = ServerSettings {
            frontend_url: "http://localhost:5173".to_string(),
            ..ServerSettings::default()
        };
        Client::tracked(build_rocket(&server, pipeline))
            .await
            .expect("valid rocket instance")
    }

    async fn post_scrape(client: &Client, body: &str) -> (Status, Value) {
        let response = client
            .post("/api/scrape")
            .header(ContentType::JSON)
            .body(body)
            .dispatch()
            .await;
        let status = response.status();
        let json = response.into_json::<Value>().await.expect("json body");
        (status, json)
    }

    #[rocket::async_test]
    async fn test_health_on_both_paths() {
        let client = client_with(
            Arc::new(FakeBrowser::new(page())),
            Arc::new(FakeGenerator::replying("{}")),
        )
        .await;

        for path in ["/health", "/api/health"] {
            let response = client.get(path).dispatch().await;
            assert_eq!(response.status(), Status::Ok);
            let body = response.into_json::<Value>().await.unwrap();
            assert_eq!(body["status"], "ok");
            assert!(body["timestamp"].is_string());
        }
    }

    #[rocket::async_test]
    async fn test_missing_url_is_bad_request() {
        let browser = Arc::new(FakeBrowser::new(page()));
        let client = client_with(browser.clone(), Arc::new(FakeGenerator::replying("{}"))).await;

        let (status, body) = post_scrape(&client, r#"{"companyName": "Acme"}"#).await;

        assert_eq!(status, Status::BadRequest);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "URL is required");
        assert_eq!(browser.launch_count(), 0);
    }

    #[rocket::async_test]
    async fn test_invalid_url_is_bad_request() {
        let browser = Arc::new(FakeBrowser::new(page()));
        let client = client_with(browser.clone(), Arc::new(FakeGenerator::replying("{}"))).await;

        let (status, body) = post_scrape(&client, r#"{"url": "not a url"}"#).await;

        assert_eq!(status, Status::BadRequest);
        assert_eq!(body["error"], "Invalid URL format");
        assert_eq!(body["error_code"], "INVALID_URL");
        assert_eq!(browser.launch_count(), 0);
    }

    #[rocket::async_test]
    async fn test_successful_scrape() {
        let client = client_with(
            Arc::new(FakeBrowser::new(page())),
            Arc::new(FakeGenerator::replying(sample_model_json(JOB_URL))),
        )
        .await;

        let body = format!(
            r#"{{"url": "{}", "imageUrl": "https://cdn.example.com/logo.png"}}"#,
            JOB_URL
        );
        let (status, body) = post_scrape(&client, &body).await;

        assert_eq!(status, Status::Ok);
        assert_eq!(body["success"], true);
        assert!(body.get("warning").is_none());
        assert_eq!(body["data"]["title"], "Software Engineer");
        assert_eq!(
            body["data"]["companyInfo"]["imageUrl"],
            "https://cdn.example.com/logo.png"
        );
        assert!(body["data"].get("id").is_none());
    }

    #[rocket::async_test]
    async fn test_model_failure_returns_fallback_with_warning() {
        let client = client_with(
            Arc::new(FakeBrowser::new(page())),
            Arc::new(FakeGenerator::failing("quota exceeded")),
        )
        .await;

        let body = format!(r#"{{"url": "{}", "companyName": "Acme"}}"#, JOB_URL);
        let (status, body) = post_scrape(&client, &body).await;

        assert_eq!(status, Status::Ok);
        assert_eq!(body["success"], true);
        assert_eq!(body["warning"], FALLBACK_WARNING);
        assert_eq!(body["data"]["title"], "Rust Engineer");
        assert_eq!(body["data"]["companyInfo"]["name"], "Acme");
        assert_eq!(body["data"]["applyUrl"], JOB_URL);
    }

    #[rocket::async_test]
    async fn test_navigation_timeout_is_server_error() {
        let browser = Arc::new(FakeBrowser::new(
            page().with_navigation_delay(Duration::from_secs(5)),
        ));
        let client = client_with(browser.clone(), Arc::new(FakeGenerator::replying("{}"))).await;

        let body = format!(r#"{{"url": "{}"}}"#, JOB_URL);
        let (status, body) = post_scrape(&client, &body).await;

        assert_eq!(status, Status::InternalServerError);
        assert_eq!(body["success"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Scraping failed: "));
        assert_eq!(browser.close_count(), 1);
    }

    #[rocket::async_test]
    async fn test_malformed_body_uses_json_catcher() {
        let client = client_with(
            Arc::new(FakeBrowser::new(page())),
            Arc::new(FakeGenerator::replying("{}")),
        )
        .await;

        let (status, body) = post_scrape(&client, "not json").await;

        assert_eq!(status, Status::BadRequest);
        assert_eq!(body["error_code"], "BAD_REQUEST");
    }

    #[rocket::async_test]
    async fn test_preflight_and_cors_headers() {
        let client = client_with(
            Arc::new(FakeBrowser::new(page())),
            Arc::new(FakeGenerator::replying("{}")),
        )
        .await;

        let response = client.options("/api/scrape").dispatch().await;

        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            response.headers().get_one("Access-Control-Allow-Origin"),
            Some("http://localhost:5173")
        );
    }

    #[rocket::async_test]
    async fn test_endpoint_listing() {
        let client = client_with(
            Arc::new(FakeBrowser::new(page())),
            Arc::new(FakeGenerator::replying("{}")),
        )
        .await;

        let response = client.get("/api/test").dispatch().await;
        let body = response.into_json::<Value>().await.unwrap();

        assert_eq!(body["message"], "API is working!");
        assert_eq!(body["endpoints"].as_array().unwrap().len(), 3);
    }
}

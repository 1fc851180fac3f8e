// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::core::ConfigManager;
use crate::extraction::GeminiClient;
use crate::pipeline::JobPipeline;
use crate::scraping::{validate_job_url, ChromiumBrowser};
use crate::web::{start_web_server, ErrorResponse, ScrapeResponse};

#[derive(Parser)]
#[command(name = "job-scraper")]
#[command(about = "Turn job posting URLs into structured job records")]
pub struct Cli {
    /// YAML configuration file (defaults to ./config.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Scrape and structure one URL, printing the response JSON
    Extract {
        url: String,
        #[arg(long)]
        company_name: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Check a URL without fetching it
    Validate { url: String },
}

/// Wire the production browser and model client from configuration.
pub fn build_pipeline(config: &ConfigManager) -> Result<JobPipeline> {
    let generator =
        GeminiClient::new(&config.generator).context("Failed to build Gemini client")?;

    Ok(JobPipeline::new(
        Arc::new(ChromiumBrowser::new()),
        Arc::new(generator),
        config.browser.clone(),
        &config.generator,
    ))
}

/// Run a parsed command. Returns `false` when the command failed in a way
/// the process should report through its exit status.
pub async fn handle_command(command: Command, config: ConfigManager) -> Result<bool> {
    match command {
        Command::Serve => {
            config.report();
            let pipeline = build_pipeline(&config)?;
            start_web_server(&config.server, pipeline).await?;
            Ok(true)
        }
        Command::Extract {
            url,
            company_name,
            image_url,
        } => {
            let pipeline = build_pipeline(&config)?;
            let result = pipeline
                .process(&url, image_url.as_deref(), company_name.as_deref())
                .await;

            let (body, ok) = match result {
                Ok(outcome) => (
                    serde_json::to_string_pretty(&ScrapeResponse::from(outcome))?,
                    true,
                ),
                Err(e) => (
                    serde_json::to_string_pretty(&ErrorResponse::from(&e))?,
                    false,
                ),
            };
            println!("{}", body);
            Ok(ok)
        }
        Command::Validate { url } => {
            let validation = validate_job_url(&url);
            info!("Validated {}", url);
            println!("{}", serde_json::to_string_pretty(&validation)?);
            Ok(validation.valid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["job-scraper"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_extract_arguments() {
        let cli = Cli::try_parse_from([
            "job-scraper",
            "extract",
            "https://example.com/jobs/1",
            "--company-name",
            "Acme",
            "--config",
            "local.yaml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("local.yaml")));
        match cli.command {
            Some(Command::Extract {
                url,
                company_name,
                image_url,
            }) => {
                assert_eq!(url, "https://example.com/jobs/1");
                assert_eq!(company_name.as_deref(), Some("Acme"));
                assert!(image_url.is_none());
            }
            _ => panic!("expected extract"),
        }
    }

    #[tokio::test]
    async fn test_validate_reports_invalid_url() {
        let ok = handle_command(
            Command::Validate {
                url: "nope".to_string(),
            },
            ConfigManager::default(),
        )
        .await
        .unwrap();
        assert!(!ok);
    }
}

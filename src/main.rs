use anyhow::Result;
use clap::Parser;
use job_scraper::cli::{handle_command, Cli, Command};
use job_scraper::core::ConfigManager;
use job_scraper::logging;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = ConfigManager::load(cli.config.as_deref())?;
    logging::init(&config.logging)?;
    config.log_sources();

    let command = cli.command.unwrap_or(Command::Serve);
    if handle_command(command, config).await? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

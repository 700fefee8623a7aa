//! CLI command definitions and dispatch.

pub mod config;
pub mod scrape;
pub mod storage;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use subtrends_core::config::AppConfig;
use subtrends_core::error::AppError;

/// subtrends — scrape subreddit listings into Parquet datasets
#[derive(Debug, Parser)]
#[command(name = "subtrends", version, about, long_about = None)]
pub struct Cli {
    /// Configuration overlay name (merged over config/default.toml)
    #[arg(short, long, default_value = "default")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scrape the top listing of a subreddit
    Top(scrape::TopArgs),
    /// Scrape the hot listing of a subreddit
    Hot(scrape::HotArgs),
    /// Storage backend management
    Storage(storage::StorageArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, app_config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Top(args) => scrape::execute_top(args, app_config, self.format).await,
            Commands::Hot(args) => scrape::execute_hot(args, app_config, self.format).await,
            Commands::Storage(args) => storage::execute(args, app_config, self.format).await,
            Commands::Config(args) => config::execute(args, app_config, self.format).await,
        }
    }
}

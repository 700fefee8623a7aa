//! Configuration CLI commands.

use clap::{Args, Subcommand};

use crate::output::OutputFormat;
use subtrends_core::config::AppConfig;
use subtrends_core::error::AppError;

/// Arguments for configuration commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Configuration subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration (secrets redacted)
    Show,
}

/// Execute configuration commands
pub async fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let redacted = redact(config.clone());
            match format {
                OutputFormat::Table => {
                    let rendered = toml::to_string_pretty(&redacted).map_err(|e| {
                        AppError::internal(format!("Failed to render config: {e}"))
                    })?;
                    println!("{rendered}");
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&redacted)?);
                }
            }
            Ok(())
        }
    }
}

/// Blank out secret fields before printing
fn redact(mut config: AppConfig) -> AppConfig {
    if config.reddit.client_secret.is_some() {
        config.reddit.client_secret = Some("***".to_string());
    }
    if !config.storage.s3.secret_key.is_empty() {
        config.storage.s3.secret_key = "***".to_string();
    }
    if !config.storage.s3.access_key.is_empty() {
        config.storage.s3.access_key = "***".to_string();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_masks_secrets_only_when_present() {
        let mut config = AppConfig::default();
        config.reddit.client_secret = Some("hunter2".to_string());
        config.storage.s3.secret_key = "miniosecret".to_string();

        let redacted = redact(config);
        assert_eq!(redacted.reddit.client_secret.as_deref(), Some("***"));
        assert_eq!(redacted.storage.s3.secret_key, "***");
        assert!(redacted.storage.s3.access_key.is_empty());
    }
}

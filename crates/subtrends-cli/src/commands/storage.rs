//! Storage management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use subtrends_core::config::AppConfig;
use subtrends_core::config::storage::BackendKind;
use subtrends_core::error::AppError;
use subtrends_storage::backends::build_store;

/// Arguments for storage commands
#[derive(Debug, Args)]
pub struct StorageArgs {
    /// Storage subcommand
    #[command(subcommand)]
    pub command: StorageCommand,
}

/// Storage subcommands
#[derive(Debug, Subcommand)]
pub enum StorageCommand {
    /// Check backend connectivity
    Check {
        /// Storage backend (defaults to storage.default_backend)
        #[arg(short, long)]
        backend: Option<BackendKind>,
    },
    /// List stored batches
    List {
        /// Only list keys under this prefix
        #[arg(short, long, default_value = "")]
        prefix: String,
        /// Storage backend (defaults to storage.default_backend)
        #[arg(short, long)]
        backend: Option<BackendKind>,
    },
}

/// Stored batch display row
#[derive(Debug, Serialize, Tabled)]
struct ObjectRow {
    /// Object key
    key: String,
    /// Size
    size: String,
    /// Last modified (UTC)
    modified: String,
}

/// Execute storage commands
pub async fn execute(
    args: &StorageArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        StorageCommand::Check { backend } => {
            let kind = backend.unwrap_or(config.storage.default_backend);
            let store = build_store(&config.storage, kind).await?;

            if store.health_check().await? {
                output::print_success(&format!("{kind} storage is healthy"));
                Ok(())
            } else {
                output::print_error(&format!("{kind} storage is not reachable"));
                Err(AppError::storage(format!("{kind} storage failed health check")))
            }
        }
        StorageCommand::List { prefix, backend } => {
            let kind = backend.unwrap_or(config.storage.default_backend);
            let store = build_store(&config.storage, kind).await?;
            let objects = store.list(prefix).await?;

            let rows: Vec<ObjectRow> = objects
                .iter()
                .map(|o| ObjectRow {
                    key: o.key.clone(),
                    size: format_bytes(o.size_bytes),
                    modified: o
                        .last_modified
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                })
                .collect();

            output::print_list(&rows, format);
            Ok(())
        }
    }
}

/// Format bytes into a human-readable string
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_picks_sensible_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
    }
}

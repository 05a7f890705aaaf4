// storefront/src/main.rs

mod cli;
mod config;
mod errors;
mod services;
mod state;

use crate::cli::Cli;
use crate::config::{AppConfig, LogFormat};
use crate::errors::Result as AppResult;
use crate::state::AppState;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  // Allow RUST_LOG override, default to info
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .with_writer(std::io::stderr);
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Text => builder.init(),
  }
}

/// `--json-logs` wins; a config that failed to load logs as text.
fn log_format_for(json_logs: bool, config: &AppResult<AppConfig>) -> LogFormat {
  match config {
    _ if json_logs => LogFormat::Json,
    Ok(config) => config.log_format,
    Err(_) => LogFormat::Text,
  }
}

async fn run(cli: Cli) -> AppResult<()> {
  // Before the config check, so config errors reach the log.
  let config = AppConfig::from_env();
  init_tracing(log_format_for(cli.json_logs, &config));
  let config = config?;

  let state = AppState::build(config)?;
  cli.run(state).await
}

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();

  match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!(error = %e, "Command failed.");
      eprintln!("{e}");
      ExitCode::from(e.exit_code())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::errors::AppError;

  #[test]
  fn config_errors_still_get_a_log_format() {
    let failed: AppResult<AppConfig> = Err(AppError::Config("Missing environment variable".into()));
    assert_eq!(log_format_for(false, &failed), LogFormat::Text);
    assert_eq!(log_format_for(true, &failed), LogFormat::Json);

    let loaded = AppConfig::from_lookup(|name| match name {
      "STOREFRONT_API_URL" => Some("http://localhost:3000".to_string()),
      "STOREFRONT_LOG_FORMAT" => Some("json".to_string()),
      _ => None,
    });
    assert_eq!(log_format_for(false, &loaded), LogFormat::Json);
  }
}

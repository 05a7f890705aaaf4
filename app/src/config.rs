// storefront/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use checkout::DeliveryPricingTable;
use dotenvy::dotenv;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Text,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub api_url: String,
  pub customer_id: Option<String>,
  pub api_token: Option<String>,
  pub data_dir: PathBuf,
  pub http_timeout: Duration,
  pub pricing_file: Option<PathBuf>,
  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from any variable source.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let api_url = get("STOREFRONT_API_URL")
      .ok_or_else(|| AppError::Config("Missing environment variable 'STOREFRONT_API_URL'".to_string()))?
      .trim_end_matches('/')
      .to_string();
    if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
      return Err(AppError::Config(format!(
        "Invalid STOREFRONT_API_URL '{api_url}': expected an http(s) URL"
      )));
    }

    let http_timeout = match get("STOREFRONT_HTTP_TIMEOUT_SECS") {
      Some(raw) => raw
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| AppError::Config(format!("Invalid STOREFRONT_HTTP_TIMEOUT_SECS: {e}")))?,
      None => Duration::from_secs(10),
    };

    let log_format = match get("STOREFRONT_LOG_FORMAT").as_deref() {
      None | Some("text") => LogFormat::Text,
      Some("json") => LogFormat::Json,
      Some(other) => {
        return Err(AppError::Config(format!(
          "Invalid STOREFRONT_LOG_FORMAT '{other}': expected 'text' or 'json'"
        )))
      }
    };

    let config = Self {
      api_url,
      customer_id: get("STOREFRONT_CUSTOMER_ID"),
      api_token: get("STOREFRONT_API_TOKEN"),
      data_dir: get("STOREFRONT_DATA_DIR").map_or_else(|| PathBuf::from(".storefront"), PathBuf::from),
      http_timeout,
      pricing_file: get("STOREFRONT_PRICING_FILE").map(PathBuf::from),
      log_format,
    };
    tracing::debug!(api_url = %config.api_url, data_dir = %config.data_dir.display(), "Configuration loaded.");
    Ok(config)
  }

  /// The configured pricing table, or the standard one.
  pub fn pricing_table(&self) -> Result<DeliveryPricingTable> {
    match &self.pricing_file {
      Some(path) => load_pricing(path),
      None => Ok(DeliveryPricingTable::standard()),
    }
  }
}

fn load_pricing(path: &Path) -> Result<DeliveryPricingTable> {
  let raw = std::fs::read_to_string(path)
    .map_err(|e| AppError::Config(format!("Cannot read pricing file '{}': {e}", path.display())))?;
  serde_json::from_str(&raw).map_err(|e| AppError::Config(format!("Invalid pricing file '{}': {e}", path.display())))
}

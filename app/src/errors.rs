// storefront/src/errors.rs

use checkout::{CheckoutError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Invalid input: {0}")]
  Input(String),

  #[error(transparent)]
  Checkout(#[from] CheckoutError),

  #[error("I/O Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON Error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("HTTP client error: {0}")]
  Http(#[from] reqwest::Error),
}

impl From<ValidationError> for AppError {
  fn from(err: ValidationError) -> Self {
    AppError::Checkout(CheckoutError::Validation(err))
  }
}

impl AppError {
  /// Process exit code for the CLI.
  pub fn exit_code(&self) -> u8 {
    match self {
      AppError::Config(_) | AppError::Input(_) => 2,
      AppError::Checkout(CheckoutError::Validation(_)) => 3,
      AppError::Checkout(CheckoutError::IdentityRequired) => 4,
      AppError::Checkout(CheckoutError::Rejected(_)) => 5,
      _ => 1,
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;

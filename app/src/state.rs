// storefront/src/state.rs
use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::{HttpBackend, JsonFileStore};
use checkout::{CheckoutContext, CheckoutDeps, Identity, IdentityProvider, SessionIdentity, SystemClock};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub ctx: Arc<CheckoutContext>,
  pub api_url: String,
}

impl AppState {
  /// Wires the checkout context to the file store and the HTTP backend.
  pub fn build(config: AppConfig) -> Result<Self> {
    let identity = match (&config.customer_id, &config.api_token) {
      (Some(id), Some(token)) => Some(Identity::new(id.clone(), token.clone())),
      (Some(id), None) => {
        tracing::warn!(customer = %id, "No API token configured; backend requests go out unauthenticated.");
        Some(Identity::new(id.clone(), String::new()))
      }
      _ => None,
    };
    let identity: Arc<dyn IdentityProvider> = Arc::new(SessionIdentity::new(identity));
    let backend = Arc::new(HttpBackend::new(config.api_url.clone(), config.http_timeout, identity.clone())?);

    let store = JsonFileStore::new(config.data_dir.clone());
    tracing::debug!(data_dir = %store.root().display(), api_url = %config.api_url, "Checkout context wired.");

    let ctx = CheckoutContext::new(CheckoutDeps {
      identity,
      store: Arc::new(store),
      orders: backend.clone(),
      slots: backend,
      pricing: config.pricing_table()?,
      clock: Arc::new(SystemClock),
    })?;

    Ok(Self {
      ctx: Arc::new(ctx),
      api_url: config.api_url,
    })
  }
}

// storefront/src/services/http_backend.rs

//! Adapter from the checkout traits to the hosted JSON API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use checkout::backend::{OrderBackend, SlotBackend};
use checkout::submission::payload::{ErrorResponse, OrderCreatedResponse};
use checkout::{BackendError, Identity, IdentityProvider, OrderCreated, OrderPayload, SlotQueryResponse};
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::errors::Result;

#[derive(Clone)]
pub struct HttpBackend {
  client: Client,
  base_url: String,
  identity: Arc<dyn IdentityProvider>,
}

fn transport(err: reqwest::Error) -> BackendError {
  BackendError::Transport { source: err.into() }
}

fn decode(err: impl Into<anyhow::Error>) -> BackendError {
  BackendError::Decode { source: err.into() }
}

/// The server's `{error}` text when the body carries one, otherwise the
/// status' canonical reason.
fn rejection_message(status: StatusCode, body: &str) -> String {
  serde_json::from_str::<ErrorResponse>(body)
    .ok()
    .map(|e| e.error)
    .filter(|e| !e.trim().is_empty())
    .unwrap_or_else(|| {
      status
        .canonical_reason()
        .map_or_else(|| format!("Request failed with status {}", status.as_u16()), str::to_string)
    })
}

impl HttpBackend {
  pub fn new(base_url: impl Into<String>, timeout: Duration, identity: Arc<dyn IdentityProvider>) -> Result<Self> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self {
      client,
      base_url: base_url.into().trim_end_matches('/').to_string(),
      identity,
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.base_url)
  }

  fn authorized(request: RequestBuilder, identity: Option<&Identity>) -> RequestBuilder {
    match identity {
      Some(identity) if !identity.credential.is_empty() => request.bearer_auth(&identity.credential),
      _ => request,
    }
  }

  /// Orders carry the credential of the customer who placed them.
  fn order_request(&self, identity: &Identity, payload: &OrderPayload, request_id: Uuid) -> RequestBuilder {
    Self::authorized(self.client.post(self.url("/orders")), Some(identity))
      .header("X-Request-Id", request_id.to_string())
      .json(payload)
  }

  async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    if !status.is_success() {
      let message = rejection_message(status, &body);
      warn!(status = status.as_u16(), %message, "Backend refused the request.");
      return Err(BackendError::Rejected {
        status: status.as_u16(),
        message,
      });
    }
    serde_json::from_str(&body).map_err(decode)
  }
}

#[async_trait]
impl OrderBackend for HttpBackend {
  #[instrument(
    name = "http::create_order",
    skip_all,
    fields(identity = %identity.key, items = payload.items.len()),
    err(Display)
  )]
  async fn create_order(&self, identity: &Identity, payload: &OrderPayload) -> Result<OrderCreated, BackendError> {
    let request_id = Uuid::new_v4();
    debug!(%request_id, "POST /orders");
    let response = self
      .order_request(identity, payload, request_id)
      .send()
      .await
      .map_err(transport)?;
    let created: OrderCreatedResponse = Self::read_json(response).await?;
    Ok(created.order)
  }
}

#[async_trait]
impl SlotBackend for HttpBackend {
  #[instrument(name = "http::busy_slots", skip(self), err(Display))]
  async fn busy_slots(&self, date: NaiveDate) -> Result<SlotQueryResponse, BackendError> {
    let response = Self::authorized(self.client.get(self.url("/delivery/slots")), self.identity.current().as_ref())
      .query(&[("date", date.format("%Y-%m-%d").to_string())])
      .send()
      .await
      .map_err(transport)?;
    Self::read_json(response).await
  }
}

impl std::fmt::Debug for HttpBackend {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("HttpBackend").field("base_url", &self.base_url).finish_non_exhaustive()
  }
}

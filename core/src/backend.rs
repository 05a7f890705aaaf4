// checkout/src/backend.rs

//! Request/response contracts of the hosted backend that checkout consumes.
//! Adapters (HTTP, fakes) implement these traits; attaching the bearer
//! credential is the adapter's job.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::BackendError;
use crate::identity::Identity;
use crate::slots::SlotQueryResponse;
use crate::submission::payload::{OrderCreated, OrderPayload};

#[async_trait]
pub trait OrderBackend: Send + Sync {
  /// Creates an order on behalf of `identity`, whose credential must be the
  /// one sent, whoever is signed in by the time the request goes out. A
  /// non-success status maps to [`BackendError::Rejected`] carrying the
  /// server's message.
  async fn create_order(&self, identity: &Identity, payload: &OrderPayload) -> Result<OrderCreated, BackendError>;
}

#[async_trait]
pub trait SlotBackend: Send + Sync {
  /// Which delivery windows are already committed on `date`.
  async fn busy_slots(&self, date: NaiveDate) -> Result<SlotQueryResponse, BackendError>;
}

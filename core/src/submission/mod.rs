//! Turning a validated draft into a server-side order.

pub mod payload;
pub mod service;

pub use payload::{OrderCreated, OrderPayload};
pub use service::{OrderSubmitter, Receipt};

// src/lib.rs

//! Checkout pipeline of a second-hand storefront.
//!
//! The pieces, leaf first:
//!  - [`CartStore`]: the set of unique items the current identity picked.
//!  - [`DeliveryPricingTable`]: district to delivery fee.
//!  - [`SlotAvailabilityResolver`]: which delivery windows are still open
//!    on a date, falling back to all-open when the backend cannot answer.
//!  - [`CheckoutWizard`]: five steps, each with an admission predicate.
//!  - [`OrderSubmitter`]: sends the order and only then clears the cart.
//!
//! All of them hang off a [`CheckoutContext`], built from the collaborators
//! in [`CheckoutDeps`]. HTTP, storage and identity live behind the traits in
//! [`backend`], [`store`] and [`identity`].

pub mod backend;
pub mod calendar;
pub mod cart;
pub mod clock;
pub mod context;
pub mod error;
pub mod flow;
pub mod identity;
pub mod models;
pub mod optimistic;
pub mod pricing;
pub mod slots;
pub mod store;
pub mod submission;
pub mod wizard;

// --- Re-exports for the Public API ---

pub use crate::backend::{OrderBackend, SlotBackend};
pub use crate::cart::CartStore;
pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::context::{CheckoutContext, CheckoutDeps};
pub use crate::error::{BackendError, CheckoutError, CheckoutResult, ContactField, FlowError, ValidationError};
pub use crate::flow::{Flow, FlowOutcome, SharedState, StageControl};
pub use crate::identity::{Identity, IdentityProvider, SessionIdentity};
pub use crate::models::{
  Amount, CartItem, CheckoutDraft, ContactDetails, DeliveryAddress, LocalOrderRecord, OpaqueId, OrderStatus,
  PaymentMethod, ScheduleSelection,
};
pub use crate::optimistic::{OptimisticAction, OptimisticError};
pub use crate::pricing::{DeliveryPricingTable, DeliveryZone};
pub use crate::slots::{SlotAvailability, SlotAvailabilityResolver, SlotQueryResponse, SlotState, SLOT_CATALOG};
pub use crate::store::{KeyValueStore, MemoryStore, OrderHistory};
pub use crate::submission::{OrderCreated, OrderPayload, OrderSubmitter, Receipt};
pub use crate::wizard::{CheckoutStep, CheckoutWizard, WizardPhase};

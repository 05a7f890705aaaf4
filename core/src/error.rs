// checkout/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::calendar::DateRejection;
use crate::wizard::CheckoutStep;

/// Failures of the stage engine itself.
#[derive(Debug, Error)]
pub enum FlowError {
  #[error("Stage not found: {stage_name}")]
  StageNotFound { stage_name: String },

  #[error("Handler missing for non-optional stage: {stage_name}")]
  HandlerMissing { stage_name: String },

  #[error("Error in stage handler or external operation. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal flow error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for FlowError {
  fn from(err: AnyhowError) -> Self {
    FlowError::HandlerError { source: err }
  }
}

/// Contact fields checked by the Contact step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
  Name,
  Phone,
  Email,
}

impl std::fmt::Display for ContactField {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      ContactField::Name => "name",
      ContactField::Phone => "phone",
      ContactField::Email => "email",
    })
  }
}

/// A step's admission predicate failed. Recovered locally, never sent anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("Your cart is empty. Add at least one item to continue.")]
  EmptyCart,

  #[error("Please fill in your {0}.")]
  MissingContactField(ContactField),

  #[error("Please choose a delivery date.")]
  DateNotChosen,

  #[error("Please choose a delivery time.")]
  SlotNotChosen,

  #[error("This date cannot be selected: {0}.")]
  DateNotSelectable(DateRejection),

  #[error("The {slot} window is no longer available for this date.")]
  SlotUnavailable { slot: String },

  #[error("'{slot}' is not one of the delivery windows.")]
  UnknownSlot { slot: String },

  #[error("Please choose a district.")]
  DistrictNotChosen,

  #[error("Neighborhood must be at least 3 characters.")]
  NeighborhoodTooShort,

  #[error("Street must be at least 5 characters.")]
  StreetTooShort,

  #[error("Please enter a building number.")]
  BuildingNumberMissing,

  #[error("This is the last step. Place the order to finish.")]
  NoFurtherStep,
}

impl ValidationError {
  /// The step whose input this message is about.
  pub fn step(&self) -> CheckoutStep {
    match self {
      ValidationError::EmptyCart => CheckoutStep::Cart,
      ValidationError::MissingContactField(_) => CheckoutStep::Contact,
      ValidationError::DateNotChosen
      | ValidationError::SlotNotChosen
      | ValidationError::DateNotSelectable(_)
      | ValidationError::SlotUnavailable { .. }
      | ValidationError::UnknownSlot { .. } => CheckoutStep::Schedule,
      ValidationError::DistrictNotChosen
      | ValidationError::NeighborhoodTooShort
      | ValidationError::StreetTooShort
      | ValidationError::BuildingNumberMissing => CheckoutStep::Address,
      ValidationError::NoFurtherStep => CheckoutStep::Confirm,
    }
  }
}

/// What a backend adapter reports back.
#[derive(Debug, Error)]
pub enum BackendError {
  /// The server answered with a non-success status. `message` is the
  /// server's own error text when it sent one.
  #[error("{message}")]
  Rejected { status: u16, message: String },

  #[error("Request could not be completed: {source}")]
  Transport {
    #[source]
    source: AnyhowError,
  },

  #[error("Response could not be decoded: {source}")]
  Decode {
    #[source]
    source: AnyhowError,
  },
}

#[derive(Debug, Error)]
pub enum CheckoutError {
  #[error("Sign in to check out.")]
  IdentityRequired,

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("An order is already being placed.")]
  SubmissionInFlight,

  /// The server refused the order; the message is shown as-is.
  #[error("{0}")]
  Rejected(String),

  #[error("Backend error: {0}")]
  Backend(#[from] BackendError),

  #[error("Orders can only be placed from the confirmation step.")]
  NotAtConfirmation,

  #[error("This checkout has already been completed.")]
  AlreadySubmitted,

  #[error("Local storage failed: {source}")]
  Persistence {
    #[source]
    source: AnyhowError,
  },

  #[error("Checkout flow error: {source}")]
  Flow {
    #[from]
    source: FlowError,
  },
}

pub type CheckoutResult<T, E = CheckoutError> = std::result::Result<T, E>;

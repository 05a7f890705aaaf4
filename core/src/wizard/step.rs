// checkout/src/wizard/step.rs

//! The five checkout steps and their admission predicates.
//!
//! Everything here is pure: predicates look only at the draft, never at
//! remote state or the clock.

use crate::error::{ContactField, ValidationError};
use crate::models::{CartItem, CheckoutDraft, ContactDetails, DeliveryAddress, ScheduleSelection};

const MIN_NEIGHBORHOOD_CHARS: usize = 3;
const MIN_STREET_CHARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckoutStep {
  Cart,
  Contact,
  Schedule,
  Address,
  Confirm,
}

impl CheckoutStep {
  pub const ALL: [CheckoutStep; 5] = [
    CheckoutStep::Cart,
    CheckoutStep::Contact,
    CheckoutStep::Schedule,
    CheckoutStep::Address,
    CheckoutStep::Confirm,
  ];

  /// 1-based position, as shown on the step indicator.
  pub fn ordinal(self) -> u8 {
    match self {
      CheckoutStep::Cart => 1,
      CheckoutStep::Contact => 2,
      CheckoutStep::Schedule => 3,
      CheckoutStep::Address => 4,
      CheckoutStep::Confirm => 5,
    }
  }

  pub fn from_ordinal(ordinal: u8) -> Option<Self> {
    Self::ALL.iter().copied().find(|s| s.ordinal() == ordinal)
  }

  pub fn next(self) -> Option<Self> {
    Self::from_ordinal(self.ordinal() + 1)
  }

  pub fn prev(self) -> Option<Self> {
    self.ordinal().checked_sub(1).and_then(Self::from_ordinal)
  }

  pub fn name(self) -> &'static str {
    match self {
      CheckoutStep::Cart => "cart",
      CheckoutStep::Contact => "contact",
      CheckoutStep::Schedule => "schedule",
      CheckoutStep::Address => "address",
      CheckoutStep::Confirm => "confirm",
    }
  }
}

impl std::fmt::Display for CheckoutStep {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} ({})", self.name(), self.ordinal())
  }
}

/// A step together with the slice of the draft it owns.
#[derive(Debug, Clone, Copy)]
pub enum StepState<'a> {
  Cart { items: &'a [CartItem] },
  Contact { contact: &'a ContactDetails },
  Schedule { schedule: &'a ScheduleSelection },
  Address { address: &'a DeliveryAddress },
  Confirm { draft: &'a CheckoutDraft },
}

fn blank(value: &str) -> bool {
  value.trim().is_empty()
}

fn char_len(value: &str) -> usize {
  value.trim().chars().count()
}

impl<'a> StepState<'a> {
  pub fn of(step: CheckoutStep, draft: &'a CheckoutDraft) -> Self {
    match step {
      CheckoutStep::Cart => StepState::Cart { items: &draft.items },
      CheckoutStep::Contact => StepState::Contact {
        contact: &draft.contact,
      },
      CheckoutStep::Schedule => StepState::Schedule {
        schedule: &draft.schedule,
      },
      CheckoutStep::Address => StepState::Address {
        address: &draft.address,
      },
      CheckoutStep::Confirm => StepState::Confirm { draft },
    }
  }

  pub fn step(&self) -> CheckoutStep {
    match self {
      StepState::Cart { .. } => CheckoutStep::Cart,
      StepState::Contact { .. } => CheckoutStep::Contact,
      StepState::Schedule { .. } => CheckoutStep::Schedule,
      StepState::Address { .. } => CheckoutStep::Address,
      StepState::Confirm { .. } => CheckoutStep::Confirm,
    }
  }

  /// Checks the predicate for leaving this step forward, reporting the
  /// first thing that is missing. Confirm is terminal and never admits.
  pub fn admit(&self) -> Result<(), ValidationError> {
    match self {
      StepState::Cart { items } => {
        if items.is_empty() {
          return Err(ValidationError::EmptyCart);
        }
      }
      StepState::Contact { contact } => {
        let fields = [
          (ContactField::Name, &contact.name),
          (ContactField::Phone, &contact.phone),
          (ContactField::Email, &contact.email),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| blank(value)) {
          return Err(ValidationError::MissingContactField(*field));
        }
      }
      StepState::Schedule { schedule } => {
        if schedule.date.is_none() {
          return Err(ValidationError::DateNotChosen);
        }
        if schedule.slot.as_deref().map_or(true, blank) {
          return Err(ValidationError::SlotNotChosen);
        }
      }
      StepState::Address { address } => {
        if address.district.as_deref().map_or(true, blank) {
          return Err(ValidationError::DistrictNotChosen);
        }
        if char_len(&address.neighborhood) < MIN_NEIGHBORHOOD_CHARS {
          return Err(ValidationError::NeighborhoodTooShort);
        }
        if char_len(&address.street) < MIN_STREET_CHARS {
          return Err(ValidationError::StreetTooShort);
        }
        if blank(&address.building) {
          return Err(ValidationError::BuildingNumberMissing);
        }
      }
      StepState::Confirm { .. } => return Err(ValidationError::NoFurtherStep),
    }
    Ok(())
  }

  pub fn can_advance(&self) -> bool {
    self.admit().is_ok()
  }
}

/// The first unmet predicate among the steps before `target`, if any.
pub fn first_blocking(draft: &CheckoutDraft, target: CheckoutStep) -> Option<ValidationError> {
  CheckoutStep::ALL
    .iter()
    .take_while(|step| **step < target)
    .find_map(|step| StepState::of(*step, draft).admit().err())
}

/// A step is reachable only when every step before it admits.
pub fn can_jump_to(draft: &CheckoutDraft, target: CheckoutStep) -> bool {
  first_blocking(draft, target).is_none()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::CartItem;

  #[test]
  fn ordinals_walk_in_order() {
    assert_eq!(CheckoutStep::Cart.prev(), None);
    assert_eq!(CheckoutStep::Confirm.next(), None);
    assert_eq!(CheckoutStep::Schedule.next(), Some(CheckoutStep::Address));
    assert_eq!(CheckoutStep::from_ordinal(2), Some(CheckoutStep::Contact));
    assert_eq!(CheckoutStep::from_ordinal(0), None);
  }

  #[test]
  fn address_checks_lengths_after_trimming() {
    let address = DeliveryAddress {
      district: Some("Riverside".into()),
      neighborhood: "  ab  ".into(),
      street: "Main Street".into(),
      building: "12".into(),
      ..Default::default()
    };
    let state = StepState::Address { address: &address };
    assert_eq!(state.admit(), Err(ValidationError::NeighborhoodTooShort));

    let address = DeliveryAddress {
      neighborhood: "Abc".into(),
      ..address
    };
    assert!(StepState::Address { address: &address }.can_advance());
  }

  #[test]
  fn jump_to_cart_is_always_reachable() {
    let draft = CheckoutDraft::default();
    assert!(can_jump_to(&draft, CheckoutStep::Cart));
    assert_eq!(first_blocking(&draft, CheckoutStep::Contact), Some(ValidationError::EmptyCart));

    let draft = CheckoutDraft {
      items: vec![CartItem::new(1, "Lamp", 1000)],
      ..Default::default()
    };
    assert!(can_jump_to(&draft, CheckoutStep::Contact));
    assert!(!can_jump_to(&draft, CheckoutStep::Schedule));
  }
}

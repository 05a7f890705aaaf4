// checkout/src/submission/payload.rs

//! Wire format of the order-creation endpoint.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::{Amount, CartItem, CheckoutDraft, OpaqueId, PaymentMethod};

pub const DELIVERY_METHOD: &str = "courier";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
  pub customer: CustomerBlock,
  pub items: Vec<ItemLine>,
  pub delivery: DeliveryBlock,
  pub payment: PaymentBlock,
  pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerBlock {
  pub name: String,
  pub phone: String,
  pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLine {
  pub id: OpaqueId,
  pub title: String,
  pub price: Amount,
  pub quantity: u32,
  pub image: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub condition: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
}

impl From<&CartItem> for ItemLine {
  fn from(item: &CartItem) -> Self {
    Self {
      id: item.id.clone(),
      title: item.title.clone(),
      price: item.price,
      quantity: 1,
      image: item.image.clone(),
      condition: item.condition.clone(),
      category: item.category.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryBlock {
  pub method: String,
  /// `YYYY-MM-DD`
  pub date: String,
  /// Slot label, e.g. `09:00-11:00`.
  pub time: String,
  pub fee: Amount,
  pub address: AddressBlock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBlock {
  pub district: String,
  pub neighborhood: String,
  pub street: String,
  pub building: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub apartment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentBlock {
  pub method: PaymentMethod,
}

impl OrderPayload {
  /// Builds the payload. Fails only when the schedule or district is missing.
  pub fn compose(draft: &CheckoutDraft, fee: Amount) -> Result<Self, ValidationError> {
    let date = draft.schedule.date.ok_or(ValidationError::DateNotChosen)?;
    let slot = draft.schedule.slot.clone().ok_or(ValidationError::SlotNotChosen)?;
    let district = draft.address.district.clone().ok_or(ValidationError::DistrictNotChosen)?;
    let contact = &draft.contact;
    let address = &draft.address;

    Ok(Self {
      customer: CustomerBlock {
        name: contact.name.trim().to_string(),
        phone: contact.phone.trim().to_string(),
        email: contact.email.trim().to_string(),
      },
      items: draft.items.iter().map(ItemLine::from).collect(),
      delivery: DeliveryBlock {
        method: DELIVERY_METHOD.to_string(),
        date: date.format("%Y-%m-%d").to_string(),
        time: slot,
        fee,
        address: AddressBlock {
          district,
          neighborhood: address.neighborhood.trim().to_string(),
          street: address.street.trim().to_string(),
          building: address.building.trim().to_string(),
          apartment: address.apartment.as_ref().map(|a| a.trim().to_string()).filter(|a| !a.is_empty()),
        },
      },
      payment: PaymentBlock {
        method: draft.payment_method,
      },
      notes: address.notes.trim().to_string(),
    })
  }
}

/// Success body: `{success, order: {id, orderNumber, total}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreatedResponse {
  #[serde(default)]
  pub success: bool,
  pub order: OrderCreated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
  pub id: OpaqueId,
  pub order_number: OpaqueId,
  pub total: Amount,
}

/// Failure body: `{error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
  pub error: String,
}

// checkout/src/models/order.rs

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{Amount, CartItem, OpaqueId};

/// How the customer intends to pay. No money moves inside checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
  #[default]
  BankTransfer,
  CardOnline,
  CashOnDelivery,
}

impl PaymentMethod {
  pub const ALL: [PaymentMethod; 3] = [
    PaymentMethod::BankTransfer,
    PaymentMethod::CardOnline,
    PaymentMethod::CashOnDelivery,
  ];

  /// Bank transfer and online card are paid before delivery.
  pub fn is_prepaid(self) -> bool {
    !matches!(self, PaymentMethod::CashOnDelivery)
  }

  /// Status a freshly created order starts in.
  pub fn initial_status(self) -> OrderStatus {
    if self.is_prepaid() {
      OrderStatus::PaymentPending
    } else {
      OrderStatus::OrderReceived
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      PaymentMethod::BankTransfer => "bank_transfer",
      PaymentMethod::CardOnline => "card_online",
      PaymentMethod::CashOnDelivery => "cash_on_delivery",
    }
  }
}

impl std::str::FromStr for PaymentMethod {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "bank_transfer" | "bank" => Ok(PaymentMethod::BankTransfer),
      "card_online" | "card" => Ok(PaymentMethod::CardOnline),
      "cash_on_delivery" | "cash" => Ok(PaymentMethod::CashOnDelivery),
      other => Err(format!("unknown payment method '{other}'")),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
  PaymentPending,
  OrderReceived,
  Processing,
  InTransit,
  Delivered,
  Cancelled,
}

impl std::fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      OrderStatus::PaymentPending => "payment pending",
      OrderStatus::OrderReceived => "order received",
      OrderStatus::Processing => "processing",
      OrderStatus::InTransit => "in transit",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
    })
  }
}

/// Local copy of an order the server confirmed, kept for the history views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalOrderRecord {
  pub id: OpaqueId,
  pub order_number: String,
  pub items: Vec<CartItem>,
  pub delivery_date: NaiveDate,
  pub delivery_slot: String,
  pub district: String,
  pub delivery_fee: Amount,
  pub payment_method: PaymentMethod,
  pub total: Amount,
  pub status: OrderStatus,
  pub placed_at: NaiveDateTime,
}

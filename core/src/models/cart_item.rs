// checkout/src/models/cart_item.rs

use serde::{Deserialize, Serialize};

use super::Amount;

/// Identifier the backend hands out, either numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpaqueId {
  Int(i64),
  Text(String),
}

impl std::fmt::Display for OpaqueId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      OpaqueId::Int(n) => write!(f, "{n}"),
      OpaqueId::Text(s) => f.write_str(s),
    }
  }
}

impl From<i64> for OpaqueId {
  fn from(n: i64) -> Self {
    OpaqueId::Int(n)
  }
}

impl From<&str> for OpaqueId {
  fn from(s: &str) -> Self {
    OpaqueId::Text(s.to_string())
  }
}

impl From<String> for OpaqueId {
  fn from(s: String) -> Self {
    OpaqueId::Text(s)
  }
}

impl std::str::FromStr for OpaqueId {
  type Err = std::convert::Infallible;

  /// Digits parse as `Int`, anything else is kept as `Text`.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(s.parse::<i64>().map_or_else(|_| OpaqueId::Text(s.to_string()), OpaqueId::Int))
  }
}

/// One unique physical item. There is never more than one of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
  pub id: OpaqueId,
  pub title: String,
  pub price: Amount,
  pub image: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub condition: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
}

impl CartItem {
  pub fn new(id: impl Into<OpaqueId>, title: impl Into<String>, price: Amount) -> Self {
    Self {
      id: id.into(),
      title: title.into(),
      price,
      image: String::new(),
      condition: None,
      category: None,
    }
  }

  pub fn with_image(mut self, image: impl Into<String>) -> Self {
    self.image = image.into();
    self
  }

  pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
    self.condition = Some(condition.into());
    self
  }

  pub fn with_category(mut self, category: impl Into<String>) -> Self {
    self.category = Some(category.into());
    self
  }
}

/// Persisted cart layout. `quantity` is always written as 1 and ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCartEntry {
  pub id: OpaqueId,
  pub title: String,
  pub price: Amount,
  #[serde(default)]
  pub image: String,
  #[serde(default = "one")]
  pub quantity: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub condition: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
}

fn one() -> u32 {
  1
}

impl From<&CartItem> for StoredCartEntry {
  fn from(item: &CartItem) -> Self {
    Self {
      id: item.id.clone(),
      title: item.title.clone(),
      price: item.price,
      image: item.image.clone(),
      quantity: 1,
      condition: item.condition.clone(),
      category: item.category.clone(),
    }
  }
}

impl From<StoredCartEntry> for CartItem {
  fn from(entry: StoredCartEntry) -> Self {
    Self {
      id: entry.id,
      title: entry.title,
      price: entry.price,
      image: entry.image,
      condition: entry.condition,
      category: entry.category,
    }
  }
}

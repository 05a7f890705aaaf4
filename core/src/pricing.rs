// checkout/src/pricing.rs

//! Delivery fee by destination district.
//!
//! The home zone is always free. Every other known district has a fixed,
//! non-zero tier, and a district the table does not know pays the default
//! tier instead of failing the checkout.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Amount;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryZone {
  pub name: String,
  pub fee: NonZeroU64,
}

impl DeliveryZone {
  pub fn new(name: impl Into<String>, fee: NonZeroU64) -> Self {
    Self { name: name.into(), fee }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPricingTable {
  home_zone: String,
  default_fee: NonZeroU64,
  zones: Vec<DeliveryZone>,
}

const TIER_1: NonZeroU64 = match NonZeroU64::new(500) {
  Some(fee) => fee,
  None => NonZeroU64::MIN,
};
const TIER_2: NonZeroU64 = match NonZeroU64::new(700) {
  Some(fee) => fee,
  None => NonZeroU64::MIN,
};
const TIER_3: NonZeroU64 = match NonZeroU64::new(1000) {
  Some(fee) => fee,
  None => NonZeroU64::MIN,
};

fn normalize(district: &str) -> String {
  district.trim().to_lowercase()
}

impl DeliveryPricingTable {
  pub fn new(home_zone: impl Into<String>, default_fee: NonZeroU64, zones: Vec<DeliveryZone>) -> Self {
    Self {
      home_zone: home_zone.into(),
      default_fee,
      zones,
    }
  }

  /// The table the storefront ships with.
  pub fn standard() -> Self {
    let tier = |fee: NonZeroU64, names: &[&str]| names.iter().map(move |n| DeliveryZone::new(*n, fee)).collect::<Vec<_>>();
    let mut zones = tier(TIER_1, &["Old Town", "Riverside", "Northgate"]);
    zones.extend(tier(TIER_2, &["Eastfield", "Hillcrest", "Westbrook"]));
    zones.extend(tier(TIER_3, &["Lakeshore", "Airport District", "Southmoor"]));
    Self::new("Central", TIER_3, zones)
  }

  pub fn home_zone(&self) -> &str {
    &self.home_zone
  }

  pub fn default_fee(&self) -> Amount {
    self.default_fee.get()
  }

  pub fn zones(&self) -> &[DeliveryZone] {
    &self.zones
  }

  /// All district names a picker can offer, home zone first.
  pub fn district_names(&self) -> Vec<&str> {
    std::iter::once(self.home_zone.as_str())
      .chain(self.zones.iter().map(|z| z.name.as_str()))
      .collect()
  }

  fn is_home(&self, district: &str) -> bool {
    normalize(district) == normalize(&self.home_zone)
  }

  pub fn fee_for(&self, district: &str) -> Amount {
    if self.is_home(district) {
      return 0;
    }
    let wanted = normalize(district);
    match self.zones.iter().find(|z| normalize(&z.name) == wanted) {
      Some(zone) => zone.fee.get(),
      None => {
        debug!(district, fallback = self.default_fee.get(), "Unmapped district, charging default tier.");
        self.default_fee.get()
      }
    }
  }

  /// Only drives the "delivery outside the home zone" hint.
  pub fn is_outside_home_zone(&self, district: &str) -> bool {
    !self.is_home(district)
  }
}

impl Default for DeliveryPricingTable {
  fn default() -> Self {
    Self::standard()
  }
}

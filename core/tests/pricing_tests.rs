// tests/pricing_tests.rs
use checkout::{DeliveryPricingTable, DeliveryZone};
use std::num::NonZeroU64;

#[test]
fn home_zone_is_free_and_every_other_known_district_is_not() {
  let table = DeliveryPricingTable::standard();
  assert_eq!(table.fee_for(table.home_zone()), 0);
  for zone in table.zones() {
    assert!(table.fee_for(&zone.name) > 0, "{} should not be free", zone.name);
  }
}

#[test]
fn tiers_match_the_standard_table() {
  let table = DeliveryPricingTable::standard();
  assert_eq!(table.fee_for("Riverside"), 500);
  assert_eq!(table.fee_for("Hillcrest"), 700);
  assert_eq!(table.fee_for("Airport District"), 1000);
}

#[test]
fn lookup_ignores_case_and_surrounding_whitespace() {
  let table = DeliveryPricingTable::standard();
  assert_eq!(table.fee_for("  central "), 0);
  assert_eq!(table.fee_for("EASTFIELD"), 700);
  assert!(!table.is_outside_home_zone("CENTRAL"));
}

#[test]
fn unknown_districts_pay_the_default_tier() {
  let table = DeliveryPricingTable::standard();
  for district in ["Atlantis", "", "   ", "Old Town East"] {
    assert_eq!(table.fee_for(district), table.default_fee());
    assert!(table.is_outside_home_zone(district));
  }
  assert_eq!(table.default_fee(), 1000);
}

#[test]
fn district_names_start_with_the_home_zone() {
  let table = DeliveryPricingTable::standard();
  let names = table.district_names();
  assert_eq!(names.first(), Some(&"Central"));
  assert_eq!(names.len(), table.zones().len() + 1);
}

#[test]
fn custom_table_loads_from_json() {
  let table: DeliveryPricingTable = serde_json::from_str(
    r#"{"homeZone": "Harbour", "defaultFee": 900, "zones": [{"name": "Docks", "fee": 300}]}"#,
  )
  .unwrap();
  assert_eq!(table.fee_for("harbour"), 0);
  assert_eq!(table.fee_for("Docks"), 300);
  assert_eq!(table.fee_for("Central"), 900);
  assert_eq!(
    table,
    DeliveryPricingTable::new(
      "Harbour",
      NonZeroU64::new(900).unwrap(),
      vec![DeliveryZone::new("Docks", NonZeroU64::new(300).unwrap())]
    )
  );
}

#[test]
fn zero_fee_outside_the_home_zone_is_rejected_at_load_time() {
  let result: Result<DeliveryPricingTable, _> =
    serde_json::from_str(r#"{"homeZone": "Harbour", "defaultFee": 900, "zones": [{"name": "Docks", "fee": 0}]}"#);
  assert!(result.is_err());

  let result: Result<DeliveryPricingTable, _> =
    serde_json::from_str(r#"{"homeZone": "Harbour", "defaultFee": 0, "zones": []}"#);
  assert!(result.is_err());
}

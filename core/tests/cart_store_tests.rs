// tests/cart_store_tests.rs
mod common;

use checkout::store::cart_key;
use checkout::{CartItem, CartStore, KeyValueStore, MemoryStore, OpaqueId};
use common::*;
use serde_json::json;
use serial_test::serial;
use std::sync::Arc;

fn store_for(identity: Option<&checkout::Identity>) -> (Arc<MemoryStore>, CartStore) {
  let backing = Arc::new(MemoryStore::new());
  let mut cart = CartStore::new(backing.clone());
  cart.switch_identity(identity);
  (backing, cart)
}

#[test]
#[serial]
fn add_without_identity_is_ignored() {
  setup_tracing();
  let (backing, mut cart) = store_for(None);
  assert!(!cart.add(lamp()));
  assert!(cart.is_empty());
  assert!(backing.keys().is_empty());
}

#[test]
#[serial]
fn adding_the_same_id_twice_keeps_one_entry() {
  setup_tracing();
  let (_, mut cart) = store_for(Some(&alice()));
  let renamed = CartItem::new(1, "Same lamp, different title", 9999);

  assert!(cart.add(lamp()));
  assert!(!cart.add(renamed));
  assert!(!cart.add(lamp()));

  assert_eq!(cart.count(), 1);
  assert_eq!(cart.items()[0].title, "Brass desk lamp");
  assert_eq!(cart.subtotal(), 1000);
}

#[test]
#[serial]
fn count_and_subtotal_follow_the_set() {
  setup_tracing();
  let (_, mut cart) = store_for(Some(&alice()));
  cart.add(lamp());
  cart.add(chair());
  assert_eq!(cart.count(), 2);
  assert_eq!(cart.subtotal(), 3500);

  assert!(cart.remove(&OpaqueId::from("chair-7")));
  assert!(!cart.remove(&OpaqueId::from("chair-7")));
  assert_eq!(cart.count(), 1);
  assert_eq!(cart.subtotal(), 1000);

  cart.clear();
  assert!(cart.is_empty());
  assert_eq!(cart.subtotal(), 0);
}

#[test]
#[serial]
fn every_change_is_persisted_under_the_identity_key() {
  setup_tracing();
  let (backing, mut cart) = store_for(Some(&alice()));
  cart.add(lamp());

  let stored = backing.load(&cart_key("alice")).unwrap().unwrap();
  assert_eq!(
    stored,
    json!([{
      "id": 1,
      "title": "Brass desk lamp",
      "price": 1000,
      "image": "lamp.jpg",
      "quantity": 1,
      "condition": "good",
      "category": "lighting"
    }])
  );

  cart.remove(&OpaqueId::Int(1));
  assert_eq!(backing.load(&cart_key("alice")).unwrap().unwrap(), json!([]));
}

#[test]
#[serial]
fn switching_identity_swaps_the_item_set() {
  setup_tracing();
  let (backing, mut cart) = store_for(Some(&alice()));
  cart.add(lamp());

  cart.switch_identity(Some(&bob()));
  assert!(cart.is_empty());
  cart.add(chair());

  cart.switch_identity(None);
  assert!(cart.is_empty());
  assert_eq!(cart.identity_key(), None);

  cart.switch_identity(Some(&alice()));
  assert_eq!(cart.items(), &[lamp()]);
  assert_eq!(backing.keys(), vec!["cart/alice".to_string(), "cart/bob".to_string()]);
}

#[test]
#[serial]
fn stored_duplicates_and_quantities_are_normalised_on_load() {
  setup_tracing();
  let backing = Arc::new(MemoryStore::new());
  backing
    .save(
      &cart_key("alice"),
      &json!([
        {"id": "a", "title": "Vase", "price": 300, "image": "", "quantity": 4},
        {"id": "a", "title": "Vase again", "price": 300, "image": ""},
        {"id": 9, "title": "Rug", "price": 1200, "image": "rug.png"}
      ]),
    )
    .unwrap();

  let mut cart = CartStore::new(backing);
  cart.switch_identity(Some(&alice()));
  assert_eq!(cart.count(), 2);
  assert_eq!(cart.subtotal(), 1500);
  assert!(cart.contains(&OpaqueId::from("a")));
  assert!(cart.contains(&OpaqueId::Int(9)));
}

#[test]
#[serial]
fn unreadable_stored_cart_starts_empty() {
  setup_tracing();
  let backing = Arc::new(MemoryStore::new());
  backing.save(&cart_key("alice"), &json!({"not": "a list"})).unwrap();

  let mut cart = CartStore::new(backing);
  cart.switch_identity(Some(&alice()));
  assert!(cart.is_empty());
  assert!(cart.add(lamp()));
}

#[test]
#[serial]
fn failed_writes_keep_the_in_memory_set() {
  setup_tracing();
  let backing = Arc::new(FlakyStore::default());
  backing.fail_writes_to("cart/");
  let mut cart = CartStore::new(backing);
  cart.switch_identity(Some(&alice()));

  assert!(cart.add(lamp()));
  assert_eq!(cart.count(), 1);
}

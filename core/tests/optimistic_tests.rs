// tests/optimistic_tests.rs
mod common;

use checkout::{OpaqueId, OptimisticAction, OptimisticError, SharedState};
use common::setup_tracing;
use serial_test::serial;
use std::collections::BTreeSet;
use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("server said no")]
struct Refused;

type Favorites = BTreeSet<String>;

fn toggle(favorites: &mut Favorites, id: &str) -> bool {
  if favorites.remove(id) {
    false
  } else {
    favorites.insert(id.to_string());
    true
  }
}

#[tokio::test]
#[serial]
async fn confirmed_change_stays_applied() {
  setup_tracing();
  let action = OptimisticAction::<OpaqueId>::new();
  let state = SharedState::new(Favorites::new());

  let result = action
    .run(
      OpaqueId::Int(5),
      &state,
      |f: &mut Favorites| toggle(f, "5"),
      |f: &mut Favorites, _added: bool| {
        toggle(f, "5");
      },
      || async { Ok::<_, Refused>("saved") },
    )
    .await;

  assert_eq!(result.unwrap(), "saved");
  assert!(state.read().contains("5"));
}

#[tokio::test]
#[serial]
async fn rejected_change_is_rolled_back() {
  setup_tracing();
  let action = OptimisticAction::<OpaqueId>::new();
  let state = SharedState::new(Favorites::from(["5".to_string()]));

  let result = action
    .run(
      OpaqueId::Int(5),
      &state,
      |f: &mut Favorites| toggle(f, "5"),
      |f: &mut Favorites, _removed: bool| {
        toggle(f, "5");
      },
      || async { Err::<(), _>(Refused) },
    )
    .await;

  assert!(matches!(result, Err(OptimisticError::RolledBack(Refused))));
  assert!(state.read().contains("5"));
  assert!(!action.is_in_flight(&OpaqueId::Int(5)));
}

#[tokio::test]
#[serial]
async fn second_call_for_the_same_key_is_refused_while_in_flight() {
  setup_tracing();
  let action = OptimisticAction::<OpaqueId>::new();
  let state = SharedState::new(Favorites::new());

  let slow = action.run(
    OpaqueId::from("chair-7"),
    &state,
    |f: &mut Favorites| toggle(f, "chair-7"),
    |f: &mut Favorites, _: bool| {
      toggle(f, "chair-7");
    },
    || async {
      tokio::time::sleep(Duration::from_millis(30)).await;
      Ok::<_, Refused>(())
    },
  );
  let repeat = async {
    tokio::time::sleep(Duration::from_millis(5)).await;
    action
      .run(
        OpaqueId::from("chair-7"),
        &state,
        |f: &mut Favorites| toggle(f, "chair-7"),
        |f: &mut Favorites, _: bool| {
          toggle(f, "chair-7");
        },
        || async { Ok::<_, Refused>(()) },
      )
      .await
  };
  let other_key = async {
    tokio::time::sleep(Duration::from_millis(5)).await;
    action
      .run(
        OpaqueId::Int(9),
        &state,
        |f: &mut Favorites| toggle(f, "9"),
        |f: &mut Favorites, _: bool| {
          toggle(f, "9");
        },
        || async { Ok::<_, Refused>(()) },
      )
      .await
  };

  let (slow, repeat, other_key) = tokio::join!(slow, repeat, other_key);
  assert!(slow.is_ok());
  assert!(matches!(repeat, Err(OptimisticError::InFlight)));
  assert!(other_key.is_ok());

  let favorites = state.read();
  assert!(favorites.contains("chair-7"));
  assert!(favorites.contains("9"));
}

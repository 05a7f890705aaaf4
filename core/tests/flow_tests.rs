// tests/flow_tests.rs
mod common;

use checkout::{Flow, FlowError, FlowOutcome, SharedState, StageControl};
use common::setup_tracing;
use serial_test::serial;

#[derive(Debug, Default, Clone)]
struct Trail {
  visited: Vec<String>,
  halt_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
enum TrailError {
  #[error("flow error: {0}")]
  Flow(String),

  #[error("stage failed: {0}")]
  Stage(String),
}

impl From<FlowError> for TrailError {
  fn from(e: FlowError) -> Self {
    TrailError::Flow(format!("{e:?}"))
  }
}

fn visit(flow: &mut Flow<Trail, TrailError>, stage: &'static str, label: &'static str) {
  flow
    .on(stage, move |ctx: SharedState<Trail>| async move {
      let mut guard = ctx.write();
      guard.visited.push(label.to_string());
      if guard.halt_at.as_deref() == Some(label) {
        return Ok::<_, TrailError>(StageControl::Halt);
      }
      Ok(StageControl::Proceed)
    })
    .unwrap();
}

#[tokio::test]
#[serial]
async fn stages_run_in_declaration_order() {
  setup_tracing();
  let mut flow = Flow::<Trail, TrailError>::new(&[("first", false), ("second", false), ("third", false)]);
  visit(&mut flow, "third", "third");
  visit(&mut flow, "first", "first");
  visit(&mut flow, "second", "second");

  let ctx = SharedState::new(Trail::default());
  assert_eq!(flow.run(ctx.clone()).await.unwrap(), FlowOutcome::Completed);
  assert_eq!(ctx.read().visited, vec!["first", "second", "third"]);
}

#[tokio::test]
#[serial]
async fn halt_stops_remaining_stages() {
  setup_tracing();
  let mut flow = Flow::<Trail, TrailError>::new(&[("a", false), ("b", false), ("c", false)]);
  visit(&mut flow, "a", "a");
  visit(&mut flow, "b", "b");
  visit(&mut flow, "c", "c");

  let ctx = SharedState::new(Trail {
    halt_at: Some("b".into()),
    ..Default::default()
  });
  assert_eq!(flow.run(ctx.clone()).await.unwrap(), FlowOutcome::Halted);
  assert_eq!(ctx.read().visited, vec!["a", "b"]);
}

#[tokio::test]
#[serial]
async fn handler_error_propagates_and_later_stages_do_not_run() {
  setup_tracing();
  let mut flow = Flow::<Trail, TrailError>::new(&[("good", false), ("bad", false), ("never", false)]);
  visit(&mut flow, "good", "good");
  flow
    .on("bad", |ctx: SharedState<Trail>| async move {
      ctx.write().visited.push("bad".into());
      Err::<StageControl, _>(TrailError::Stage("boom".into()))
    })
    .unwrap();
  visit(&mut flow, "never", "never");

  let ctx = SharedState::new(Trail::default());
  let err = flow.run(ctx.clone()).await.unwrap_err();
  assert_eq!(err, TrailError::Stage("boom".into()));
  assert_eq!(ctx.read().visited, vec!["good", "bad"]);
}

#[tokio::test]
#[serial]
async fn missing_handler_fails_only_for_required_stages() {
  setup_tracing();
  let optional = Flow::<Trail, TrailError>::new(&[("optional_empty", true)]);
  assert_eq!(optional.run(SharedState::default()).await.unwrap(), FlowOutcome::Completed);

  let required = Flow::<Trail, TrailError>::new(&[("required_empty", false)]);
  match required.run(SharedState::default()).await {
    Err(TrailError::Flow(s)) => {
      assert!(s.contains("HandlerMissing"));
      assert!(s.contains("required_empty"));
    }
    other => panic!("expected HandlerMissing, got {other:?}"),
  }
}

#[tokio::test]
#[serial]
async fn after_handlers_run_once_on_handlers_proceed() {
  setup_tracing();
  let mut flow = Flow::<Trail, TrailError>::new(&[("main", false)]);
  flow
    .after("main", |ctx: SharedState<Trail>| async move {
      ctx.write().visited.push("after".into());
      Ok::<_, TrailError>(StageControl::Proceed)
    })
    .unwrap();
  visit(&mut flow, "main", "on");

  let ctx = SharedState::new(Trail::default());
  flow.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().visited, vec!["on", "after"]);
}

#[test]
fn registering_on_unknown_stage_is_rejected() {
  let mut flow = Flow::<Trail, TrailError>::new(&[("known", false)]);
  let result = flow.on("unknown", |_ctx: SharedState<Trail>| async { Ok::<_, TrailError>(StageControl::Proceed) });
  match result {
    Err(FlowError::StageNotFound { stage_name }) => assert_eq!(stage_name, "unknown"),
    other => panic!("expected StageNotFound, got {:?}", other.map(|_| ())),
  }
  assert_eq!(flow.stage_names().collect::<Vec<_>>(), vec!["known"]);
}

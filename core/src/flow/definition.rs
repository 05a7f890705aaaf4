// checkout/src/flow/definition.rs

//! The `Flow<T, Err>` definition and the methods that build it.

use std::collections::HashMap;
use std::future::Future;

use super::stage::{StageDef, StageHandler};
use super::{SharedState, StageControl};
use crate::error::FlowError;

/// An ordered list of named stages over shared state `T`, whose handlers
/// return `Result<StageControl, Err>`.
///
/// `Err: From<FlowError>` lets the engine report its own failures (a stage
/// with no handlers, for instance) through the caller's error type.
pub struct Flow<T, Err>
where
  T: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) stages: Vec<StageDef>,
  pub(crate) on: HashMap<String, Vec<StageHandler<T, Err>>>,
  pub(crate) after: HashMap<String, Vec<StageHandler<T, Err>>>,
}

impl<T, Err> Flow<T, Err>
where
  T: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new(stage_defs: &[(&str, bool)]) -> Self {
    let stages = stage_defs
      .iter()
      .map(|(name, optional)| StageDef {
        name: (*name).to_string(),
        optional: *optional,
      })
      .collect();

    Self {
      stages,
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn stage_names(&self) -> impl Iterator<Item = &str> {
    self.stages.iter().map(|s| s.name.as_str())
  }

  fn ensure_stage_exists(&self, stage_name: &str) -> Result<(), FlowError> {
    if self.stages.iter().any(|s| s.name == stage_name) {
      Ok(())
    } else {
      Err(FlowError::StageNotFound {
        stage_name: stage_name.to_string(),
      })
    }
  }

  /// Registers the main handler(s) of a stage. Handlers run in registration order.
  pub fn on<F, E>(
    &mut self,
    stage_name: &str,
    handler_fn: impl Fn(SharedState<T>) -> F + Send + Sync + 'static,
  ) -> Result<&mut Self, FlowError>
  where
    F: Future<Output = Result<StageControl, E>> + Send + 'static,
    E: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_stage_exists(stage_name)?;
    self.on.entry(stage_name.to_string()).or_default().push(wrap(handler_fn));
    Ok(self)
  }

  /// Registers a handler that runs once every `on` handler of the stage proceeded.
  pub fn after<F, E>(
    &mut self,
    stage_name: &str,
    handler_fn: impl Fn(SharedState<T>) -> F + Send + Sync + 'static,
  ) -> Result<&mut Self, FlowError>
  where
    F: Future<Output = Result<StageControl, E>> + Send + 'static,
    E: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_stage_exists(stage_name)?;
    self.after.entry(stage_name.to_string()).or_default().push(wrap(handler_fn));
    Ok(self)
  }
}

fn wrap<T, Err, F, E>(handler_fn: impl Fn(SharedState<T>) -> F + Send + Sync + 'static) -> StageHandler<T, Err>
where
  T: 'static + Send + Sync,
  F: Future<Output = Result<StageControl, E>> + Send + 'static,
  E: Into<Err> + Send + Sync + 'static,
{
  Box::new(move |state| {
    let fut = handler_fn(state);
    Box::pin(async move { fut.await.map_err(Into::into) })
  })
}

impl<T, Err> std::fmt::Debug for Flow<T, Err>
where
  T: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Flow").field("stages", &self.stages).finish_non_exhaustive()
  }
}

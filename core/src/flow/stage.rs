// checkout/src/flow/stage.rs

use super::SharedState;
use std::future::Future;
use std::pin::Pin;

use super::control::StageControl;

/// A boxed stage handler. It receives a clone of the flow's shared state and
/// resolves to a [`StageControl`] or the flow's error type.
pub type StageHandler<T, Err> = Box<
  dyn Fn(SharedState<T>) -> Pin<Box<dyn Future<Output = Result<StageControl, Err>> + Send>> + Send + Sync,
>;

/// Name and optionality of one stage. An optional stage with no handlers
/// is passed over instead of failing the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDef {
  pub name: String,
  pub optional: bool,
}

// checkout/src/flow/execution.rs

//! `Flow::run()`: executes stages and their handlers in order.

use tracing::{event, span, Instrument, Level};

use super::definition::Flow;
use super::stage::StageHandler;
use super::{FlowOutcome, SharedState, StageControl};
use crate::error::FlowError;

enum PhaseResult {
  Proceed,
  Halted,
}

impl<T, Err> Flow<T, Err>
where
  T: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every stage against `state`.
  ///
  /// A non-optional stage without handlers fails with
  /// [`FlowError::HandlerMissing`] converted into `Err`.
  pub async fn run(&self, state: SharedState<T>) -> Result<FlowOutcome, Err> {
    event!(Level::DEBUG, num_stages = self.stages.len(), "Flow execution starting.");

    for (stage_idx, stage_def) in self.stages.iter().enumerate() {
      let stage_name = stage_def.name.as_str();
      let stage_span = span!(
        Level::INFO,
        "checkout_stage",
        stage_name = stage_name,
        stage_index = stage_idx,
        optional = stage_def.optional
      );

      let on_handlers = self.on.get(stage_name).filter(|v| !v.is_empty());
      let after_handlers = self.after.get(stage_name).filter(|v| !v.is_empty());

      if on_handlers.is_none() && after_handlers.is_none() {
        if stage_def.optional {
          stage_span.in_scope(|| event!(Level::DEBUG, "Optional stage has no handlers, skipping."));
          continue;
        }
        stage_span.in_scope(|| event!(Level::ERROR, "Non-optional stage has no handlers."));
        return Err(Err::from(FlowError::HandlerMissing {
          stage_name: stage_def.name.clone(),
        }));
      }

      for (phase, handlers) in [("on", on_handlers), ("after", after_handlers)] {
        let Some(handlers) = handlers else { continue };
        match run_phase(phase, handlers, &state).instrument(stage_span.clone()).await? {
          PhaseResult::Proceed => {}
          PhaseResult::Halted => return Ok(FlowOutcome::Halted),
        }
      }

      stage_span.in_scope(|| event!(Level::DEBUG, "Stage finished."));
    }

    event!(Level::DEBUG, "Flow execution completed.");
    Ok(FlowOutcome::Completed)
  }
}

async fn run_phase<T, Err>(
  phase: &'static str,
  handlers: &[StageHandler<T, Err>],
  state: &SharedState<T>,
) -> Result<PhaseResult, Err>
where
  T: 'static + Send + Sync,
  Err: std::error::Error + Send + Sync + 'static,
{
  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    let handler_span = span!(Level::DEBUG, "stage_handler", phase, handler_index = handler_idx);
    match handler_fn(state.clone()).instrument(handler_span).await {
      Ok(StageControl::Proceed) => {}
      Ok(StageControl::Halt) => {
        event!(Level::INFO, phase, "Flow halted by a handler.");
        return Ok(PhaseResult::Halted);
      }
      Err(e) => {
        event!(Level::ERROR, phase, error = %e, "Stage handler failed.");
        return Err(e);
      }
    }
  }
  Ok(PhaseResult::Proceed)
}

// checkout/src/flow/control.rs

//! Signals for controlling flow execution and the outcome of a run.

/// Returned by a stage handler to say whether the flow goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageControl {
  /// Run the remaining handlers of this stage, then the following stages.
  Proceed,
  /// Stop immediately. No further handlers of this or later stages run.
  Halt,
}

/// Outcome of a full flow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  /// Every non-skipped stage ran to completion.
  Completed,
  /// A handler returned [`StageControl::Halt`].
  Halted,
}

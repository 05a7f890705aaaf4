//! A small stage engine: named stages run in order over shared state, each
//! with `on` and `after` handlers that may halt the run or fail it.
//!
//! The order submission service is built on it.

pub mod control;
pub mod definition;
pub mod execution;
pub mod shared;
pub mod stage;

pub use control::{FlowOutcome, StageControl};
pub use definition::Flow;
pub use shared::SharedState;
pub use stage::{StageDef, StageHandler};

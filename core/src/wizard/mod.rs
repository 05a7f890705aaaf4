// checkout/src/wizard/mod.rs
pub mod controller;
pub mod step;

pub use controller::{CheckoutWizard, WizardPhase};
pub use step::{can_jump_to, first_blocking, CheckoutStep, StepState};

//! Domain services: state machine and trigger evaluation.

mod state_machine;
pub mod trigger_evaluator;

pub use state_machine::OrderStateMachine;
pub use trigger_evaluator::{TriggerDecision, evaluate, fold_triggers};

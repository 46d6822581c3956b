//! Quiz session state machine

mod actions;
mod context;
mod engine;
mod guards;
mod snapshot;
mod state;

#[cfg(test)]
mod property_tests;

pub use context::*;
pub use engine::*;
pub use guards::{is_last_question, lives_exhausted, resolve_feedback_exit, FEEDBACK_RULES};
pub use snapshot::*;
pub use state::*;

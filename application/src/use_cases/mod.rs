//! Use cases (application services)

pub mod fan_out;
pub mod run_brainstorm;
pub mod run_council;
pub mod run_debate;
pub mod run_decision;

#[cfg(test)]
pub(crate) mod testing;

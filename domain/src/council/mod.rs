//! Council deliberation domain
//!
//! Pure logic for the three-stage protocol: result types, anonymization,
//! review parsing and aggregation, chairman selection, and the stage
//! state machine. No I/O happens here.

pub mod anonymizer;
pub mod chairman;
pub mod policy;
pub mod review_parser;
pub mod standings;
pub mod state;
pub mod value_objects;

//! Workflows layered on the three-stage protocol: decision support,
//! multi-round debate and brainstorming.

pub mod brainstorm;
pub mod debate;
pub mod decision;

//! Prompt domain
//!
//! Templates for each deliberation stage and for the decision, debate and
//! brainstorm workflows.

mod template;
mod workflow;

pub use template::PromptTemplate;
pub use workflow::{BrainstormPrompt, DebatePrompt, DecisionPrompt, debater_label, participant_label};

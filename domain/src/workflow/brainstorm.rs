//! Collaborative brainstorming value objects.
//!
//! Round 1 collects idea lists independently; every later round shows each
//! participant the round 1 ideas of the whole council, anonymized, and asks
//! for combinations and variations.

use crate::council::value_objects::ModelResponse;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BRAINSTORM_ROUNDS: usize = 2;

/// Lines this short are list noise, not ideas
const MIN_IDEA_CHARS: usize = 11;

/// Tone of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrainstormStyle {
    Wild,
    Practical,
    #[default]
    Balanced,
}

impl BrainstormStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrainstormStyle::Wild => "wild",
            BrainstormStyle::Practical => "practical",
            BrainstormStyle::Balanced => "balanced",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BrainstormStyle::Wild => "creative and unconventional",
            BrainstormStyle::Practical => "feasible and implementable",
            BrainstormStyle::Balanced => "mix of creative and practical",
        }
    }

    /// Guidance added to every idea prompt
    pub fn prompt_modifier(&self) -> &'static str {
        match self {
            BrainstormStyle::Wild => {
                "Be creative and unconventional. No idea is too wild. Think outside the box."
            }
            BrainstormStyle::Practical => {
                "Focus on practical, implementable ideas. Consider feasibility and resources."
            }
            BrainstormStyle::Balanced => {
                "Balance creativity with practicality. Include both innovative and achievable ideas."
            }
        }
    }

    /// Lower bound of the requested idea count (the upper bound is 10)
    pub fn idea_count(&self) -> usize {
        match self {
            BrainstormStyle::Wild => 7,
            BrainstormStyle::Practical | BrainstormStyle::Balanced => 5,
        }
    }
}

impl std::fmt::Display for BrainstormStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated brainstorming request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrainstormRequest {
    pub topic: String,
    /// Idea round plus `rounds - 1` cross-pollination rounds
    pub rounds: usize,
    pub style: BrainstormStyle,
}

impl BrainstormRequest {
    pub fn new(
        topic: impl Into<String>,
        rounds: usize,
        style: BrainstormStyle,
    ) -> Result<Self, DomainError> {
        if rounds == 0 {
            return Err(DomainError::NoRounds);
        }
        Ok(Self {
            topic: topic.into(),
            rounds,
            style,
        })
    }

    pub fn cross_pollination_rounds(&self) -> usize {
        self.rounds - 1
    }
}

/// Ideas one participant contributed in one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaList {
    pub model_name: String,
    pub ideas: Vec<String>,
}

/// Ideas from every successful response of a round, in roster order.
///
/// Failed responses contribute nothing; a successful answer without a
/// recognizable list still appears, with no ideas.
pub fn collect_ideas(responses: &[ModelResponse]) -> Vec<IdeaList> {
    responses
        .iter()
        .filter(|r| r.is_success())
        .map(|r| IdeaList {
            model_name: r.model_name.clone(),
            ideas: parse_ideas(&r.response),
        })
        .collect()
}

/// Extract list items from free text.
///
/// Accepts numbered items (`1.`, `2)`) and bullets (`-`, `*`, `•`). Items
/// shorter than a few words are dropped.
pub fn parse_ideas(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| list_item(line.trim()))
        .filter(|idea| idea.chars().count() >= MIN_IDEA_CHARS)
        .map(str::to_string)
        .collect()
}

fn list_item(line: &str) -> Option<&str> {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();

    let rest = if digits > 0 {
        line[digits..].strip_prefix(['.', ')'])?
    } else {
        let rest = line.strip_prefix(['-', '*', '•'])?;
        // "**Bold**" opens an emphasis span, not a bullet
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        rest
    };

    let item = rest.trim();
    (!item.is_empty()).then_some(item)
}

/// One round of the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainstormRound {
    /// 1-based round number
    pub round: usize,
    /// Raw answers, in roster order
    pub responses: Vec<ModelResponse>,
    /// Parsed ideas of the successful answers
    pub ideas: Vec<IdeaList>,
}

impl BrainstormRound {
    pub fn new(round: usize, responses: Vec<ModelResponse>) -> Self {
        let ideas = collect_ideas(&responses);
        Self {
            round,
            responses,
            ideas,
        }
    }

    pub fn idea_count(&self) -> usize {
        self.ideas.iter().map(|list| list.ideas.len()).sum()
    }
}

/// Complete result of a brainstorming session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainstormResult {
    pub topic: String,
    pub style: BrainstormStyle,
    /// Round 1 first
    pub rounds: Vec<BrainstormRound>,
    pub chairman_model: String,
    pub synthesis: String,
    pub total_latency_ms: f64,
}

impl BrainstormResult {
    /// The independent round 1 ideas
    pub fn initial_ideas(&self) -> &[IdeaList] {
        self.rounds
            .first()
            .map(|r| r.ideas.as_slice())
            .unwrap_or_default()
    }

    /// Rounds after the first
    pub fn cross_pollination(&self) -> &[BrainstormRound] {
        self.rounds.get(1..).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_must_be_positive() {
        assert_eq!(
            BrainstormRequest::new("t", 0, BrainstormStyle::Wild).unwrap_err(),
            DomainError::NoRounds
        );
        let request = BrainstormRequest::new("t", 3, BrainstormStyle::default()).unwrap();
        assert_eq!(request.style, BrainstormStyle::Balanced);
        assert_eq!(request.cross_pollination_rounds(), 2);
    }

    #[test]
    fn test_style_presets() {
        assert_eq!(BrainstormStyle::Wild.idea_count(), 7);
        assert_eq!(BrainstormStyle::Practical.idea_count(), 5);
        assert!(BrainstormStyle::Practical.prompt_modifier().contains("feasibility"));
        assert_eq!(BrainstormStyle::Balanced.to_string(), "balanced");
    }

    #[test]
    fn test_parse_numbered_and_bulleted_ideas() {
        let text = "Here are my ideas:\n\
            1. **Solar canopy**: Shade parking lots with panels\n\
            2) **Rain capture**: Store runoff for irrigation\n\
            3. Too short\n\
            - **Green roofs** (builds on Participant A's idea #1): Plant every roof\n\
            * **Bike corridors**: Protected lanes across town\n\
            • **Tool library**: Lend equipment instead of buying\n\
            **Not a bullet**: bold text on its own line\n\
            10. Community fridges on every block";

        let ideas = parse_ideas(text);
        assert_eq!(
            ideas,
            vec![
                "**Solar canopy**: Shade parking lots with panels",
                "**Rain capture**: Store runoff for irrigation",
                "**Green roofs** (builds on Participant A's idea #1): Plant every roof",
                "**Bike corridors**: Protected lanes across town",
                "**Tool library**: Lend equipment instead of buying",
                "Community fridges on every block",
            ]
        );
    }

    #[test]
    fn test_parse_ideas_without_list() {
        assert!(parse_ideas("I would rather not brainstorm today.").is_empty());
        assert!(parse_ideas("2024 was a good year").is_empty());
    }

    #[test]
    fn test_collect_skips_failures_keeps_empty_lists() {
        let responses = vec![
            ModelResponse::success("gpt", "1. A sufficiently long idea", 1.0),
            ModelResponse::failure("gemini", "Timeout after 5s", 5.0),
            ModelResponse::success("claude", "No list here", 1.0),
        ];
        let ideas = collect_ideas(&responses);

        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0].model_name, "gpt");
        assert_eq!(ideas[0].ideas, vec!["A sufficiently long idea"]);
        assert_eq!(ideas[1].model_name, "claude");
        assert!(ideas[1].ideas.is_empty());
    }

    #[test]
    fn test_result_round_accessors() {
        let result = BrainstormResult {
            topic: "t".to_string(),
            style: BrainstormStyle::Wild,
            rounds: vec![
                BrainstormRound::new(
                    1,
                    vec![ModelResponse::success("a", "1. First round idea\n2. Second round idea", 1.0)],
                ),
                BrainstormRound::new(2, vec![ModelResponse::success("a", "- A combined idea here", 1.0)]),
            ],
            chairman_model: "a".to_string(),
            synthesis: "s".to_string(),
            total_latency_ms: 1.0,
        };

        assert_eq!(result.initial_ideas()[0].ideas.len(), 2);
        assert_eq!(result.cross_pollination().len(), 1);
        assert_eq!(result.cross_pollination()[0].idea_count(), 1);
    }
}

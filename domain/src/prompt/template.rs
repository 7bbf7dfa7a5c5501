//! Prompt templates for the deliberation stages

use crate::council::policy::ScoringConfig;
use crate::council::standings::ResponseStanding;
use crate::council::value_objects::ModelResponse;

/// Feedback items per response shown to the chairman
const FEEDBACK_ITEMS: usize = 3;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for a plain question put to the council
    pub fn ask_system() -> &'static str {
        "Answer the following question thoroughly and accurately."
    }

    /// System prompt for stage 2 reviewers
    pub fn review_system() -> &'static str {
        "You are evaluating responses from other AI models. Be objective and thorough."
    }

    /// Stage 2 prompt: evaluate the given anonymized responses.
    ///
    /// `responses` are `(label, text)` pairs and never include the
    /// reviewer's own answer.
    pub fn peer_review_prompt(
        question: &str,
        responses: &[(String, String)],
        scoring: &ScoringConfig,
    ) -> String {
        let responses_text = responses
            .iter()
            .map(|(label, text)| format!("### {}\n{}", label, text))
            .collect::<Vec<_>>()
            .join("\n\n");

        let criteria_text = scoring
            .criteria
            .iter()
            .map(|c| format!("- **{}** (1-{})", title_case(c), scoring.scale))
            .collect::<Vec<_>>()
            .join("\n");

        let example_scores = scoring
            .criteria
            .iter()
            .map(|c| format!("\"{}\": 7", c))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"You are peer-reviewing responses to the following question:

## Original Question
{question}

## Responses to Evaluate
{responses_text}

## Your Task
For EACH response, provide:

1. **Scores** (1-{scale} for each criterion):
{criteria_text}

2. **Strengths**: What did this response do well? (2-3 bullet points)

3. **Weaknesses**: What did this response miss or could improve? (2-3 bullet points)

4. **Ranking**: Rank all responses from best to worst.

Format your evaluation as JSON:
```json
{{
  "evaluations": [
    {{
      "response_id": "Response A",
      "scores": {{{example_scores}}},
      "strengths": ["...", "..."],
      "weaknesses": ["...", "..."]
    }}
  ],
  "ranking": ["Response A", "Response B"]
}}
```
"#,
            scale = scoring.scale,
        )
    }

    /// System prompt for the stage 3 chairman
    pub fn synthesis_system() -> &'static str {
        "You are the Chairman of an LLM council. Synthesize all perspectives into a comprehensive final answer."
    }

    /// Stage 3 prompt.
    ///
    /// Unlike reviewers, the chairman sees the true model names. Failed
    /// responses are left out.
    pub fn synthesis_prompt(
        question: &str,
        responses: &[ModelResponse],
        standings: &[ResponseStanding],
    ) -> String {
        let responses_text = responses
            .iter()
            .filter(|r| r.is_success())
            .map(|r| format!("### {}\n{}", r.model_name, r.response))
            .collect::<Vec<_>>()
            .join("\n\n");

        let review_summary = Self::review_summary(standings);

        format!(
            r#"You are the Chairman of an LLM council. Multiple AI models have responded to a question, and each has peer-reviewed the others.

## Original Question
{question}

## Individual Responses
{responses_text}

## Peer Review Summary
{review_summary}

## Your Synthesis Task

Create a comprehensive final answer that:

1. **Consensus Points**: What did ALL or MOST models agree on? These are high-confidence findings.

2. **Disagreements**: Where did models differ? Explain the different perspectives and provide your resolution.

3. **Unique Insights**: Were there valuable points that only ONE model raised? Include these if they're valid.

4. **Final Answer**: Synthesize everything into a clear, actionable response to the original question.

Be decisive. Where models disagree, make a judgment call and explain your reasoning.
"#
        )
    }

    /// Markdown summary of stage 2 standings
    pub fn review_summary(standings: &[ResponseStanding]) -> String {
        if standings.is_empty() {
            return "No peer reviews available.".to_string();
        }

        let mut lines = vec![
            "### Average Scores\n".to_string(),
            "| Response | Model | Avg Score |".to_string(),
            "|----------|-------|-----------|".to_string(),
        ];
        for s in standings {
            lines.push(format!(
                "| {} | {} | {:.1} |",
                s.anonymous_id,
                s.display_model(),
                s.average_score
            ));
        }

        lines.push("\n### Key Feedback\n".to_string());
        for s in standings {
            lines.push(format!("**{} ({})**", s.anonymous_id, s.display_model()));
            if !s.strengths.is_empty() {
                lines.push(format!("- Strengths: {}", head(&s.strengths)));
            }
            if !s.weaknesses.is_empty() {
                lines.push(format!("- Weaknesses: {}", head(&s.weaknesses)));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

fn head(items: &[String]) -> String {
    items
        .iter()
        .take(FEEDBACK_ITEMS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("; ")
}

/// "code quality" -> "Code Quality"
pub(crate) fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(label: &str, model: Option<&str>, avg: f64) -> ResponseStanding {
        ResponseStanding {
            anonymous_id: label.to_string(),
            model_name: model.map(str::to_string),
            average_score: avg,
            review_count: 1,
            strengths: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            weaknesses: vec![],
        }
    }

    #[test]
    fn test_peer_review_prompt_contents() {
        let responses = vec![
            ("Response A".to_string(), "Rust is a systems language.".to_string()),
            ("Response B".to_string(), "Rust focuses on safety.".to_string()),
        ];
        let prompt =
            PromptTemplate::peer_review_prompt("What is Rust?", &responses, &ScoringConfig::default());

        assert!(prompt.contains("What is Rust?"));
        assert!(prompt.contains("### Response A\nRust is a systems language."));
        assert!(prompt.contains("### Response B"));
        assert!(prompt.contains("- **Accuracy** (1-10)"));
        assert!(prompt.contains("\"evaluations\""));
        assert!(prompt.contains("\"completeness\": 7"));
    }

    #[test]
    fn test_synthesis_prompt_skips_failed() {
        let responses = vec![
            ModelResponse::success("gpt", "Answer one", 1.0),
            ModelResponse::failure("gemini", "Timeout after 120s", 1.0),
        ];
        let prompt = PromptTemplate::synthesis_prompt("Q?", &responses, &[]);

        assert!(prompt.contains("### gpt\nAnswer one"));
        assert!(!prompt.contains("gemini"));
        assert!(prompt.contains("No peer reviews available."));
    }

    #[test]
    fn test_review_summary_table() {
        let summary = PromptTemplate::review_summary(&[
            standing("Response A", Some("claude"), 31.5),
            standing("Response B", None, 20.0),
        ]);

        assert!(summary.contains("| Response A | claude | 31.5 |"));
        assert!(summary.contains("| Response B | Unknown | 20.0 |"));
        assert!(summary.contains("- Strengths: a; b; c"));
        assert!(!summary.contains("; d"));
        assert!(!summary.contains("Weaknesses"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("accuracy"), "Accuracy");
        assert_eq!(title_case("code quality"), "Code Quality");
    }
}

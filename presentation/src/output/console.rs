//! Console output formatter for council results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use council_domain::core::string::truncate;
use council_domain::{
    AnonymousMapping, BrainstormResult, BrainstormRound, DebateResult, DecisionResult,
    DeliberationResult, ModelResponse, PeerReview,
};

/// Characters of an analysis' reasoning shown in full output
const REASONING_PREVIEW_CHARS: usize = 200;

/// Longest idea shown before truncation
const IDEA_PREVIEW_CHARS: usize = 100;

/// Formats council results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete deliberation result
    pub fn format(result: &DeliberationResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("LLM Council Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            result.prompt
        ));
        output.push_str(&format!(
            "{} {}  {} {}  {} {:.0}ms\n",
            "Council:".cyan().bold(),
            result.models().join(", "),
            "Chairman:".cyan().bold(),
            result.chairman_model,
            "Total time:".cyan().bold(),
            result.total_latency_ms
        ));

        output.push_str(&Self::section_header("Stage 1: Independent Responses"));
        output.push_str(&Self::responses(&result.stage_1_responses, true));

        if !result.stage_2_reviews.is_empty() {
            output.push_str(&Self::section_header("Stage 2: Peer Evaluation"));
            output.push_str(&Self::review_table(
                "Response",
                &result.stage_2_reviews,
                &result.anonymous_mapping,
            ));
        }

        output.push_str(&Self::section_header("Stage 3: Chairman Synthesis"));
        output.push_str(&result.stage_3_synthesis);
        output.push('\n');

        output.push_str(&Self::footer());
        output
    }

    /// Format only the chairman's answer
    pub fn format_synthesis_only(result: &DeliberationResult) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{}\n\n", "=== Council Answer ===".cyan().bold()));
        output.push_str(&format!("{} {}\n", "Q:".bold(), result.prompt));
        output.push_str(&format!(
            "{} {} | {} {}\n\n",
            "Council:".dimmed(),
            result.models().join(", "),
            "Chairman:".dimmed(),
            result.chairman_model
        ));

        if result.all_failed() {
            output.push_str(&format!(
                "{}\n",
                "Warning: every council member failed; the answer below has no input.".yellow()
            ));
        }

        output.push_str(&result.stage_3_synthesis);
        output.push('\n');
        output
    }

    /// Format every stage of a decision
    pub fn format_decision(result: &DecisionResult) -> String {
        let request = &result.request;
        let mut output = String::new();

        output.push_str(&Self::header("Council Decision Support"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n{} {}\n{} {}\n",
            "Decision:".cyan().bold(),
            request.decision,
            "Options:".cyan().bold(),
            request.options.join(", "),
            "Criteria:".cyan().bold(),
            request.criteria.join(", ")
        ));

        output.push_str(&Self::section_header("Individual Analyses"));
        for response in result.responses.iter().filter(|r| r.is_failed()) {
            output.push_str(&Self::failed_response(response));
        }
        for analysis in &result.analyses {
            output.push_str(&format!(
                "\n{}\n",
                format!("── {} Analysis ──", analysis.model_name).yellow().bold()
            ));

            if !analysis.scores.is_empty() {
                output.push_str(&format!(
                    "| Option | {} | Total |\n",
                    request.criteria.join(" | ")
                ));
                output.push_str(&format!(
                    "|--------|{}|-------|\n",
                    vec!["-------"; request.criteria.len()].join("|")
                ));
                for option in &request.options {
                    let cells: Vec<String> = request
                        .criteria
                        .iter()
                        .map(|c| {
                            analysis
                                .score(option, c)
                                .map_or_else(|| "-".to_string(), |s| s.to_string())
                        })
                        .collect();
                    output.push_str(&format!(
                        "| {} | {} | {} |\n",
                        option,
                        cells.join(" | "),
                        analysis.option_total(option, &request.criteria)
                    ));
                }
            }

            if !analysis.recommendation.is_empty() {
                output.push_str(&format!(
                    "{} {}\n",
                    "Recommendation:".bold(),
                    analysis.recommendation
                ));
            }
            if !analysis.reasoning.is_empty() {
                output.push_str(&format!(
                    "{} {}\n",
                    "Reasoning:".bold(),
                    truncate(&analysis.reasoning, REASONING_PREVIEW_CHARS)
                ));
            }
        }

        if !result.option_scores.is_empty() {
            output.push_str(&Self::section_header("Aggregate Scores"));
            output.push_str("| Option | Avg Score | Recommended By |\n");
            output.push_str("|--------|-----------|----------------|\n");
            for score in &result.option_scores {
                output.push_str(&format!(
                    "| {} | {:.1} | {} |\n",
                    score.option, score.average_score, score.recommendations
                ));
            }
        }

        if !result.reviews.is_empty() {
            output.push_str(&Self::section_header("Peer Evaluation"));
            output.push_str(&Self::review_table(
                "Analysis",
                &result.reviews,
                &result.anonymous_mapping,
            ));
        }

        output.push_str(&Self::section_header(&format!(
            "Council Recommendation ({})",
            result.chairman_model
        )));
        output.push_str(&result.recommendation);
        output.push('\n');

        output.push_str(&Self::footer());
        output
    }

    /// Format only the chairman's recommendation
    pub fn format_decision_summary(result: &DecisionResult) -> String {
        format!(
            "\n{}\n\n{} {}\n{} {}\n\n{}\n",
            "=== Council Recommendation ===".cyan().bold(),
            "Decision:".bold(),
            result.request.decision,
            "Options:".dimmed(),
            result.request.options.join(", "),
            result.recommendation
        )
    }

    /// Format every round of a debate
    pub fn format_debate(result: &DebateResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Council Debate"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Topic:".cyan().bold(), result.topic));

        output.push_str(&Self::section_header("Opening Statements"));
        output.push_str(&Self::responses(&result.opening, true));

        for (i, round) in result.rebuttals.iter().enumerate() {
            output.push_str(&Self::section_header(&format!("Rebuttal Round {}", i + 1)));
            output.push_str(&Self::responses(round, false));
        }

        if !result.reviews.is_empty() {
            output.push_str(&Self::section_header("Peer Evaluation"));
            output.push_str(&Self::review_table(
                "Debater",
                &result.reviews,
                &result.anonymous_mapping,
            ));
        }

        output.push_str(&Self::section_header(&format!(
            "Chairman Verdict ({})",
            result.chairman_model
        )));
        output.push_str(&result.verdict);
        output.push('\n');

        output.push_str(&Self::footer());
        output
    }

    /// Format only the verdict
    pub fn format_debate_summary(result: &DebateResult) -> String {
        format!(
            "\n{}\n\n{} {}\n{} {}\n\n{}\n",
            "=== Council Verdict ===".cyan().bold(),
            "Topic:".bold(),
            result.topic,
            "Judge:".dimmed(),
            result.chairman_model,
            result.verdict
        )
    }

    pub fn format_brainstorm(result: &BrainstormResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Council Brainstorm"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Topic:".cyan().bold(), result.topic));
        output.push_str(&format!("{} {}\n", "Style:".cyan().bold(), result.style));

        for round in &result.rounds {
            if round.round == 1 {
                output.push_str(&Self::section_header("Round 1: Initial Ideas"));
            } else {
                output.push_str(&Self::section_header(&format!(
                    "Round {}: Cross-Pollination",
                    round.round
                )));
            }
            output.push_str(&Self::idea_lists(round));
        }

        output.push_str(&Self::section_header(&format!(
            "Synthesized Ideas (Chairman: {})",
            result.chairman_model
        )));
        output.push_str(&result.synthesis);
        output.push('\n');

        output.push_str(&Self::footer());
        output
    }

    pub fn format_brainstorm_summary(result: &BrainstormResult) -> String {
        format!(
            "\n{}\n\n{} {}\n{} {}\n{} {}\n\n{}\n",
            "=== Council Brainstorm ===".cyan().bold(),
            "Topic:".bold(),
            result.topic,
            "Style:".dimmed(),
            result.style,
            "Chairman:".dimmed(),
            result.chairman_model,
            result.synthesis
        )
    }

    /// Numbered ideas in round 1, bullets afterwards; failures only in round 1
    fn idea_lists(round: &BrainstormRound) -> String {
        let mut output = String::new();
        for list in &round.ideas {
            let title = format!("── {} ({} ideas) ──", list.model_name, list.ideas.len());
            output.push_str(&format!("\n{}\n", title.yellow().bold()));
            for (i, idea) in list.ideas.iter().enumerate() {
                let idea = truncate(idea, IDEA_PREVIEW_CHARS);
                if round.round == 1 {
                    output.push_str(&format!("{}. {}\n", i + 1, idea));
                } else {
                    output.push_str(&format!("- {}\n", idea));
                }
            }
        }
        if round.round == 1 {
            for failed in round.responses.iter().filter(|r| r.is_failed()) {
                output.push_str(&Self::failed_response(failed));
            }
        }
        output
    }

    /// Responses in roster order; failures shown only when `show_failed`
    fn responses(responses: &[ModelResponse], show_failed: bool) -> String {
        let mut output = String::new();
        for response in responses {
            if response.is_success() {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", response.model_name).yellow().bold(),
                    response.response
                ));
            } else if show_failed {
                output.push_str(&Self::failed_response(response));
            }
        }
        output
    }

    fn failed_response(response: &ModelResponse) -> String {
        format!(
            "\n{}\n{} {}\n",
            format!("── {} (ERROR) ──", response.model_name).red().bold(),
            "Error:".red(),
            response.error.as_deref().unwrap_or("Unknown")
        )
    }

    fn review_table(subject: &str, reviews: &[PeerReview], mapping: &AnonymousMapping) -> String {
        let mut output = format!("| {} | Reviewer | Score |\n", subject);
        output.push_str("|----------|----------|-------|\n");
        for review in reviews {
            output.push_str(&format!(
                "| {} ({}) | {} | {} |\n",
                review.reviewed_anonymous_id,
                mapping
                    .model_for(&review.reviewed_anonymous_id)
                    .unwrap_or("?"),
                review.reviewer_model,
                review.total_score
            ));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter<DeliberationResult> for ConsoleFormatter {
    fn format(&self, result: &DeliberationResult) -> String {
        Self::format(result)
    }

    fn format_synthesis_only(&self, result: &DeliberationResult) -> String {
        Self::format_synthesis_only(result)
    }
}

impl OutputFormatter<DecisionResult> for ConsoleFormatter {
    fn format(&self, result: &DecisionResult) -> String {
        Self::format_decision(result)
    }

    fn format_synthesis_only(&self, result: &DecisionResult) -> String {
        Self::format_decision_summary(result)
    }
}

impl OutputFormatter<DebateResult> for ConsoleFormatter {
    fn format(&self, result: &DebateResult) -> String {
        Self::format_debate(result)
    }

    fn format_synthesis_only(&self, result: &DebateResult) -> String {
        Self::format_debate_summary(result)
    }
}

impl OutputFormatter<BrainstormResult> for ConsoleFormatter {
    fn format(&self, result: &BrainstormResult) -> String {
        Self::format_brainstorm(result)
    }

    fn format_synthesis_only(&self, result: &BrainstormResult) -> String {
        Self::format_brainstorm_summary(result)
    }
}

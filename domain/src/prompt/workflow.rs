//! Prompts for the decision, debate and brainstorm workflows

use crate::council::value_objects::ModelResponse;
use crate::workflow::brainstorm::{BrainstormRound, BrainstormStyle, IdeaList};
use crate::workflow::decision::OptionAnalysis;

/// Ideas per participant shown during cross-pollination
const SHARED_IDEAS_PER_PARTICIPANT: usize = 5;

/// Prompt builders for `decide`
pub struct DecisionPrompt;

impl DecisionPrompt {
    pub fn analyst_system() -> &'static str {
        "You are a technical analyst. Provide objective, evidence-based analysis."
    }

    pub fn advisor_system() -> &'static str {
        "You are a senior technical advisor making a final recommendation."
    }

    pub fn analysis_prompt(decision: &str, options: &[String], criteria: &[String]) -> String {
        let options_list = bullet_list(options);
        let criteria_list = bullet_list(criteria);

        format!(
            r#"You are evaluating options for a decision.

## Decision
{decision}

## Options to Evaluate
{options_list}

## Evaluation Criteria
{criteria_list}

## Your Task

1. **Score each option** (1-10) for each criterion

2. **List pros and cons** for each option (3-4 each)

3. **Provide your recommendation** with reasoning

Format your response as JSON:
```json
{{
  "scores": {{
    "Option1": {{"criterion1": 8, "criterion2": 7}},
    "Option2": {{"criterion1": 6, "criterion2": 9}}
  }},
  "pros_cons": {{
    "Option1": {{"pros": ["..."], "cons": ["..."]}},
    "Option2": {{"pros": ["..."], "cons": ["..."]}}
  }},
  "recommendation": "Option1",
  "reasoning": "Your detailed reasoning here..."
}}
```

Be objective and thorough. Consider real-world implications.
"#
        )
    }

    /// Short prompt shown to peer reviewers of the analyses
    pub fn review_context(decision: &str, options: &[String]) -> String {
        format!("Decision: {}\nOptions: {}", decision, options.join(", "))
    }

    pub fn recommendation_prompt(
        decision: &str,
        options: &[String],
        analyses: &[OptionAnalysis],
    ) -> String {
        let analyses_text = analyses
            .iter()
            .map(|a| {
                format!(
                    "### {}\nRecommendation: {}\nReasoning: {}",
                    a.model_name,
                    or_na(&a.recommendation),
                    or_na(&a.reasoning)
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        let options = options.join(", ");

        format!(
            r#"You are synthesizing decision analyses from multiple AI models.

## Decision
{decision}

## Options
{options}

## Individual Analyses
{analyses_text}

## Your Task

Provide the final recommendation:

1. **Aggregated Scores**: Average scores across all models per option
2. **Consensus Points**: What do all models agree on?
3. **Contested Points**: Where do models disagree? Resolve these.
4. **Final Recommendation**: Which option is best? With confidence level.
5. **When to Choose Differently**: Situations where other options make sense.

Be decisive but acknowledge trade-offs.
"#
        )
    }
}

/// Prompt builders for `debate`
pub struct DebatePrompt;

impl DebatePrompt {
    pub fn opening_system() -> &'static str {
        "You are participating in a structured debate. Present your position clearly with evidence."
    }

    pub fn rebuttal_system() -> &'static str {
        "You are in the rebuttal phase. Address counterarguments and strengthen your position."
    }

    pub fn judge_system() -> &'static str {
        "You are a fair and analytical debate judge."
    }

    pub fn opening_prompt(topic: &str) -> String {
        format!(
            r#"You are participating in a structured debate on the following topic:

## Topic
{topic}

## Your Task
Present your opening statement:
1. **State your position** clearly (pro, con, or nuanced view)
2. **Provide 3-4 key arguments** supporting your position
3. **Include evidence or examples** for each argument
4. **Anticipate counterarguments** briefly

Keep your response focused and persuasive. You do not know what positions other debaters will take.
"#
        )
    }

    pub fn rebuttal_prompt(topic: &str, history: &str, round: usize) -> String {
        format!(
            r#"## Debate Topic
{topic}

## Previous Arguments (Anonymized)
{history}

## Rebuttal Round {round}

Now respond to the other positions:
1. **Address the strongest counterarguments** to your position
2. **Point out weaknesses** in opposing arguments
3. **Strengthen your case** with additional evidence
4. **Find common ground** where possible

Be respectful but incisive. Focus on the arguments, not the debaters.
"#
        )
    }

    /// Render one round for the next round's prompt.
    ///
    /// Debaters are labelled by roster position; failed entries keep their
    /// letter but are left out.
    pub fn anonymized_round(responses: &[ModelResponse]) -> String {
        responses
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_success())
            .map(|(i, r)| format!("### {}\n{}\n", debater_label(i), r.response))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn verdict_prompt(
        topic: &str,
        opening: &[ModelResponse],
        rebuttals: &[Vec<ModelResponse>],
    ) -> String {
        let mut arguments = format!("## Opening Statements\n{}", named_round(opening));
        for (i, round) in rebuttals.iter().enumerate() {
            arguments.push_str(&format!(
                "\n## Rebuttal Round {}\n{}",
                i + 1,
                named_round(round)
            ));
        }

        format!(
            r#"You are the Chairman of this debate. Review all arguments and provide your verdict.

## Topic
{topic}

{arguments}

## Your Verdict

Provide:
1. **Strongest Arguments Per Position**: What were the best points on each side?
2. **Areas of Agreement**: What did all debaters agree on?
3. **Key Disagreements**: Where did they fundamentally differ?
4. **Your Verdict**: Based on argument quality, which position is most defensible? Why?

Be balanced but decisive. It's okay to declare a winner if one position was clearly stronger.
"#
        )
    }
}

/// Prompt builders for `brainstorm`
pub struct BrainstormPrompt;

impl BrainstormPrompt {
    pub fn ideation_system(style: BrainstormStyle) -> String {
        format!("You are brainstorming. {}", style.prompt_modifier())
    }

    pub fn cross_pollination_system() -> &'static str {
        "Build on others' ideas. Combine, improve, and generate new variations."
    }

    pub fn synthesis_system() -> &'static str {
        "You are synthesizing brainstorming results into actionable insights."
    }

    pub fn ideation_prompt(topic: &str, style: BrainstormStyle) -> String {
        let idea_count = style.idea_count();
        let modifier = style.prompt_modifier();

        format!(
            r#"## Brainstorming Topic
{topic}

## Your Task
Generate {idea_count}-10 ideas related to this topic.

Guidelines:
- {modifier}
- Don't filter yourself - include all ideas that come to mind
- Brief description for each (1-2 sentences)
- Number your ideas

Format:
1. **[Idea Title]**: Brief description
2. **[Idea Title]**: Brief description
...
"#
        )
    }

    /// `round` is the 1-based number of the round being asked for
    pub fn cross_pollination_prompt(topic: &str, initial: &[IdeaList], round: usize) -> String {
        let shared: String = initial
            .iter()
            .enumerate()
            .map(|(i, list)| {
                let ideas: String = list
                    .ideas
                    .iter()
                    .take(SHARED_IDEAS_PER_PARTICIPANT)
                    .enumerate()
                    .map(|(j, idea)| format!("{}. {}\n", j + 1, idea))
                    .collect();
                format!("\n### {}\n{}", participant_label(i), ideas)
            })
            .collect();

        format!(
            r#"## Brainstorming Topic
{topic}

## Ideas from Other Participants
{shared}

## Round {round}: Cross-Pollination

Now that you've seen others' ideas:
1. **Build on** 1-2 promising ideas from others
2. **Combine** ideas from different participants
3. **Generate** 2-3 new variations or improvements

Format each as:
- **[Idea Title]** (builds on Participant X's idea #Y): Description
- **[Combined Idea]** (combines X#1 + Y#2): Description
- **[New Variation]**: Description
"#
        )
    }

    pub fn synthesis_prompt(topic: &str, rounds: &[BrainstormRound]) -> String {
        let all_ideas: String = rounds
            .iter()
            .map(|round| {
                let lists: String = round
                    .ideas
                    .iter()
                    .map(|list| {
                        let ideas: String = list
                            .ideas
                            .iter()
                            .enumerate()
                            .map(|(i, idea)| format!("{}. {}\n", i + 1, idea))
                            .collect();
                        format!("\n### {}\n{}", list.model_name, ideas)
                    })
                    .collect();
                format!("## Round {} Ideas\n{}\n", round.round, lists)
            })
            .collect();

        format!(
            r#"You are synthesizing a brainstorming session.

## Topic
{topic}

{all_ideas}
## Your Task

Create a synthesized output:

1. **Cluster Ideas**: Group related ideas into 3-5 themes

2. **Top Ideas by Category**:
   - High-Impact, Low-Effort (quick wins)
   - High-Impact, Medium-Effort (major initiatives)
   - Innovative/Long-term (future possibilities)

3. **Best Combinations**: Highlight the best hybrid ideas that emerged

4. **Recommended Next Steps**: What should be done first?

Be concise but comprehensive. Prioritize quality over quantity.
"#
        )
    }
}

/// "Participant A", "Participant B", ...
pub fn participant_label(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    format!("Participant {}", letter)
}

/// "Debater A", "Debater B", ...
pub fn debater_label(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    format!("Debater {}", letter)
}

fn named_round(responses: &[ModelResponse]) -> String {
    responses
        .iter()
        .filter(|r| r.is_success())
        .map(|r| format!("\n### {}\n{}\n", r.model_name, r.response))
        .collect()
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("- {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

fn or_na(s: &str) -> &str {
    if s.is_empty() { "N/A" } else { s }
}

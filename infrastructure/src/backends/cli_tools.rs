//! Per-tool argument building and output normalization

use super::capabilities::CliTool;
use super::cli_runner::{CliOutput, run_command};
use council_application::GatewayError;
use council_domain::GenerationSettings;
use serde_json::Value;
use std::path::Path;

/// Command-line arguments for a one-shot, non-interactive answer
pub fn build_args(tool: CliTool, prompt: &str, workdir: &str) -> Vec<String> {
    let args: Vec<&str> = match tool {
        CliTool::Codex => vec![
            "exec",
            "--full-auto",
            "--json",
            "--sandbox",
            "read-only",
            "--skip-git-repo-check",
            "--cd",
            workdir,
            prompt,
        ],
        CliTool::Gemini => vec![
            prompt,
            "--output-format",
            "json",
            "--approval-mode",
            "yolo",
        ],
        CliTool::Claude => vec!["--print", "--dangerously-skip-permissions", prompt],
    };
    args.into_iter().map(str::to_string).collect()
}

/// Extract the answer text from a tool's stdout
pub fn normalize_output(tool: CliTool, stdout: &str) -> String {
    match tool {
        CliTool::Codex => last_assistant_message(stdout),
        CliTool::Gemini => gemini_response(stdout),
        CliTool::Claude => stdout.trim().to_string(),
    }
}

/// Newline-delimited events: the last assistant message wins.
///
/// Records with `"type":"message","role":"assistant"` contribute their
/// `content`; any other record carrying a `message` string contributes
/// that. Lines that are not JSON are taken as text. Falls back to the raw
/// trimmed output when nothing matched.
pub fn last_assistant_message(stdout: &str) -> String {
    let mut text = String::new();

    for line in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match serde_json::from_str::<Value>(line) {
            Ok(event) => {
                let is_assistant = event.get("type").and_then(Value::as_str) == Some("message")
                    && event.get("role").and_then(Value::as_str) == Some("assistant");

                if is_assistant {
                    text = event
                        .get("content")
                        .map(value_text)
                        .unwrap_or_default();
                } else if let Some(message) = event.get("message") {
                    text = value_text(message);
                }
            }
            Err(_) => text = line.to_string(),
        }
    }

    if text.is_empty() {
        stdout.trim().to_string()
    } else {
        text
    }
}

/// Single JSON object with `response` (or `text`); raw output otherwise
fn gemini_response(stdout: &str) -> String {
    let trimmed = stdout.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(data) => data
            .get("response")
            .or_else(|| data.get("text"))
            .map(value_text)
            .unwrap_or_else(|| data.to_string()),
        Err(_) => trimmed.to_string(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Join system and user prompt for tools without a system channel
pub fn combine_prompt(prompt: &str, system_prompt: Option<&str>) -> String {
    match system_prompt {
        Some(system) if !system.is_empty() => format!("{}\n\n{}", system, prompt),
        _ => prompt.to_string(),
    }
}

/// Run a tool and return its normalized answer.
///
/// A non-zero exit or an empty answer is a failure carrying stderr, or
/// "<Tool> returned no response" when stderr is empty.
pub async fn invoke_tool(
    tool: CliTool,
    program: &Path,
    prompt: &str,
    settings: &GenerationSettings,
) -> Result<String, GatewayError> {
    let args = build_args(tool, prompt, &settings.workdir);
    let output = run_command(
        program,
        &args,
        Path::new(&settings.workdir),
        settings.timeout(),
    )
    .await?;

    usable_answer(tool, &output)
}

fn usable_answer(tool: CliTool, output: &CliOutput) -> Result<String, GatewayError> {
    let text = normalize_output(tool, &output.stdout);
    if output.success && !text.is_empty() {
        return Ok(text);
    }

    let reason = if output.stderr.trim().is_empty() {
        format!("{} returned no response", tool.display_name())
    } else {
        output.stderr.trim().to_string()
    };
    Err(GatewayError::CliFailed {
        tool: tool.command().to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codex_args() {
        let args = build_args(CliTool::Codex, "hi", "/tmp");
        assert_eq!(args[0], "exec");
        assert!(args.contains(&"--json".to_string()));
        let cd = args.iter().position(|a| a == "--cd").unwrap();
        assert_eq!(args[cd + 1], "/tmp");
        assert_eq!(args.last().unwrap(), "hi");
    }

    #[test]
    fn test_gemini_and_claude_args() {
        let gemini = build_args(CliTool::Gemini, "hi", ".");
        assert_eq!(gemini[0], "hi");
        assert_eq!(gemini[1..3], ["--output-format".to_string(), "json".to_string()]);

        let claude = build_args(CliTool::Claude, "hi", ".");
        assert_eq!(claude, vec!["--print", "--dangerously-skip-permissions", "hi"]);
    }

    #[test]
    fn test_last_assistant_message_wins() {
        let stdout = r#"{"type":"session","id":"1"}
{"type":"message","role":"assistant","content":"first"}
{"type":"tool","name":"read"}
{"type":"message","role":"assistant","content":"second"}
"#;
        assert_eq!(last_assistant_message(stdout), "second");
    }

    #[test]
    fn test_message_field_counts() {
        let stdout = r#"{"type":"agent_message","message":"from message field"}"#;
        assert_eq!(last_assistant_message(stdout), "from message field");
    }

    #[test]
    fn test_raw_fallback() {
        assert_eq!(last_assistant_message("  plain text answer \n"), "plain text answer");
        assert_eq!(last_assistant_message(r#"{"type":"session"}"#), r#"{"type":"session"}"#);
    }

    #[test]
    fn test_gemini_response_field() {
        assert_eq!(
            normalize_output(CliTool::Gemini, r#"{"response":"hello","stats":{}}"#),
            "hello"
        );
        assert_eq!(normalize_output(CliTool::Gemini, r#"{"text":"hi"}"#), "hi");
        assert_eq!(normalize_output(CliTool::Gemini, "not json"), "not json");
    }

    #[test]
    fn test_combine_prompt() {
        assert_eq!(combine_prompt("Q", Some("S")), "S\n\nQ");
        assert_eq!(combine_prompt("Q", None), "Q");
    }

    #[test]
    fn test_usable_answer() {
        let ok = CliOutput {
            success: true,
            exit_code: Some(0),
            stdout: "answer".to_string(),
            stderr: String::new(),
        };
        assert_eq!(usable_answer(CliTool::Claude, &ok).unwrap(), "answer");

        let empty = CliOutput {
            stdout: "  ".to_string(),
            ..ok.clone()
        };
        assert_eq!(
            usable_answer(CliTool::Claude, &empty).unwrap_err(),
            GatewayError::CliFailed {
                tool: "claude".to_string(),
                reason: "Claude returned no response".to_string()
            }
        );

        let failed = CliOutput {
            success: false,
            exit_code: Some(1),
            stdout: "partial".to_string(),
            stderr: "auth required".to_string(),
        };
        let err = usable_answer(CliTool::Claude, &failed).unwrap_err();
        assert_eq!(err.to_string(), "claude failed: auth required");
    }
}

//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use council_domain::workflow::brainstorm::DEFAULT_BRAINSTORM_ROUNDS;
use council_domain::workflow::debate::DEFAULT_ROUNDS;
use std::path::PathBuf;

/// Output format for council results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every stage: responses, peer reviews and the synthesis
    Full,
    /// Only the final synthesis
    Synthesis,
    /// JSON output
    Json,
}

impl From<OutputFormat> for council_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => council_domain::OutputFormat::Full,
            OutputFormat::Synthesis => council_domain::OutputFormat::Synthesis,
            OutputFormat::Json => council_domain::OutputFormat::Json,
        }
    }
}

/// Brainstorming style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BrainstormStyle {
    /// Creative and unconventional
    Wild,
    /// Feasible and implementable
    Practical,
    /// A mix of creative and practical
    #[default]
    Balanced,
}

impl From<BrainstormStyle> for council_domain::BrainstormStyle {
    fn from(style: BrainstormStyle) -> Self {
        match style {
            BrainstormStyle::Wild => council_domain::BrainstormStyle::Wild,
            BrainstormStyle::Practical => council_domain::BrainstormStyle::Practical,
            BrainstormStyle::Balanced => council_domain::BrainstormStyle::Balanced,
        }
    }
}

/// CLI arguments for llm-council
#[derive(Parser, Debug)]
#[command(name = "llm-council")]
#[command(author, version, about = "LLM Council - several models answer, review each other, and a chairman decides")]
#[command(long_about = r#"
llm-council puts a question to a council of LLM backends.

The process has three stages:
1. Independent responses: every model answers in parallel
2. Peer review: each model scores the others' answers, anonymized
3. Synthesis: a chairman model merges everything into a final answer

Backends are reached through their local CLI tool (codex, gemini, claude)
when installed, and through their HTTP API otherwise.

Configuration files are loaded from (in priority order):
1. LLM_COUNCIL_* environment variables
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/llm-council/config.toml   Global config

Example:
  llm-council ask "What's the best way to handle errors in Rust?"
  llm-council decide "Which database?" --options postgres,sqlite,mongodb
  llm-council debate "Monorepo or polyrepo?" --rounds 3
  llm-council brainstorm "Onboarding ideas" --style wild
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Restrict the council to these models (can be specified multiple times)
    #[arg(short, long, value_name = "MODEL", global = true)]
    pub model: Vec<String>,

    /// Output format (defaults to the config file setting, then synthesis)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long, global = true)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask the council a question
    Ask(AskArgs),
    /// Compare options against criteria and get a recommendation
    Decide(DecideArgs),
    /// Hold a multi-round debate judged by the chairman
    Debate(DebateArgs),
    /// Generate ideas together, then let the chairman cluster them
    Brainstorm(BrainstormArgs),
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question (read from stdin when omitted)
    pub question: Option<String>,

    /// Skip the peer review stage
    #[arg(long)]
    pub quick: bool,

    /// Pin the chairman to this model
    #[arg(long, value_name = "MODEL")]
    pub chairman: Option<String>,
}

#[derive(Args, Debug)]
pub struct DecideArgs {
    /// The decision to make (read from stdin when omitted)
    pub decision: Option<String>,

    /// Options to compare
    #[arg(long, value_delimiter = ',', required = true, value_name = "A,B,...")]
    pub options: Vec<String>,

    /// Evaluation criteria (defaults to a general-purpose set)
    #[arg(long, value_delimiter = ',', value_name = "X,Y,...")]
    pub criteria: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DebateArgs {
    /// The debate topic (read from stdin when omitted)
    pub topic: Option<String>,

    /// Total rounds, opening statements included
    #[arg(long, default_value_t = DEFAULT_ROUNDS)]
    pub rounds: usize,
}

#[derive(Args, Debug)]
pub struct BrainstormArgs {
    /// The brainstorming topic (read from stdin when omitted)
    pub topic: Option<String>,

    /// Total rounds, the initial idea round included
    #[arg(long, default_value_t = DEFAULT_BRAINSTORM_ROUNDS)]
    pub rounds: usize,

    /// Brainstorming style
    #[arg(long, value_enum, default_value_t = BrainstormStyle::Balanced)]
    pub style: BrainstormStyle,
}

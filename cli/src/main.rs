//! CLI entrypoint for llm-council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{
    CouncilEngine, NoProgress, ProgressNotifier, RunBrainstormUseCase, RunCouncilInput,
    RunDebateUseCase, RunDecisionUseCase,
};
use council_domain::{BrainstormRequest, DebateRequest, DecisionRequest, PromptTemplate};
use council_infrastructure::{ConfigLoader, ConfigSources, FallbackGateway, FileConfig};
use council_presentation::{Cli, Command, ConsoleFormatter, OutputFormatter, ProgressReporter};
use std::io::{IsTerminal, Read};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    info!("Starting llm-council");

    if cli.show_config {
        let sources = if cli.no_config {
            ConfigSources::default()
        } else {
            ConfigSources::discover(cli.config.as_deref())
        };
        ConfigLoader::print_config_sources(&sources);

        let config = load_config(&cli)?;
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
        for issue in config.validate() {
            println!("{}", issue);
        }
        return Ok(());
    }

    let Some(command) = cli.command.as_ref() else {
        bail!("No command given. Try: llm-council ask \"<question>\"");
    };

    // === Configuration ===
    let mut config = load_config(&cli)?;

    if !cli.model.is_empty() {
        let unknown = config.restrict_models(&cli.model);
        if !unknown.is_empty() {
            bail!("Unknown model(s): {}", unknown.join(", "));
        }
    }

    if let Command::Ask(args) = command
        && let Some(chairman) = &args.chairman
    {
        config.council.chairman_strategy = "fixed".to_string();
        config.council.chairman_fixed_model = Some(chairman.clone());
    }

    for issue in ConfigLoader::check(&config)? {
        warn!("{}", issue);
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    let format = config.output.resolve_format(cli.output.map(Into::into));

    // === Dependency Injection ===
    let gateway = Arc::new(FallbackGateway::new(config.generation_settings()));
    info!(
        "CLI tools available: {:?}",
        gateway.capabilities().available()
    );

    let engine = Arc::new(CouncilEngine::new(
        gateway,
        config.roster(),
        config.policy(),
    ));

    let progress: Box<dyn ProgressNotifier> = if cli.quiet || format.is_machine_readable() {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    // === Dispatch ===
    match command {
        Command::Ask(args) => {
            let question = read_input(args.question.as_deref(), "question")?;
            let mut input =
                RunCouncilInput::new(question).with_system_prompt(PromptTemplate::ask_system());
            if args.quick {
                input = input.without_peer_review();
            }

            let result = engine
                .execute_with_progress(input, progress.as_ref())
                .await?;
            println!("{}", ConsoleFormatter.render(&result, format));

            if result.all_failed() {
                bail!("Every council member failed");
            }
        }
        Command::Decide(args) => {
            let decision = read_input(args.decision.as_deref(), "decision")?;
            let criteria = (!args.criteria.is_empty()).then(|| args.criteria.clone());
            let request = DecisionRequest::new(decision, args.options.clone(), criteria)?;

            let result = RunDecisionUseCase::new(Arc::clone(&engine))
                .execute_with_progress(request, progress.as_ref())
                .await?;
            println!("{}", ConsoleFormatter.render(&result, format));
        }
        Command::Debate(args) => {
            let topic = read_input(args.topic.as_deref(), "topic")?;
            let request = DebateRequest::new(topic, args.rounds)?;

            let result = RunDebateUseCase::new(Arc::clone(&engine))
                .execute_with_progress(request, progress.as_ref())
                .await?;
            println!("{}", ConsoleFormatter.render(&result, format));
        }
        Command::Brainstorm(args) => {
            let topic = read_input(args.topic.as_deref(), "topic")?;
            let request = BrainstormRequest::new(topic, args.rounds, args.style.into())?;

            let result = RunBrainstormUseCase::new(Arc::clone(&engine))
                .execute_with_progress(request, progress.as_ref())
                .await?;
            println!("{}", ConsoleFormatter.render(&result, format));
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    Ok(ConfigLoader::load(cli.config.as_deref())?)
}

/// Use the argument, or read piped stdin when it is omitted
fn read_input(arg: Option<&str>, what: &str) -> Result<String> {
    if let Some(text) = arg.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(text.to_string());
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("No {} provided", what);
    }

    let mut buffer = String::new();
    stdin
        .read_to_string(&mut buffer)
        .with_context(|| format!("failed to read {} from stdin", what))?;

    let text = buffer.trim();
    if text.is_empty() {
        bail!("No {} provided", what);
    }
    Ok(text.to_string())
}

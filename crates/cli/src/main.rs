//! Zade CLI - Voice Command Assistant
//!
//! Runs the dispatch loop against terminal input and console/speech output, or answers a
//! single utterance and exits.

mod config;
mod output;
mod repl;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zade::{dispatch::apply_deferred, DispatchLoop, LoopSettings, OutputSink, ZadeConfig};

use crate::output::ConsoleOutput;

/// Zade - rule-based voice command assistant
#[derive(Parser)]
#[command(name = "zade")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Voice command assistant with rule-based intents and generative fallback")]
#[command(long_about = r#"
Zade matches what you say against an ordered table of trigger phrases (weather, time,
jokes, translation, search, websites, applications, news, currency, summaries, media)
and hands anything else to a language model.

Examples:
  zade                               # Start an interactive session
  zade ask "weather in london"       # Answer one utterance and exit
  zade rules                         # Show the rule table
  zade config --show                 # Show the effective configuration
"#)]
struct Cli {
    /// Configuration file (defaults to ~/.zade/config.toml)
    #[arg(short, long, env = "ZADE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print replies without speaking them
    #[arg(long)]
    no_speech: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    Run,

    /// Resolve and answer a single utterance
    Ask {
        /// The utterance, e.g. "currency 100 usd eur"
        #[arg(required = true, num_args = 1..)]
        utterance: Vec<String>,
    },

    /// Print the effective rule table
    Rules,

    /// Configuration management
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Print the configuration file path
        #[arg(long)]
        path: bool,

        /// Write a default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads env-backed flags
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the conversation
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("zade={0},zade_cli={0},warn", log_level).into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config_path = config::resolve_path(cli.config.as_deref());

    if let Some(Commands::Config { path: true, .. }) = cli.command {
        println!("{}", config_path.display());
        return Ok(());
    }
    if let Some(Commands::Config { init: true, .. }) = cli.command {
        config::write_default(&config_path)?;
        output::print_info(&format!("Wrote {}", config_path.display()));
        return Ok(());
    }

    let mut settings = config::load(&config_path)?;
    if cli.no_speech {
        settings.speech.enabled = false;
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_session(&settings).await?,
        Commands::Ask { utterance } => ask(&settings, &utterance.join(" ")).await?,
        Commands::Rules => {
            let engine = zade::Engine::from_config(&settings);
            output::print_rules(engine.rules());
        }
        Commands::Config { .. } => print!("{}", config::render(&settings)?),
    }

    Ok(())
}

async fn run_session(settings: &ZadeConfig) -> Result<()> {
    let (engine, ctx) = zade::initialize(settings)?;
    if !generator_ready(settings) {
        output::print_warning(
            "No OpenAI API key found; unmatched requests will get the apology reply.",
        );
    }

    let output = ConsoleOutput::new(settings);
    output.print_banner(engine.rules().len());

    let dispatch = DispatchLoop::new(
        &engine,
        &ctx,
        Box::new(repl::ConsoleInput::spawn()),
        Box::new(output),
        LoopSettings::from_config(settings),
    );

    tokio::select! {
        summary = dispatch.run() => {
            info!(turns = summary.turns, "Session ended");
        }
        _ = tokio::signal::ctrl_c() => {
            println!();
            info!("Interrupted; session ended");
        }
    }

    Ok(())
}

async fn ask(settings: &ZadeConfig, utterance: &str) -> Result<()> {
    let (engine, ctx) = zade::initialize(settings)?;
    let mut output = ConsoleOutput::new(settings);

    let (normalized, matched) = engine.resolve(utterance);
    if normalized.is_empty() {
        anyhow::bail!("Nothing to answer");
    }
    if matched.intent.is_terminal() {
        output.deliver(&settings.assistant.farewell).await;
        return Ok(());
    }

    let result = engine.invoke(&ctx, &normalized, &matched).await;
    output.deliver(&result.text).await;
    apply_deferred(&ctx, &result.effect).await;
    Ok(())
}

/// The OpenAI backend needs a key unless a custom endpoint is set
fn generator_ready(settings: &ZadeConfig) -> bool {
    let generation = &settings.generation;
    generation.provider != zade::config::GenerationProvider::OpenAI
        || generation.api_key.is_some()
        || generation.endpoint.is_some()
}

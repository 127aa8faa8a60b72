//! Repurpose CLI - thread splitting and prompt screening from the shell.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use prompt_guard::{validate_ai_output, FieldKind};
use repurpose::{process_drafts, DraftSet, FieldRules, GenerationError};
use thread_splitter::{split_x_thread_with_stats, SplitterConfig};

/// Repurpose CLI - split drafts into X threads and screen prompt text.
#[derive(Parser)]
#[command(name = "repurpose")]
#[command(about = "Thread splitting and prompt screening for repurposed content")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split text into an X thread
    Split {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,

        #[command(flatten)]
        limits: Limits,

        /// Print tweets, lengths and block mode as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate user input for a prompt field (exit 1 if rejected)
    CheckInput {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,

        /// Which field the text is for
        #[arg(long, value_enum, default_value = "content")]
        kind: FieldArg,
    },

    /// Screen model output for prompt leaks (exit 1 if rejected)
    CheckOutput {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// Screen a model reply of platform drafts and split its X draft
    Process {
        /// JSON file keyed by platform (stdin if omitted)
        file: Option<PathBuf>,

        #[command(flatten)]
        limits: Limits,
    },
}

/// Thread limits shared by subcommands.
#[derive(Args, Clone, Copy)]
pub struct Limits {
    /// Maximum weighted length of a tweet
    #[arg(long, env = "THREAD_MAX_TWEET_LENGTH", default_value_t = 280)]
    max_tweet_length: usize,

    /// Maximum number of tweets in the thread
    #[arg(long, env = "THREAD_MAX_THREAD_LENGTH", default_value_t = 25)]
    max_thread_length: usize,
}

impl From<Limits> for SplitterConfig {
    fn from(limits: Limits) -> Self {
        SplitterConfig::new(limits.max_tweet_length, limits.max_thread_length)
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FieldArg {
    Content,
    Persona,
}

impl From<FieldArg> for FieldKind {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Content => FieldKind::Content,
            FieldArg::Persona => FieldKind::Persona,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for results.
    let filter = if cli.verbose {
        EnvFilter::new("repurpose=debug,thread_splitter=debug,prompt_guard=debug,info")
    } else {
        EnvFilter::new("repurpose=info,warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    run(cli.command, &mut std::io::stdout().lock())
}

/// Execute one subcommand, writing results to `out`. Rejections are reported
/// on stderr and map to a failing exit code; I/O and parse problems are errors.
fn run(command: Commands, out: &mut impl Write) -> Result<ExitCode> {
    match command {
        Commands::Split { file, limits, json } => {
            let text = read_input(file.as_deref())?;
            let stats = split_x_thread_with_stats(&text, &limits.into())
                .context("Failed to split thread")?;

            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
            } else {
                let total = stats.tweets.len();
                for (i, (tweet, len)) in stats.tweets.iter().zip(&stats.weighted_lengths).enumerate() {
                    if i > 0 {
                        writeln!(out)?;
                    }
                    writeln!(out, "[{}/{}] ({} chars)", i + 1, total, len)?;
                    writeln!(out, "{tweet}")?;
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::CheckInput { file, kind } => {
            let text = read_input(file.as_deref())?;
            let rules = FieldRules::from_env();
            let schema = match FieldKind::from(kind) {
                FieldKind::Content => rules.content_schema(),
                FieldKind::Persona => rules.persona_schema(),
            };

            match schema.validate(&text) {
                Ok(sanitized) => {
                    writeln!(out, "{sanitized}")?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("Rejected {}: {e}", e.field());
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Commands::CheckOutput { file } => {
            let text = read_input(file.as_deref())?;
            match validate_ai_output(&text) {
                Ok(()) => {
                    writeln!(out, "accepted")?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("{e}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Commands::Process { file, limits } => {
            let reply = read_input(file.as_deref())?;
            let drafts = DraftSet::from_model_response(&reply)
                .context("Input is not a JSON object keyed by platform")?;

            match process_drafts(drafts, &limits.into()) {
                Ok(processed) => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&processed)?)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e @ (GenerationError::UnsafeOutput { .. } | GenerationError::Split(_))) => {
                    eprintln!("{e}");
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}

/// Read the whole input from `path`, or stdin when no path is given.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

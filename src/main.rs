//! CLI entry point for the exam answer checker.
//!
//! Provides subcommands for grading submissions against the answer key,
//! listing detected programs, and listing roster groups.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use exam_checker::checker::{load_roster, load_submissions, run_check};
use exam_checker::config::{CheckerConfig, Overrides};
use exam_checker::prompt::{ChoiceSource, ConsolePrompt, FixedChoices, Preset};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "exam_checker")]
#[command(about = "Check exam submissions against an answer key", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Inputs {
    /// JSON config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV export of the submissions [default: answers.csv]
    #[arg(short, long)]
    answers: Option<PathBuf>,

    /// Maximum gap between submissions of one program, in weeks [default: 2]
    #[arg(long)]
    gap_weeks: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade every respondent's latest submission and write the results
    Check {
        #[command(flatten)]
        inputs: Inputs,

        /// Group roster file [default: grouporder.txt]
        #[arg(short, long)]
        groups: Option<PathBuf>,

        /// Results file [default: results.txt]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the results as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,

        /// Similarity needed on first and last names [default: 0.8]
        #[arg(long)]
        threshold: Option<f64>,

        /// Only grade this program number (0 = all)
        #[arg(short, long)]
        program: Option<String>,

        /// Start from the first row matching this name
        #[arg(short, long)]
        start: Option<String>,

        /// Never prompt; unanswered choices mean "all"
        #[arg(long, default_value_t = false)]
        no_prompt: bool,
    },
    /// List the programs detected in the submissions
    Programs {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// List the groups defined in the roster
    Groups {
        /// JSON config file; flags override its values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Group roster file [default: grouporder.txt]
        #[arg(short, long)]
        groups: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/exam_checker.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("exam_checker.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            inputs,
            groups,
            output,
            json,
            threshold,
            program,
            start,
            no_prompt,
        } => {
            let config = CheckerConfig::resolve(
                inputs.config.as_deref(),
                Overrides {
                    answers_path: inputs.answers,
                    groups_path: groups,
                    output_path: output,
                    json_path: json,
                    gap_weeks: inputs.gap_weeks,
                    name_threshold: threshold,
                },
            )?;

            let mut choices: Box<dyn ChoiceSource> = if no_prompt {
                Box::new(FixedChoices::new(program, start))
            } else {
                Box::new(Preset::new(program, start, ConsolePrompt::stdio()))
            };

            let report = run_check(&config, choices.as_mut())?;
            print!("{}", report.render_console(&config.output_path));
        }
        Commands::Programs { inputs } => {
            let config = CheckerConfig::resolve(
                inputs.config.as_deref(),
                Overrides {
                    answers_path: inputs.answers,
                    gap_weeks: inputs.gap_weeks,
                    ..Default::default()
                },
            )?;

            let loaded = load_submissions(&config)?;
            if loaded.cohorts.is_empty() {
                info!("No programs detected");
            }
            for cohort in loaded.cohorts.cohorts() {
                println!("Program {}: {}", cohort.number, cohort.label);
                println!("  Period: {}", cohort.period());
                println!("  Students: {}", cohort.count);
            }
        }
        Commands::Groups { config, groups } => {
            let config = CheckerConfig::resolve(
                config.as_deref(),
                Overrides {
                    groups_path: groups,
                    ..Default::default()
                },
            )?;

            let roster = load_roster(&config)?;
            for group in roster.groups() {
                println!("{}: {} students", group.label, group.members.len());
            }
        }
    }

    Ok(())
}

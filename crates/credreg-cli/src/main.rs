//! # credreg CLI entry point
//!
//! Parses command-line arguments, resolves the deployment config, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use credreg_cli::achievement::{run_achievement, AchievementArgs};
use credreg_cli::institution::{run_institution, InstitutionArgs};
use credreg_cli::session::{Session, DEFAULT_STATE_FILE};
use credreg_cli::student::{run_student, StudentArgs};
use credreg_core::Principal;

/// Credential registry CLI.
///
/// Registers and verifies institutions and students, and issues and
/// revokes achievements, against a local ledger state file.
#[derive(Parser, Debug)]
#[command(name = "credreg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the YAML deployment config. Needed only to create the state
    /// file; later invocations must match the config recorded in it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the ledger state file.
    #[arg(long, global = true, default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    /// Contract owner principal; overrides the config file.
    #[arg(long, global = true)]
    contract_owner: Option<Principal>,

    /// Student authority principal; overrides the config file.
    #[arg(long, global = true)]
    student_authority: Option<Principal>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Institution registration and verification.
    Institution(InstitutionArgs),

    /// Student registration and verification.
    Student(StudentArgs),

    /// Achievement issuance and revocation.
    Achievement(AchievementArgs),

    /// Summarize the state file.
    Status,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!(state = %cli.state.display(), "credreg starting");

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let session = Session::resolve(
        cli.state,
        cli.config.as_deref(),
        cli.contract_owner,
        cli.student_authority,
    )?;

    match cli.command {
        Commands::Institution(args) => run_institution(&args, &session),
        Commands::Student(args) => run_student(&args, &session),
        Commands::Achievement(args) => run_achievement(&args, &session),
        Commands::Status => session.status(),
    }
}

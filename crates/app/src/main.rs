use std::{
    error::Error,
    fmt::Display,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use api_types::{
    balance::BalanceReport,
    ledger::LedgerFile,
    split::{SplitRequest, SplitResponse},
};
use clap::{Args, Parser, Subcommand};
use engine::{BalanceSimplifier, Money, SplitPolicy};
use serde::de::DeserializeOwned;

mod convert;
mod settings;

type AppResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "sharetab")]
#[command(about = "Split shared expenses and work out who owes whom")]
struct Cli {
    /// Settings file (defaults to `./sharetab.toml` when present).
    #[arg(long, env = "SHARETAB_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Divide one expense among its participants.
    Split(Input),
    /// Net a group ledger and suggest the payments that settle it.
    Balances(Input),
}

#[derive(Args, Debug)]
struct Input {
    /// JSON input file.
    file: PathBuf,
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match settings::Settings::new(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("failed to load settings: {err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "sharetab={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let result = match &cli.command {
        Command::Split(input) => run_split(input),
        Command::Balances(input) => run_balances(input, &settings),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, &mut io::stderr());
            ExitCode::FAILURE
        }
    }
}

/// Logs a command failure and writes it to `out`, so it is visible even when
/// the log level is `off`.
fn report_error(err: &dyn Display, out: &mut impl Write) {
    tracing::error!("{err}");
    // Nothing else to do if stderr itself is gone.
    let _ = writeln!(out, "error: {err}");
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    let value = serde_json::from_str(&raw)
        .map_err(|err| format!("failed to parse {}: {err}", path.display()))?;
    Ok(value)
}

fn run_split(input: &Input) -> AppResult<()> {
    let request: SplitRequest = read_json(&input.file)?;
    let policy: SplitPolicy = request.policy.parse()?;
    tracing::info!(
        policy = %policy,
        participants = request.participants.len(),
        "splitting expense"
    );

    let splits = engine::calculate_splits(
        Money::new(request.total_minor),
        policy,
        &convert::split_inputs(&request.participants),
    )?;
    let response = convert::split_response(splits);

    if input.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_splits(&response);
    }
    Ok(())
}

fn run_balances(input: &Input, settings: &settings::Settings) -> AppResult<()> {
    let file: LedgerFile = read_json(&input.file)?;
    let book = convert::load_ledger(&file)?;
    tracing::info!(
        members = book.roster().len(),
        expenses = book.expenses().len(),
        settlements = book.settlements().len(),
        "ledger loaded"
    );

    let simplifier =
        BalanceSimplifier::new().with_tolerance(Money::new(settings.ledger.tolerance));
    let balances = book.net_balances();
    let settlements = book.suggested_settlements(&simplifier);
    let report = convert::balance_report(&balances, &settlements);

    if input.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_splits(response: &SplitResponse) {
    for split in &response.splits {
        println!(
            "{}  {:>12}  ({})",
            split.participant_id,
            Money::new(split.share_minor),
            split.amount
        );
    }
}

fn print_report(report: &BalanceReport) {
    println!("Balances");
    for entry in &report.balances {
        println!("  {:<20} {:>12}", entry.name, Money::new(entry.balance_minor));
    }

    if report.settlements.is_empty() {
        println!("Everyone is settled up.");
        return;
    }
    println!("Suggested payments");
    for settlement in &report.settlements {
        println!(
            "  {} -> {}: {}",
            settlement.from_name,
            settlement.to_name,
            Money::new(settlement.amount_minor)
        );
    }
}

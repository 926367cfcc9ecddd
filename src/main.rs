use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;
use tallybook::ledger::Ledger;
use tallybook::store::FileStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the ledger snapshot (defaults to the
    /// platform data directory).
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a balance adjustment, e.g. `add -- -12.50` or `add "50+25"`
    Add {
        /// Arithmetic expression; a bare amount counts as an increase
        expression: String,
        /// Label for the entry
        #[arg(short, long)]
        description: String,
    },
    /// Remove the most recent entry
    Undo,
    /// Set the expiry date of the current budgeting period
    Expiry {
        /// ISO-8601 date, e.g. 2026-12-31
        date: NaiveDate,
    },
    /// Replace the ledger with a snapshot read from a file
    Import { file: PathBuf },
    /// Write the current snapshot to a file, or stdout if omitted
    Export { file: Option<PathBuf> },
    /// Show balance, expiry and history
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    let store = FileStore::open(&data_dir).into_diagnostic()?;
    let mut ledger = Ledger::open(store);

    match cli.command {
        Command::Add {
            expression,
            description,
        } => {
            let delta = ledger
                .add_entry(&expression, &description)
                .into_diagnostic()?;
            let sign = if delta.is_sign_negative() { "" } else { "+" };
            println!("{sign}{delta}  balance {}", ledger.balance());
        }
        Command::Undo => {
            if ledger.undo() {
                println!("removed last entry, balance {}", ledger.balance());
            } else {
                println!("nothing to undo");
            }
        }
        Command::Expiry { date } => {
            if date < Local::now().date_naive() {
                eprintln!("warning: expiry {date} is in the past");
            }
            ledger.update_expiry(date.to_string());
            println!("expiry set to {}", ledger.expiry());
        }
        Command::Import { file } => {
            let text = fs::read_to_string(&file).into_diagnostic()?;
            ledger.import_data(&text).into_diagnostic()?;
            println!(
                "imported {} entries, balance {}",
                ledger.history().len(),
                ledger.balance()
            );
        }
        Command::Export { file } => {
            let text = ledger.export_data().into_diagnostic()?;
            match file {
                Some(path) => fs::write(&path, text).into_diagnostic()?,
                None => println!("{text}"),
            }
        }
        Command::Show => print_ledger(&ledger),
    }

    Ok(())
}

fn print_ledger(ledger: &Ledger<FileStore>) {
    println!("balance: {}", ledger.balance());
    match NaiveDate::parse_from_str(ledger.expiry(), "%Y-%m-%d") {
        Ok(date) => {
            let days = (date - Local::now().date_naive()).num_days();
            println!("expiry:  {} ({days} days left)", ledger.expiry());
        }
        Err(_) => println!("expiry:  {}", ledger.expiry()),
    }
    for entry in ledger.history() {
        let when = chrono::DateTime::from_timestamp_millis(entry.ts)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| entry.ts.to_string());
        println!(
            "{when}  {:>14}  {:>14}  {}",
            entry.expr,
            entry.balance.to_string(),
            entry.desc
        );
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("tallybook"))
        .unwrap_or_else(|| PathBuf::from("."))
}

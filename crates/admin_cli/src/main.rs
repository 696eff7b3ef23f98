use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{CreditCmd, DebitCmd, Engine, LedgerEntry, Party, Recipients, TransferCmd};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "ledger_admin")]
#[command(about = "Admin utilities for the ledger (balances, deposits, transfers)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./ledger.db?mode=rwc")]
    database_url: String,

    /// Log level for engine events, written to stderr.
    #[arg(long, env = "LEDGER_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

/// Parties are written `escrow` or `kind:id:name`, e.g. `user:42:Alice`.
#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current balance of a party.
    Balance(BalanceArgs),
    /// Add money to a party.
    Debit(DebitArgs),
    /// Take money from a party.
    Credit(CreditArgs),
    /// Move money from one party to one or more recipients.
    Transfer(TransferArgs),
    /// Print the entries of a party, oldest first.
    Entries(BalanceArgs),
}

#[derive(Args, Debug)]
struct BalanceArgs {
    #[arg(value_parser = parse_party)]
    party: Party,
}

#[derive(Args, Debug)]
struct DebitArgs {
    #[arg(long, value_parser = parse_party)]
    to: Party,
    /// Counterpart name recorded on the entry.
    #[arg(long)]
    from: String,
    #[arg(long)]
    amount: i64,
    #[arg(long)]
    reason: Option<String>,
}

#[derive(Args, Debug)]
struct CreditArgs {
    #[arg(long, value_parser = parse_party)]
    from: Party,
    /// Counterpart name recorded on the entry.
    #[arg(long)]
    to: String,
    #[arg(long)]
    amount: i64,
    #[arg(long)]
    reason: Option<String>,
}

#[derive(Args, Debug)]
struct TransferArgs {
    #[arg(long, value_parser = parse_party)]
    from: Party,
    /// Repeat to fan out; every recipient receives `amount`.
    #[arg(long, value_parser = parse_party, required = true)]
    to: Vec<Party>,
    #[arg(long)]
    amount: i64,
    #[arg(long)]
    reason: Option<String>,
}

fn log_filter(level: &str) -> String {
    format!("engine={level},ledger_admin={level}")
}

fn parse_party(raw: &str) -> Result<Party, String> {
    raw.parse::<Party>().map_err(|err| err.to_string())
}

fn print_entry(entry: &LedgerEntry) {
    let counterpart = entry
        .money_to
        .as_deref()
        .or(entry.money_from.as_deref())
        .unwrap_or("-");
    println!(
        "#{:<6} {:<24} {:<6} {:>10} -> {:>10}  {:<16} {}",
        entry.id,
        entry.owner.to_string(),
        entry.kind.as_str(),
        entry.amount,
        entry.current_balance,
        counterpart,
        entry.reason.as_deref().unwrap_or("")
    );
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&cli.log_level))
        .with_writer(std::io::stderr)
        .init();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Balance(args) => {
            let balance = engine.balance(&args.party).await?;
            println!("{}: {balance}", args.party);
        }
        Command::Debit(args) => {
            let mut cmd = DebitCmd::new(args.to, args.from, args.amount);
            if let Some(reason) = args.reason {
                cmd = cmd.reason(reason);
            }
            print_entry(&engine.debit(cmd).await?);
        }
        Command::Credit(args) => {
            let mut cmd = CreditCmd::new(args.from, args.to, args.amount);
            if let Some(reason) = args.reason {
                cmd = cmd.reason(reason);
            }
            print_entry(&engine.credit(cmd).await?);
        }
        Command::Transfer(mut args) => {
            let to = if args.to.len() == 1 {
                Recipients::One(args.to.remove(0))
            } else {
                Recipients::Many(args.to)
            };
            let mut cmd = TransferCmd::new(args.from, to, args.amount);
            if let Some(reason) = args.reason {
                cmd = cmd.reason(reason);
            }
            for entry in engine.transfer(cmd).await?.entries() {
                print_entry(entry);
            }
        }
        Command::Entries(args) => {
            for entry in engine.entries(&args.party).await? {
                print_entry(&entry);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn transfer_accepts_many_recipients() {
        let cli = Cli::try_parse_from([
            "ledger_admin",
            "transfer",
            "--from",
            "user:1:Alice",
            "--to",
            "user:2:Bob",
            "--to",
            "escrow",
            "--amount",
            "25",
        ])
        .unwrap();
        let Command::Transfer(args) = cli.command else {
            panic!("expected transfer");
        };
        assert_eq!(args.to.len(), 2);
        assert!(args.to[1].is_escrow());
        assert_eq!(args.from.name(), "Alice");
    }

    #[test]
    fn log_level_targets_engine_events() {
        let cli = Cli::try_parse_from(["ledger_admin", "--log-level", "warn", "balance", "escrow"])
            .unwrap();
        assert_eq!(log_filter(&cli.log_level), "engine=warn,ledger_admin=warn");
    }

    #[test]
    fn malformed_party_is_rejected() {
        assert!(Cli::try_parse_from(["ledger_admin", "balance", "user-1"]).is_err());
    }
}

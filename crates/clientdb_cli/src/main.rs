//! Command-line front end for the client store.
//!
//! # Responsibility
//! - Resolve the database path and logging settings from flags/env.
//! - Map one subcommand onto one repository operation.
//!
//! Exit codes: `0` success, `1` failure, `2` client not found.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use clientdb_core::{
    core_version, default_log_level, init_logging, open_db, parse_level, Client, ClientId,
    ClientService, RepoError, SqliteClientRepository,
};
use log::info;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_FAILURE: u8 = 1;
const EXIT_NOT_FOUND: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "clientdb", version, about = "Select, insert and delete client records")]
struct Cli {
    /// SQLite database file; created and migrated when missing.
    #[arg(long, env = "CLIENTDB_PATH", default_value = "demo.db")]
    db: PathBuf,

    /// One of off|error|warn|info|debug|trace.
    #[arg(long, env = "CLIENTDB_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "CLIENTDB_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one client as JSON.
    Select { id: i64 },
    /// Insert a client and print its new id.
    Insert {
        #[arg(long)]
        fio: String,
        #[arg(long)]
        login: String,
        /// YYYYMMDD
        #[arg(long)]
        birthday: String,
        #[arg(long)]
        email: String,
    },
    /// Delete a client by id.
    Delete { id: i64 },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli, &mut std::io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let (code, message) = failure_report(&err);
            eprintln!("{message}");
            ExitCode::from(code)
        }
    }
}

/// Maps a failed run to its exit code and the line printed on stderr.
fn failure_report(err: &anyhow::Error) -> (u8, String) {
    match err.downcast_ref::<RepoError>() {
        Some(repo_err) if repo_err.is_not_found() => (EXIT_NOT_FOUND, repo_err.to_string()),
        _ => (EXIT_FAILURE, format!("error: {err:#}")),
    }
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = match cli.log_level.as_deref() {
            Some(level) => parse_level(level).map_err(|err| anyhow!("{err}"))?,
            None => default_log_level(),
        };
        init_logging(level, log_dir).map_err(|err| anyhow!("{err}"))?;
        info!(
            "event=cli_start module=cli status=ok version={}",
            core_version()
        );
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let service = ClientService::new(SqliteClientRepository::try_new(&conn)?);

    match cli.command {
        Command::Select { id } => {
            let client = service.get_client(ClientId::from(id))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&client)?)?;
        }
        Command::Insert {
            fio,
            login,
            birthday,
            email,
        } => {
            let id = service.insert_client(&Client::new(fio, login, birthday, email))?;
            writeln!(out, "{id}")?;
        }
        Command::Delete { id } => {
            service.delete_client(ClientId::from(id))?;
            writeln!(out, "deleted {id}")?;
        }
    }

    Ok(())
}

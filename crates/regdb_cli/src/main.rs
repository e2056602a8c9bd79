//! reg
//!
//! Maintains a registry of key-value pairs in a flat text file.
//!
//! # Commands
//!
//! - `reset` - Truncate the registry database
//! - `repair` - Delete only corrupted rows
//! - `merge` - Import the valid rows of another file
//! - `entry` - Insert or update a key-value pair
//! - `query` - Print the value stored for a key

mod error;
mod prompt;

use clap::{Parser, Subcommand};
use error::{CliError, EXIT_NORMAL};
use regdb_core::{parse_field, Config, Operation, Registry, Request};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the default registry database.
const DB_PATH_ENV: &str = "REGDB_PATH";

/// Maintains a registry of key-value pairs.
#[derive(Parser)]
#[command(name = "reg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Registry file to use instead of the default database
    #[arg(global = true, short, long, value_name = "FILE", value_parser = file_name)]
    db: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Do not ask for confirmation of critical operations
    #[arg(global = true, short = 'n', long)]
    dnd: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reset the whole registry database
    Reset,

    /// Delete only corrupted rows from the registry database
    Repair,

    /// Merge the valid rows of a file into the registry database
    Merge {
        /// File to merge rows from
        #[arg(value_parser = file_name)]
        file: PathBuf,
    },

    /// Enter a key-value pair (prompts for whatever is missing)
    Entry {
        /// Key of the pair
        #[arg(value_parser = field)]
        key: Option<String>,

        /// Value of the pair
        #[arg(value_parser = field)]
        value: Option<String>,

        /// Replace the value if the key already exists
        #[arg(short, long)]
        force: bool,
    },

    /// Query the value of a key (prompts if missing)
    Query {
        /// Key to look up
        #[arg(value_parser = field)]
        key: Option<String>,
    },

    /// Show version information
    Version,
}

fn field(raw: &str) -> Result<String, String> {
    parse_field(raw)
        .map(str::to_owned)
        .ok_or_else(|| format!("invalid format '{raw}': must not be blank or start with '-'"))
}

fn file_name(raw: &str) -> Result<PathBuf, String> {
    parse_field(raw)
        .map(|_| PathBuf::from(raw))
        .ok_or_else(|| format!("invalid file name '{raw}'"))
}

fn config_from_env() -> Config {
    match std::env::var_os(DB_PATH_ENV) {
        Some(path) if !path.is_empty() => Config::default().default_db_path(path),
        _ => Config::default(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_NORMAL),
        Err(err) => err.report(),
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let operation = match cli.command {
        Commands::Version => {
            println!("reg v{}", env!("CARGO_PKG_VERSION"));
            println!("regdb core v{}", regdb_core::VERSION);
            return Ok(());
        }
        Commands::Reset => {
            if !cli.dnd && !confirmed("Critical operation: Sure to reset registry database?")? {
                return Ok(());
            }
            Operation::Reset
        }
        Commands::Repair => Operation::Repair,
        Commands::Merge { file } => {
            if !cli.dnd
                && !confirmed("Critical operation: Sure to merge file data in registry database?")?
            {
                return Ok(());
            }
            Operation::merge(file)
        }
        Commands::Entry { key, value, force } => {
            let key = or_prompt(key, "KEY:   ")?;
            let value = or_prompt(value, "VALUE: ")?;
            Operation::entry(&key, &value, force)?
        }
        Commands::Query { key } => Operation::query(&or_prompt(key, "KEY: ")?)?,
    };

    let config = config_from_env();
    let request = match cli.db {
        Some(path) => Request::external_db(path, operation),
        None => Request::default_db(config.default_db_path.clone(), operation),
    };
    debug!(file = %request.path().display(), external = request.is_external(), "resolved registry database");

    let response = Registry::new(config).process(&request)?;
    if let Some(message) = response.message() {
        println!("{message}");
    }
    Ok(())
}

fn confirmed(question: &str) -> Result<bool, CliError> {
    let confirmed = prompt::ask_confirmation(question).map_err(CliError::Prompt)?;
    if !confirmed {
        println!("    [Aborting operation...]");
    }
    Ok(confirmed)
}

fn or_prompt(given: Option<String>, label: &str) -> Result<String, CliError> {
    match given {
        Some(text) => Ok(text),
        None => prompt::ask(label).map_err(CliError::Prompt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_entry_with_force_and_external_db() {
        let cli = Cli::try_parse_from(["reg", "--db", "my.db", "entry", "-f", " Key ", "value"]).unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("my.db")));
        match cli.command {
            Commands::Entry { key, value, force } => {
                assert_eq!(key.as_deref(), Some("Key"));
                assert_eq!(value.as_deref(), Some("value"));
                assert!(force);
            }
            _ => panic!("expected entry"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["reg", "reset", "-n", "-v"]).unwrap();
        assert!(cli.dnd);
        assert!(cli.verbose);
        assert!(cli.db.is_none());
    }

    #[test]
    fn query_key_is_optional() {
        let cli = Cli::try_parse_from(["reg", "query"]).unwrap();
        assert!(matches!(cli.command, Commands::Query { key: None }));
    }

    #[test]
    fn rejects_blank_fields() {
        assert!(Cli::try_parse_from(["reg", "query", "  "]).is_err());
        assert!(Cli::try_parse_from(["reg", "entry", "k", ""]).is_err());
        assert!(Cli::try_parse_from(["reg", "--db", " ", "repair"]).is_err());
    }

    #[test]
    fn merge_requires_a_file() {
        assert!(Cli::try_parse_from(["reg", "merge"]).is_err());
        let cli = Cli::try_parse_from(["reg", "merge", "other.db"]).unwrap();
        assert!(matches!(cli.command, Commands::Merge { ref file } if file == &PathBuf::from("other.db")));
    }
}

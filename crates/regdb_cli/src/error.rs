//! Command-line errors, their console report and exit codes.

use regdb_core::{CoreError, ErrorClass};
use std::io;
use std::process::ExitCode;
use thiserror::Error;

/// Successful run, including a run aborted at a confirmation prompt.
pub const EXIT_NORMAL: u8 = 0;
/// Invalid argument.
pub const EXIT_ERROR: u8 = 1;
/// I/O failure or corrupt registry data.
pub const EXIT_FILE: u8 = 2;
/// Internal error.
pub const EXIT_FATAL: u8 = 3;

/// Errors surfaced by the `reg` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// The registry engine failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Reading interactive input failed.
    #[error("unable to read input from user: {0}")]
    Prompt(#[source] io::Error),
}

impl CliError {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Core(e) => match e.class() {
                ErrorClass::InvalidArgument => EXIT_ERROR,
                ErrorClass::Io | ErrorClass::CorruptData => EXIT_FILE,
                ErrorClass::Internal => EXIT_FATAL,
            },
            Self::Prompt(_) => EXIT_FILE,
        }
    }

    /// Prints the error to stderr and returns the exit code.
    pub fn report(&self) -> ExitCode {
        eprint!("{}", self.render());
        ExitCode::from(self.exit_code())
    }

    fn render(&self) -> String {
        match self {
            Self::Core(CoreError::CorruptData {
                path,
                line,
                kind,
                ..
            }) => format!(
                "Error: Registry data corrupted!\n  File loaded from: {}\n  Corrupt row: {line}\n  Error detail: {kind}\n\
                 Suggestion: Either repair or reset registry database to avoid future errors\n",
                path.display()
            ),
            Self::Core(e) => match e.class() {
                ErrorClass::InvalidArgument => format!("Error: Invalid argument: {e}\n"),
                ErrorClass::Io => format!("I/O Error: {e}\n"),
                _ => format!("Fatal Error: Unknown application error\nError details: {e}\n"),
            },
            Self::Prompt(_) => format!("I/O Error: {self}\n"),
        }
    }
}

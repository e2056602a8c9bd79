//! Interactive prompts for input the command line did not supply.

use std::io::{self, BufRead, Write};

/// Answer that confirms a critical operation.
const CONFIRMATION: &str = "Y";

/// Prints `label` and reads a line, asking again while the line is blank.
///
/// # Errors
///
/// Returns an error if reading or writing fails, or input ends first.
pub fn read_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> io::Result<String> {
    loop {
        write!(output, "{label}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before a value was entered",
            ));
        }
        if !line.trim().is_empty() {
            return Ok(line.trim_end_matches(['\r', '\n']).to_owned());
        }
        writeln!(output)?;
    }
}

/// Asks a yes/no question; only an exact `Y` confirms.
///
/// # Errors
///
/// Returns an error if reading or writing fails.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool> {
    write!(output, "{question} [{CONFIRMATION} for Yes]  ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim() == CONFIRMATION)
}

/// [`read_line`] on the terminal.
pub fn ask(label: &str) -> io::Result<String> {
    read_line(&mut io::stdin().lock(), &mut io::stdout(), label)
}

/// [`confirm`] on the terminal.
pub fn ask_confirmation(question: &str) -> io::Result<bool> {
    confirm(&mut io::stdin().lock(), &mut io::stdout(), question)
}

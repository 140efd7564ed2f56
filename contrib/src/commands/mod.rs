//! CLI Commands
//!
//! Every command writes to a caller-supplied writer so the interactive menu
//! can be driven from tests.

pub mod export;
pub mod generate;
pub mod menu;
pub mod metrics;

use anyhow::Result;
use std::io::{BufRead, Write};

/// Prompt for one line of input.
///
/// Returns `None` at end of input.
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> Result<Option<String>> {
    write!(out, "{}", prompt)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Print an error message
pub fn print_error<W: Write>(out: &mut W, message: &str) -> Result<()> {
    writeln!(out, "\x1b[31mError:\x1b[0m {}", message)?;
    Ok(())
}

/// Print a success message
pub fn print_success<W: Write>(out: &mut W, message: &str) -> Result<()> {
    writeln!(out, "\x1b[32m{}\x1b[0m", message)?;
    Ok(())
}

/// Print a warning message
pub fn print_warning<W: Write>(out: &mut W, message: &str) -> Result<()> {
    writeln!(out, "\x1b[33mWarning:\x1b[0m {}", message)?;
    Ok(())
}

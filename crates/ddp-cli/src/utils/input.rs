//! User input utilities for interactive command-line prompts.

use anyhow::{Context, Result};
use std::io::{self, Write};

/// Prompts the user for a string input.
///
/// The input is read from stdin and returned with whitespace trimmed.
///
/// # Errors
///
/// Returns an error if reading from stdin fails.
pub fn prompt_string(prompt: &str) -> Result<String> {
    print!("{prompt}: ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read user input")?;

    Ok(input.trim().to_string())
}

/// Interpret a yes/no answer. Empty input means no.
pub fn parse_confirmation(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" | "" => Some(false),
        _ => None,
    }
}

/// Prompts the user for a yes/no confirmation, re-asking on anything else.
pub fn prompt_confirmation(prompt: &str) -> Result<bool> {
    loop {
        let input = prompt_string(&format!("{prompt} (y/N)"))?;
        if let Some(answer) = parse_confirmation(&input) {
            return Ok(answer);
        }
        eprintln!("Please enter 'y' for yes or 'n' for no.");
    }
}

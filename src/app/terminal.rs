//! Terminal output: logging setup, colored status lines and prompts.

use std::io::{self, BufRead, Write};

use console::style;
use emudl_core::catalog::PLATFORMS;

/// Horizontal rule between menu sections.
pub const RULE_WIDTH: usize = 53;

pub const CHECK: &str = "\u{2714}";
pub const CROSS: &str = "\u{2718}";

/// Initializes the tracing subscriber on stderr.
///
/// Priority: `RUST_LOG` > `--quiet` (error) > `-v` (debug) / `-vv` (trace)
/// > default (warn, keeping the interactive output clean).
pub fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[must_use]
pub fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

pub fn headline(message: &str) {
    println!("{}", style(message).yellow());
}

pub fn error_line(message: &str) {
    eprintln!("{}", style(message).red());
}

/// Prints a numbered list between rules, entries in green.
pub fn numbered_list(items: impl IntoIterator<Item = String>) {
    println!("{}", rule());
    for (index, item) in items.into_iter().enumerate() {
        println!("{}", style(format!("[{index}] {item}")).green());
    }
    println!("{}", rule());
}

pub fn print_platforms() {
    headline("[+] Here is the list of currently supported platforms");
    numbered_list(PLATFORMS.iter().map(|p| p.name.to_string()));
}

/// Prompts on stdout and reads one line from stdin.
///
/// Returns `Ok(None)` on end of input.
pub fn prompt_line(question: &str) -> io::Result<Option<String>> {
    print!("{question}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[must_use]
pub fn downloaded_line(title: &str) -> String {
    format!("{title}: {}", style(CHECK).green())
}

#[must_use]
pub fn skipped_line(title: &str) -> String {
    format!("{title}: {}", style("SKIPPING, Already Exists").magenta())
}

#[must_use]
pub fn failed_line(message: &str) -> String {
    format!("{} {}", style(CROSS).red(), style(message).red())
}

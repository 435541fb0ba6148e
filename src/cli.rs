// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
//   handle-probe -i alice -o results.json -t 4 -vv
//
// Validation happens here so a bad argument aborts the run before any
// request is made.
//
// Rust concepts:
// - Derive macros: #[derive(Parser)] generates the parser from the struct
// - value_parser: a plain fn(&str) -> Result<T, String> validates one argument
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::output::PresenterConfig;
use crate::probe::{AccountQuery, RunnerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "handle-probe",
    version,
    about = "Check whether a username exists on Instagram, Facebook, TikTok, X, Telegram, Lemon8 and Threads",
    long_about = "handle-probe requests each platform's profile page for a username and reads the \
                  response to decide whether the account exists, printing follower counts and \
                  other profile stats where the page exposes them."
)]
pub struct Cli {
    /// Username to check
    #[arg(short, long, value_name = "USERNAME", value_parser = parse_username)]
    pub input: String,

    /// Append results to this file, one JSON object per line (must end in .json)
    #[arg(short, long, value_name = "PATH", value_parser = parse_output_path)]
    pub output: Option<PathBuf>,

    /// Number of platforms probed at the same time (1-32)
    #[arg(
        short,
        long,
        default_value_t = 3,
        value_parser = clap::value_parser!(u16).range(1..=32)
    )]
    pub threads: u16,

    /// Request timeout per platform, in seconds (1-120)
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 15,
        value_parser = clap::value_parser!(u64).range(1..=120)
    )]
    pub timeout: u64,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Do not print the startup banner
    #[arg(long)]
    pub no_banner: bool,
}

impl Cli {
    pub fn query(&self) -> AccountQuery {
        AccountQuery {
            username: self.input.clone(),
            output_path: self.output.clone(),
        }
    }

    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            threads: usize::from(self.threads),
            timeout: Duration::from_secs(self.timeout),
        }
    }

    /// `stdout_is_terminal` comes from the caller so this stays testable.
    pub fn presenter_config(&self, stdout_is_terminal: bool) -> PresenterConfig {
        PresenterConfig {
            color: !self.no_color && stdout_is_terminal,
            ..PresenterConfig::default()
        }
    }

    /// Default tracing filter for the -v count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

// Usernames end up inside URL paths, so anything that would change the URL
// structure is rejected.
fn parse_username(value: &str) -> Result<String, String> {
    let value = value.trim().trim_start_matches('@');
    if value.is_empty() {
        return Err("username must not be empty".to_string());
    }
    if let Some(bad) = value
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '&' | '%'))
    {
        return Err(format!("username must not contain {bad:?}"));
    }
    Ok(value.to_string())
}

fn parse_output_path(value: &str) -> Result<PathBuf, String> {
    if !value.to_lowercase().ends_with(".json") {
        return Err("output file must be in .json format".to_string());
    }
    Ok(PathBuf::from(value))
}

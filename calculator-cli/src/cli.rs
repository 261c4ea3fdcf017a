//! Command line definition
//!
//! Help and version are recognised only when they are the sole argument.
//! Anywhere else `-h` or `--help` is ordinary operand text.

use std::ffi::OsString;

use calculator::Operation;
use clap::{CommandFactory, Parser};

/// Usage line shown on argument count errors and in help
pub const USAGE: &str = "calculator <operation> <num1> <num2>";

/// Example invocation shown alongside [`USAGE`]
pub const EXAMPLE: &str = "calculator add 5 3";

const HELP_FLAGS: [&str; 2] = ["-h", "--help"];
const VERSION_FLAGS: [&str; 2] = ["-V", "--version"];

const HELP_FOOTER: &str = "\
Examples:
  calculator add 5 3
  calculator multiply 4.5 2
  calculator divide 10 3

Help and version, as the only argument:
  calculator -h | --help
  calculator -V | --version

Environment:
  CALCULATOR_LOG       Log filter directive (default: warn)
  CALCULATOR_LOG_ANSI  Colour log output, true or false (default: false)";

fn after_help() -> String {
    let operations: String = Operation::ALL
        .iter()
        .map(|op| format!("  {:<10} num1 {} num2\n", op.name(), op.symbol()))
        .collect();
    format!("Operations:\n{operations}\n{HELP_FOOTER}")
}

#[derive(Parser, Debug)]
#[command(name = "calculator")]
#[command(version)]
#[command(about = "Calculator CLI - Perform arithmetic operations from command line")]
#[command(override_usage = USAGE)]
#[command(after_help = after_help())]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Operation to perform: add, subtract, multiply or divide (case-insensitive)
    #[arg(allow_hyphen_values = true)]
    pub operation: String,

    /// First operand
    #[arg(allow_hyphen_values = true)]
    pub num1: String,

    /// Second operand
    #[arg(allow_hyphen_values = true)]
    pub num2: String,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all log output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// What a command line asks for
#[derive(Debug)]
pub enum Invocation {
    /// `-h` or `--help` alone
    Help,
    /// `-V` or `--version` alone
    Version,
    /// A calculation
    Calculate(Cli),
}

impl Cli {
    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }

    /// Classify a full command line, program name first.
    pub fn parse_invocation<I, T>(args: I) -> Result<Invocation, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let requested = match args.as_slice() {
            [_, flag] => match flag.to_str() {
                Some(flag) if HELP_FLAGS.contains(&flag) => Some(Invocation::Help),
                Some(flag) if VERSION_FLAGS.contains(&flag) => Some(Invocation::Version),
                _ => None,
            },
            _ => None,
        };

        match requested {
            Some(invocation) => Ok(invocation),
            None => Self::try_parse_from_args(args).map(Invocation::Calculate),
        }
    }

    /// Print help to stdout
    pub fn print_help() -> std::io::Result<()> {
        Self::command().print_help()
    }

    /// Version line, newline terminated
    pub fn render_version() -> String {
        Self::command().render_version()
    }
}

mod config;
mod errors;
mod logging;
mod runner;
mod writer;

use std::path::PathBuf;

use anyhow::Result;
use checksuite_core::KeepPolicy;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Report format written by `run`
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// HTML report written to a file
    Html,
    /// JSON document written to a file
    Json,
    /// Human readable summary on standard output
    Stdout,
}

/// Which row of a duplicated set survives a fix
#[derive(Debug, Clone, Copy, ValueEnum)]
enum KeepArg {
    First,
    Last,
    /// Drop every duplicated row
    None,
}

impl From<KeepArg> for KeepPolicy {
    fn from(value: KeepArg) -> Self {
        match value {
            KeepArg::First => KeepPolicy::First,
            KeepArg::Last => KeepPolicy::Last,
            KeepArg::None => KeepPolicy::None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "checksuite",
    version,
    about = "CheckSuite CLI - Run data checks on CSV/Parquet datasets",
    long_about = "CheckSuite runs a suite of data checks configured in a TOML file against a \
                  train dataset and an optional test dataset, and writes an HTML, JSON or \
                  console report.\n\n\
                  Example usage:\n  \
                  checksuite run --config suite.toml --output html --out reports/"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Enable debug mode with detailed error backtraces
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the configured suite and write its report
    Run(RunArgs),
    /// Write a corrected train dataset using a fixable check
    Fix(FixArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Path to the TOML configuration file describing the suite
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    #[arg(short, long, value_enum, default_value = "html")]
    output: OutputFormat,

    /// Output file or directory
    #[arg(long, value_name = "PATH")]
    out: Option<String>,

    /// Write a standalone document with its scripts embedded
    #[arg(long)]
    full_html: bool,
}

#[derive(Args, Debug)]
struct FixArgs {
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Name of the check to fix with, e.g. "Data Duplicates"
    #[arg(long)]
    check: String,

    #[arg(long, value_enum, default_value = "first")]
    keep: KeepArg,

    /// Output csv file or directory
    #[arg(long, value_name = "PATH")]
    out: Option<String>,
}

fn dispatch(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Command::Run(args) => runner::run(args),
        Command::Fix(args) => runner::fix(args).map(|_| true),
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        std::env::set_var("RUST_BACKTRACE", "1");
    }
    logging::init_logging(cli.verbose);

    match dispatch(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            if std::env::var("RUST_BACKTRACE").is_ok() {
                eprintln!("Error: {:?}", err);
            } else {
                eprintln!("Error: {:#}", err);
                eprintln!("\nHint: Run with --debug flag for detailed stack traces");
            }
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_defaults() {
        let cli = Cli::try_parse_from(["checksuite", "run", "--config", "suite.toml"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(matches!(args.output, OutputFormat::Html));
        assert!(!args.full_html);
        assert_eq!(args.out, None);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_fix() {
        let cli = Cli::try_parse_from([
            "checksuite",
            "-vv",
            "fix",
            "-c",
            "suite.toml",
            "--check",
            "Data Duplicates",
            "--keep",
            "none",
            "--out",
            "fixed.csv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Fix(args) = cli.command else {
            panic!("expected fix");
        };
        assert_eq!(args.check, "Data Duplicates");
        assert_eq!(KeepPolicy::from(args.keep), KeepPolicy::None);
    }

    #[test]
    fn test_parse_rejects_unknown_output() {
        assert!(Cli::try_parse_from(["checksuite", "run", "-c", "s.toml", "-o", "pdf"]).is_err());
    }
}

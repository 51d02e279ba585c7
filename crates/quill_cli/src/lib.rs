mod cmd;
mod ctx;
pub mod error;

use std::{
    fmt,
    io::{self, Write as _},
    process::ExitCode,
};

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};
use cmd::Commands;
use ctx::Ctx;
use error::{Error, Result};
use quill_config::{AppConfig, DEFAULT_CONFIG_FILE};
use tracing::{error, trace};

// Streaming document generation through a bring-your-own-key model router.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten, next_help_heading = "Global Options")]
    globals: Globals,

    #[command(subcommand, next_help_heading = "Options")]
    command: Commands,
}

#[derive(Debug, clap::Args)]
pub struct Globals {
    /// Path to the configuration file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: Utf8PathBuf,

    /// The user to act on behalf of.
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Increase verbosity of logging.
    ///
    /// Can be specified multiple times to increase verbosity.
    ///
    /// Defaults to printing "error" messages. For each increase in verbosity,
    /// the log level is set to "warn", "info", "debug", and "trace"
    /// respectively.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress all output, including errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

impl fmt::Display for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entry(&"config", &self.globals.config)
            .entry(&"user", &self.globals.user)
            .entry(&"verbose", &self.globals.verbose)
            .entry(&"quiet", &self.globals.quiet)
            .finish()
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    let quiet = cli.globals.quiet;

    configure_logging(cli.globals.verbose, quiet);
    trace!(command = cli.command.name(), arguments = %cli, "Starting CLI run.");

    match run_inner(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "Command failed.");
            if !quiet {
                report(&error);
            }

            ExitCode::from(error.exit_code())
        }
    }
}

async fn run_inner(cli: Cli) -> Result<()> {
    let config = AppConfig::load(&cli.globals.config)?;
    let ctx = Ctx::new(&cli.globals, config)?;

    cli.command.run(&ctx).await
}

/// Write `error` to stderr as a single JSON object.
fn report(error: &Error) {
    let value = serde_json::json!({
        "error": {
            "message": error.to_string(),
            "kind": error.kind().map(|kind| format!("{kind:?}")),
        }
    });

    writeln!(io::stderr().lock(), "{value}").ok();
}

fn configure_logging(verbose: u8, quiet: bool) {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::fmt;

    let mut level = match verbose {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    if quiet {
        level = LevelFilter::OFF;
    }

    let mut filter = vec!["off".to_owned()];
    for krate in [
        "artifact", "cli", "config", "llm", "model", "router", "storage",
    ] {
        filter.push(format!("quill_{krate}={level}"));
    }

    let format = fmt::format().with_target(false).compact();

    if level < LevelFilter::DEBUG {
        tracing_subscriber::fmt()
            .event_format(format)
            .without_time()
            .with_ansi(true)
            .with_writer(io::stderr)
            .with_env_filter(filter.join(","))
            .init();
    } else {
        tracing_subscriber::fmt()
            .event_format(format)
            .with_ansi(true)
            .with_writer(io::stderr)
            .with_env_filter(filter.join(","))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_arguments() {
        let cli = Cli::try_parse_from([
            "quill", "-vv", "--user", "alice", "generate", "--kind", "code", "--model",
            "openai/o1-mini", "FizzBuzz",
        ])
        .unwrap();

        assert_eq!(cli.globals.verbose, 2);
        assert_eq!(cli.globals.user.as_deref(), Some("alice"));
        assert_eq!(cli.globals.config, DEFAULT_CONFIG_FILE);
        assert_eq!(cli.command.name(), "generate");
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["quill", "generate", "--kind", "image", "t"]).is_err());
    }

    #[test]
    fn test_exit_codes() {
        let error = Error::Llm(quill_llm::Error::Unauthorized);
        assert_eq!(error.exit_code(), 3);

        let error = Error::Artifact(quill_artifact::Error::Cancelled);
        assert_eq!(error.exit_code(), 130);

        let error = Error::Io(io::Error::other("broken pipe"));
        assert_matches!(error.kind(), None);
        assert_eq!(error.exit_code(), 1);
    }
}

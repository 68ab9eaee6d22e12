//! Command-line interface definition.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use movienight_core::YearMonth;

/// movienight - Schedule a year (or eight) of movie nights on Google Calendar
#[derive(Debug, Parser)]
#[command(name = "movienight")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "MOVIENIGHT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Parses `args`, treating a bare invocation as `schedule`.
    ///
    /// The second parse runs the `schedule` arguments through clap, so their
    /// environment fallbacks apply without a subcommand too.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let cli = Self::try_parse_from(args.clone())?;
        if cli.command.is_some() {
            return Ok(cli);
        }
        Self::try_parse_from(args.into_iter().chain([OsString::from("schedule")]))
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create one event per title, on the first Sunday of consecutive months
    ///
    /// This is what runs when no command is given.
    Schedule(ScheduleArgs),

    /// Authorize calendar access and store the credential
    Auth {
        /// Path to Google Cloud Console OAuth client JSON file
        #[arg(long, env = "GOOGLE_CREDENTIALS_FILE")]
        credentials_file: Option<PathBuf>,

        /// Where to store the OAuth token
        #[arg(long)]
        token_path: Option<PathBuf>,

        /// Discard the stored credential and consent again
        #[arg(long, short)]
        force: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for the `schedule` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ScheduleArgs {
    /// Titles file, one per line (defaults to the built-in list)
    #[arg(long)]
    pub titles: Option<PathBuf>,

    /// First month to schedule, as YYYY-MM (defaults to the current month)
    #[arg(long)]
    pub start: Option<YearMonth>,

    /// Do not ask for confirmation when fewer than 100 titles are available
    #[arg(long, short)]
    pub yes: bool,

    /// Print the events that would be created without authenticating
    #[arg(long)]
    pub dry_run: bool,

    /// Use the 1st of the month when it is a Sunday
    #[arg(long)]
    pub strict_sunday: bool,

    /// Pause between event submissions, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Calendar that receives the events
    #[arg(long)]
    pub calendar_id: Option<String>,

    /// Path to Google Cloud Console OAuth client JSON file
    #[arg(long, env = "GOOGLE_CREDENTIALS_FILE")]
    pub credentials_file: Option<PathBuf>,

    /// Where to store the OAuth token
    #[arg(long)]
    pub token_path: Option<PathBuf>,

    /// Record each outcome in this JSON file
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// Skip titles the ledger already records as created
    #[arg(long)]
    pub resume: bool,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

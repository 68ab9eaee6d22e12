//! movienight CLI entry point.

use std::process::ExitCode;

use movienight_client::cli::{Cli, Command, ConfigAction, ScheduleArgs};
use movienight_client::commands;
use movienight_client::config::ClientConfig;
use movienight_client::error::{ClientError, ClientResult};
use movienight_core::tracing::{init_tracing, TracingConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // EMAIL_1/EMAIL_2 may come from a .env file.
    dotenvy::dotenv().ok();

    let cli = Cli::try_parse_args(std::env::args_os()).unwrap_or_else(|e| e.exit());

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let config = if cli.config.is_some() {
        ClientConfig::load_from(&config_path).map_err(ClientError::Config)?
    } else {
        ClientConfig::load().map_err(ClientError::Config)?
    };

    let command = cli
        .command
        .unwrap_or_else(|| Command::Schedule(ScheduleArgs::default()));

    match command {
        Command::Schedule(args) => commands::schedule::run(&args, config).await,
        Command::Auth {
            credentials_file,
            token_path,
            force,
        } => commands::auth::google(credentials_file, token_path, force, &config).await,
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config_path),
        },
    }
}

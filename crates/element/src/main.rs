mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use element_core::TelemetryClient;

use crate::cli::{Cli, Command};
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.quiet);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, quiet: bool) {
    let filter = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        mut global,
        command,
    } = cli;

    if let Command::Completions(args) = &command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "element", &mut std::io::stdout());
        return Ok(());
    }

    validate_target(&command)?;
    let cfg = element_config::load_config()?;
    config::apply_defaults(&mut global, &cfg)?;

    match command {
        // Offline commands need no API connection
        Command::Decode(args) => commands::decode::handle(&args, &global),
        Command::Config(args) => commands::config_cmd::handle(args, cfg, &global),

        cmd => {
            let client_config = config::build_client_config(&cfg, &global)?;
            let mut client = TelemetryClient::connect(&client_config)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &mut client, &global)
        }
    }
}

/// Reject an ambiguous or missing device/folder choice before any
/// configuration or network work.
fn validate_target(cmd: &Command) -> Result<(), CliError> {
    let target = match cmd {
        Command::Readings(args) => &args.target,
        Command::Packets(args) => &args.target,
        _ => return Ok(()),
    };
    element_core::Target::from_options(target.device.as_deref(), target.folder.as_deref())?;
    Ok(())
}

//! Command dispatch: bridges CLI args -> `TelemetryClient` -> output formatting.

pub mod config_cmd;
pub mod decode;
pub mod devices;
pub mod folders;
pub mod packets;
pub mod readings;
pub mod resolve;

use element_core::TelemetryClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub fn dispatch(
    cmd: Command,
    client: &mut TelemetryClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Folders => folders::handle(client, global),
        Command::Devices(args) => devices::list(client, &args, global),
        Command::Device(args) => devices::show(client, &args, global),
        Command::Readings(args) => readings::handle(client, &args, global),
        Command::Packets(args) => packets::handle(client, &args, global),
        Command::Resolve(args) => resolve::handle(client, args, global),
        // Offline commands are handled before dispatch
        Command::Decode(args) => decode::handle(&args, global),
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

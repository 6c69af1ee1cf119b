//! Sensor id <-> device address resolution.

use element_core::{SensorId, TelemetryClient};
use serde::Serialize;

use crate::cli::{GlobalOpts, ResolveArgs, ResolveCommand};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct Resolution {
    address: String,
    sensor_id: SensorId,
    #[serde(skip_serializing_if = "Option::is_none")]
    folder: Option<String>,
}

fn detail(r: &Resolution) -> String {
    let mut lines = vec![
        format!("Address:   {}", r.address),
        format!("Sensor ID: {}", r.sensor_id),
    ];
    if let Some(ref folder) = r.folder {
        lines.push(format!("Folder:    {folder}"));
    }
    lines.join("\n")
}

pub fn handle(
    client: &mut TelemetryClient,
    args: ResolveArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (resolution, answer) = match args.command {
        ResolveCommand::Id { address, folder } => {
            let sensor_id = client.id_from_address(&address, folder.as_deref())?;
            let resolution = Resolution {
                address,
                sensor_id,
                folder,
            };
            (resolution, sensor_id.to_string())
        }
        ResolveCommand::Address { id, folder } => {
            let address = client.address_from_id(id, &folder)?;
            let answer = address.clone();
            let resolution = Resolution {
                address,
                sensor_id: id,
                folder: Some(folder),
            };
            (resolution, answer)
        }
    };

    let out = output::render_single(global.format(), &resolution, detail, |_| answer.clone())?;
    output::print_output(&out, global.quiet)
}

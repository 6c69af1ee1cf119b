//! Device command handlers.

use element_core::{Device, TelemetryClient};
use tabled::Tabled;

use crate::cli::{DeviceArgs, DevicesArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Sensor ID")]
    sensor_id: String,
    #[tabled(rename = "Folders")]
    folders: String,
    #[tabled(rename = "Last reading")]
    last_reading: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            address: d.address().to_owned(),
            sensor_id: d.sensor_id().map(|id| id.to_string()).unwrap_or_default(),
            folders: folder_list(d),
            last_reading: d
                .latest_reading()
                .map(|r| r.measured_at.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

fn folder_list(d: &Device) -> String {
    d.tags
        .iter()
        .map(|t| t.slug.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn detail(d: &Device) -> String {
    let mut lines = vec![
        format!("Address:   {}", d.address()),
        format!("ID:        {}", d.id),
        format!("Slug:      {}", d.slug.as_deref().unwrap_or("-")),
        format!(
            "Sensor ID: {}",
            d.sensor_id().map_or_else(|| "-".into(), |id| id.to_string())
        ),
        format!("Folders:   {}", folder_list(d)),
    ];
    if let Some(reading) = d.latest_reading() {
        lines.push(format!("Measured:  {}", reading.measured_at.to_rfc3339()));
        for (field, value) in &reading.data {
            lines.push(format!("  {field}: {}", output::cell(value)));
        }
    }
    lines.join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn list(
    client: &TelemetryClient,
    args: &DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let devices = client.devices(&args.folder, args.max_pages)?;
    let out = output::render_list(global.format(), &devices, |d| DeviceRow::from(d), |d| {
        d.address().to_owned()
    })?;
    output::print_output(&out, global.quiet)
}

pub fn show(
    client: &TelemetryClient,
    args: &DeviceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let device = client.device(&args.address)?;
    let out = output::render_single(global.format(), &device, detail, |d| d.address().to_owned())?;
    output::print_output(&out, global.quiet)
}

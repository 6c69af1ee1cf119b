//! Packets command handler, with optional payload decoding.

use element_core::{Decoded, Packet, PacketsQuery, Target, TelemetryClient};
use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use crate::cli::{GlobalOpts, OutputFormat, PacketsArgs};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PacketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    packet_type: String,
    #[tabled(rename = "Transceived")]
    transceived_at: String,
    #[tabled(rename = "Payload")]
    payload: String,
}

impl From<&Packet> for PacketRow {
    fn from(p: &Packet) -> Self {
        Self {
            id: p.id.clone(),
            packet_type: p.packet_type.to_string(),
            transceived_at: p
                .transceived_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            payload: p.payload_encoded.clone().unwrap_or_default(),
        }
    }
}

/// A packet alongside its decoded payload.
#[derive(Debug, Serialize)]
struct DecodedPacket {
    id: String,
    device_id: String,
    transceived_at: Option<String>,
    decoded: Decoded,
}

#[derive(Tabled)]
struct DecodedRow {
    #[tabled(rename = "Packet")]
    id: String,
    #[tabled(rename = "Transceived")]
    transceived_at: String,
    #[tabled(rename = "Values")]
    values: String,
}

impl From<&DecodedPacket> for DecodedRow {
    fn from(p: &DecodedPacket) -> Self {
        Self {
            id: p.id.clone(),
            transceived_at: p.transceived_at.clone().unwrap_or_default(),
            values: p
                .decoded
                .iter()
                .map(|(name, field)| match field.unit() {
                    Some(unit) => format!("{name}: {} {unit}", field.value()),
                    None => format!("{name}: {}", field.value()),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub(crate) fn build_query(args: &PacketsArgs) -> Result<PacketsQuery, CliError> {
    let target =
        Target::from_options(args.target.device.as_deref(), args.target.folder.as_deref())?;
    let window = &args.window;
    let query = PacketsQuery::new(target)
        .packet_type(args.packet_type)
        .between(window.after, window.before)
        .limit(Some(window.limit))
        .max_pages(window.max_pages);
    Ok(if window.stream {
        query.streamed(window.query_timeout)
    } else {
        query
    })
}

pub fn handle(
    client: &TelemetryClient,
    args: &PacketsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let query = build_query(args)?;

    let Some(model) = args.decode else {
        let envelope = client.packets(&query)?;
        let out = match global.format() {
            OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
                let records = &envelope.body;
                output::render_single(
                    global.format(),
                    records,
                    |_| String::new(),
                    |_| String::new(),
                )?
            }
            OutputFormat::Table | OutputFormat::Plain => {
                let packets: Vec<Packet> = envelope.into_records()?;
                output::render_list(
                    global.format(),
                    &packets,
                    |p| PacketRow::from(p),
                    |p| p.id.clone(),
                )?
            }
        };
        return output::print_output(&out, global.quiet);
    };

    let mut decoded = Vec::new();
    for packet in client.get_packets(&query)? {
        if packet.payload_encoded.is_none() {
            warn!(packet = %packet.id, "packet has no payload, skipped");
            continue;
        }
        decoded.push(DecodedPacket {
            decoded: packet.decode(model, args.expect_version)?,
            transceived_at: packet.transceived_at.map(|t| t.to_rfc3339()),
            device_id: packet.device_id,
            id: packet.id,
        });
    }

    let out = output::render_list(global.format(), &decoded, |p| DecodedRow::from(p), |p| {
        p.decoded
            .iter()
            .map(|(name, field)| format!("{name}={}", field.value()))
            .collect::<Vec<_>>()
            .join(" ")
    })?;
    output::print_output(&out, global.quiet)
}

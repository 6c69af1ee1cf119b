//! Readings command handler.

use element_core::{Reading, ReadingsQuery, Target, TelemetryClient};
use tabled::Tabled;

use crate::cli::{GlobalOpts, OutputFormat, ReadingsArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "Measured")]
    measured_at: String,
    #[tabled(rename = "Sensor ID")]
    sensor_id: String,
    #[tabled(rename = "Data")]
    data: String,
}

impl From<&Reading> for ReadingRow {
    fn from(r: &Reading) -> Self {
        Self {
            measured_at: r.measured_at.to_rfc3339(),
            sensor_id: r.sensor_id().map(|id| id.to_string()).unwrap_or_default(),
            data: r
                .data
                .iter()
                .map(|(k, v)| format!("{k}={}", output::cell(v)))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

pub(crate) fn build_query(args: &ReadingsArgs) -> Result<ReadingsQuery, CliError> {
    let target =
        Target::from_options(args.target.device.as_deref(), args.target.folder.as_deref())?;
    let window = &args.window;
    let query = ReadingsQuery::new(target)
        .sort(args.sort, args.direction)
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
    args: &ReadingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let query = build_query(args)?;
    let envelope = client.readings(&query)?;

    let out = match global.format() {
        // Structured formats pass the records through untouched.
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            let records = &envelope.body;
            output::render_single(global.format(), records, |_| String::new(), |_| String::new())?
        }
        OutputFormat::Table | OutputFormat::Plain => {
            let readings: Vec<Reading> = envelope.into_records()?;
            output::render_list(
                global.format(),
                &readings,
                |r| ReadingRow::from(r),
                |r| r.id.clone(),
            )?
        }
    };
    output::print_output(&out, global.quiet)
}

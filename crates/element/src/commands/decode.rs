//! Offline payload decoding.

use element_codec::Field;
use element_core::Decoded;
use tabled::Tabled;

use crate::cli::{DecodeArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Unit")]
    unit: String,
}

impl FieldRow {
    fn new(name: &str, field: &Field) -> Self {
        Self {
            name: name.to_owned(),
            value: match field {
                Field::Integer(n) => n.to_string(),
                Field::Measurement(m) => m.value.to_string(),
            },
            unit: field.unit().unwrap_or_default().to_owned(),
        }
    }
}

fn table(decoded: &Decoded) -> String {
    let rows: Vec<FieldRow> = decoded
        .iter()
        .map(|(name, field)| FieldRow::new(name, field))
        .collect();
    output::render_table(&rows)
}

fn plain(decoded: &Decoded) -> String {
    decoded
        .iter()
        .map(|(name, field)| format!("{name}={}", field.value()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn handle(args: &DecodeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let decoded = element_codec::decode_hex(args.model, &args.payload, args.expect_version)?;
    let out = output::render_single(global.format(), &decoded, table, plain)?;
    output::print_output(&out, global.quiet)
}

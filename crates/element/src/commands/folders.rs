//! Folder command handler.

use element_core::{Folder, TelemetryClient};
use tabled::Tabled;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct FolderRow {
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            slug: f.slug.clone(),
            name: f.name.clone(),
            id: f.id.clone(),
        }
    }
}

pub fn handle(client: &TelemetryClient, global: &GlobalOpts) -> Result<(), CliError> {
    let folders = client.folders()?;
    let out = output::render_list(global.format(), &folders, |f| FolderRow::from(f), |f| {
        f.slug.clone()
    })?;
    output::print_output(&out, global.quiet)
}

//! Config subcommand handlers.

use std::fmt::Write as _;

use element_config::Config;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::available_profiles;
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

#[derive(Clone, Serialize, Tabled)]
struct ProfileRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Default")]
    default: bool,
    #[tabled(rename = "API location")]
    api_location: String,
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of `cfg` with plaintext API keys replaced by a mask.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.api_key.is_some() {
            profile.api_key = Some(MASK.into());
        }
    }
    cfg
}

/// TOML-like view of an already redacted config, profiles sorted by name.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        if let Some(ref location) = p.api_location {
            let _ = writeln!(out, "api_location = \"{location}\"");
        }
        if let Some(ref key) = p.api_key {
            let _ = writeln!(out, "api_key = \"{key}\"");
        }
        if let Some(ref env) = p.api_key_env {
            let _ = writeln!(out, "api_key_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

fn profile_rows(cfg: &Config) -> Vec<ProfileRow> {
    let default = cfg.active_profile_name(None);
    let mut rows: Vec<ProfileRow> = cfg
        .profiles
        .iter()
        .map(|(name, p)| ProfileRow {
            name: name.clone(),
            default: *name == default,
            api_location: p
                .api_location
                .clone()
                .unwrap_or_else(|| element_config::DEFAULT_API_LOCATION.into()),
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, mut cfg: Config, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let path = element_config::config_path();
            output::print_output(&path.display().to_string(), global.quiet)
        }

        ConfigCommand::Show => {
            let shown = redacted(&cfg);
            let out = output::render_single(global.format(), &shown, format_config, |_| {
                element_config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet)
        }

        ConfigCommand::Profiles => {
            if cfg.profiles.is_empty() {
                if !global.quiet {
                    eprintln!(
                        "No profiles configured in {}",
                        element_config::config_path().display()
                    );
                }
                return Ok(());
            }
            let rows = profile_rows(&cfg);
            let out =
                output::render_list(global.format(), &rows, ProfileRow::clone, |r| r.name.clone())?;
            output::print_output(&out, global.quiet)
        }

        ConfigCommand::Use { name } => {
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: available_profiles(&cfg),
                    path: element_config::config_path().display().to_string(),
                });
            }

            cfg.default_profile = Some(name.clone());
            element_config::save_config(&cfg)?;
            tracing::info!(profile = %name, "default profile updated");
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

//! Flag-over-profile resolution into an `element_core::ClientConfig`.
//!
//! Profiles live in `element-config`; this module only layers the global
//! CLI flags on top of them.

use std::time::Duration;

use clap::ValueEnum;

use element_api::transport::TlsMode;
use element_config::{Config, DEFAULT_API_LOCATION, Profile};
use element_core::ClientConfig;
use secrecy::SecretString;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Fill unset global options from the config's `[defaults]` table.
pub fn apply_defaults(global: &mut GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    if global.output.is_none() {
        let format = OutputFormat::from_str(&cfg.defaults.output, true).map_err(|_| {
            CliError::Validation {
                field: "defaults.output".into(),
                reason: format!(
                    "unknown output format '{}' in {}",
                    cfg.defaults.output,
                    element_config::config_path().display()
                ),
            }
        })?;
        global.output = Some(format);
    }
    Ok(())
}

/// Build a `ClientConfig` from the loaded config, profile, and CLI overrides.
pub fn build_client_config(cfg: &Config, global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let profile_name = cfg.active_profile_name(global.profile.as_deref());

    match cfg.profiles.get(&profile_name) {
        Some(profile) => resolve_profile(profile, &profile_name, cfg, global),
        // An explicitly requested profile must exist.
        None if global.profile.is_some() => Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(cfg),
            path: element_config::config_path().display().to_string(),
        }),
        // No profile at all: flags and environment only.
        None => resolve_profile(&Profile::default(), &profile_name, cfg, global),
    }
}

fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    // 1. API location (flag > env > profile > hosted default)
    let location = global
        .api_location
        .as_deref()
        .or(profile.api_location.as_deref())
        .unwrap_or(DEFAULT_API_LOCATION);
    let api_location = element_config::parse_api_location(location)?;

    // 2. API key (flag > env > profile)
    let api_key = match global.api_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => SecretString::from(key.to_owned()),
        None => element_config::resolve_api_key(profile, profile_name)?,
    };

    // 3. TLS verification
    let tls = if global.insecure || profile.insecure.unwrap_or(cfg.defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    // 4. Timeout
    let secs = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(cfg.defaults.timeout);

    Ok(ClientConfig {
        api_location,
        api_key,
        timeout: Duration::from_secs(secs),
        tls,
    })
}

pub(crate) fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

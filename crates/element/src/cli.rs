//! Clap derive structures for the `element` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

use element_core::{DeviceModel, PacketType, SensorId, SortDirection, SortField, Timestamp};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// element -- query Element IoT folders, devices, readings and packets
#[derive(Debug, Parser)]
#[command(
    name = "element",
    version,
    about = "Query the Element IoT platform from the command line",
    long_about = "Lists folders and devices, fetches readings and raw packets \
        (paged or streamed), resolves sensor ids to device addresses and \
        decodes Decentlab sensor payloads.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "ELEMENT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root, e.g. https://element-iot.com/api/v1/ (overrides profile)
    #[arg(long, env = "ELEMENT_API_LOCATION", global = true)]
    pub api_location: Option<String>,

    /// API key (overrides profile)
    #[arg(long, env = "ELEMENT_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Output format [default: the config's `defaults.output`, else table]
    #[arg(long, short = 'o', env = "ELEMENT_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ELEMENT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

impl GlobalOpts {
    /// The selected output format, table when none was chosen.
    pub fn format(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List folders (tags)
    #[command(alias = "tags")]
    Folders,

    /// List the devices of a folder
    Devices(DevicesArgs),

    /// Show one device, including its latest readings
    Device(DeviceArgs),

    /// Fetch readings of a device or folder
    Readings(ReadingsArgs),

    /// Fetch raw packets of a device or folder
    Packets(PacketsArgs),

    /// Decode a hex payload offline
    Decode(DecodeArgs),

    /// Translate between sensor ids and device addresses
    Resolve(ResolveArgs),

    /// Inspect and edit the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    /// Folder slug
    pub folder: String,

    /// Stop after this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,
}

#[derive(Debug, Args)]
pub struct DeviceArgs {
    /// Device address, e.g. DEC0054B0
    pub address: String,
}

// ── Readings & packets ───────────────────────────────────────────────

/// Device-or-folder selection shared by readings and packets.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Device address
    #[arg(long, short = 'd')]
    pub device: Option<String>,

    /// Folder slug
    #[arg(long, short = 'f')]
    pub folder: Option<String>,
}

/// Time window and paging shared by readings and packets.
#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Only records after this time (2024-08-13T13:05:00, or RFC 3339)
    #[arg(long)]
    pub after: Option<Timestamp>,

    /// Only records before this time
    #[arg(long)]
    pub before: Option<Timestamp>,

    /// Page size (ignored when streaming)
    #[arg(long, short = 'l', default_value_t = element_core::DEFAULT_LIMIT)]
    pub limit: u32,

    /// Stop after this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Use the streaming endpoint instead of pagination
    #[arg(long)]
    pub stream: bool,

    /// Server-side query timeout in milliseconds (streaming only)
    #[arg(long, requires = "stream")]
    pub query_timeout: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ReadingsArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Sort field: measured_at or inserted_at
    #[arg(long, default_value = "measured_at")]
    pub sort: SortField,

    /// Sort direction: asc or desc
    #[arg(long, default_value = "asc")]
    pub direction: SortDirection,
}

#[derive(Debug, Args)]
pub struct PacketsArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Packet direction: up or down
    #[arg(long)]
    pub packet_type: Option<PacketType>,

    /// Decode each payload with this device model (e.g. DL-SHT35)
    #[arg(long)]
    pub decode: Option<DeviceModel>,

    /// Reject payloads whose protocol version differs
    #[arg(long, requires = "decode")]
    pub expect_version: Option<u8>,
}

// ── Decode ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Device model: DL-SHT35, DL-BLG or DL-ATM41
    pub model: DeviceModel,

    /// Hex-encoded payload
    pub payload: String,

    /// Reject payloads whose protocol version differs
    #[arg(long)]
    pub expect_version: Option<u8>,
}

// ── Resolve ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ResolveArgs {
    #[command(subcommand)]
    pub command: ResolveCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResolveCommand {
    /// Sensor id of a device address
    Id {
        /// Device address, e.g. DEC0054B0
        address: String,

        /// Folder slug (defaults to the device's first folder)
        #[arg(long, short = 'f')]
        folder: Option<String>,
    },

    /// Device address of a sensor id within a folder
    Address {
        /// Sensor id, e.g. 21680
        id: SensorId,

        /// Folder slug to search
        #[arg(long, short = 'f')]
        folder: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the loaded configuration, API keys masked
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

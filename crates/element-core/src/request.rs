// Typed request descriptions for readings and packets.
//
// Both resources are addressed either by device name or by folder, never
// both. The builders render their parameters in a fixed order so request
// URLs are reproducible.

use std::fmt;

use element_api::query::{AFTER, BEFORE, LIMIT, PACKET_TYPE, SORT, SORT_DIRECTION, TIMEOUT};
use element_api::{PacketType, Query, SortDirection, SortField, Timestamp};

use crate::error::CoreError;

/// Default page size for non-streamed collection requests.
pub const DEFAULT_LIMIT: u32 = 100;

/// What a readings or packets request is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A single device, by address (`devices/by-name/{name}/...`).
    Device(String),
    /// Every device in a folder (`tags/{slug}/...`).
    Folder(String),
}

impl Target {
    /// Exactly one of `device_name` and `folder` must be given.
    pub fn from_options(device_name: Option<&str>, folder: Option<&str>) -> Result<Self, CoreError> {
        match (device_name, folder) {
            (Some(name), None) => Ok(Self::Device(name.to_owned())),
            (None, Some(slug)) => Ok(Self::Folder(slug.to_owned())),
            (None, None) => Err(CoreError::Usage {
                message: "one of device_name or folder needs to be specified",
            }),
            (Some(_), Some(_)) => Err(CoreError::Usage {
                message: "only one of device_name or folder must be specified",
            }),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Device(name) | Self::Folder(name) => name,
        }
    }

    /// Resource path below the target, e.g. `tags/abc/readings`.
    pub fn path(&self, resource: &str) -> String {
        match self {
            Self::Device(name) => format!("devices/by-name/{name}/{resource}"),
            Self::Folder(slug) => format!("tags/{slug}/{resource}"),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Readings ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingsQuery {
    pub target: Target,
    pub sort: SortField,
    pub sort_direction: SortDirection,
    pub after: Option<Timestamp>,
    pub before: Option<Timestamp>,
    /// Page size; ignored when streaming.
    pub limit: Option<u32>,
    /// Stop paginating after this many pages.
    pub max_pages: Option<usize>,
    pub stream: bool,
    /// Server-side query timeout in milliseconds; streaming only.
    pub timeout_ms: Option<u64>,
}

impl ReadingsQuery {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            sort: SortField::default(),
            sort_direction: SortDirection::default(),
            after: None,
            before: None,
            limit: Some(DEFAULT_LIMIT),
            max_pages: None,
            stream: false,
            timeout_ms: None,
        }
    }

    pub fn device(name: impl Into<String>) -> Self {
        Self::new(Target::Device(name.into()))
    }

    pub fn folder(slug: impl Into<String>) -> Self {
        Self::new(Target::Folder(slug.into()))
    }

    pub fn sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort = field;
        self.sort_direction = direction;
        self
    }

    pub fn between(mut self, after: Option<Timestamp>, before: Option<Timestamp>) -> Self {
        self.after = after;
        self.before = before;
        self
    }

    pub fn limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    pub fn max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn streamed(mut self, timeout_ms: Option<u64>) -> Self {
        self.stream = true;
        self.timeout_ms = timeout_ms;
        self
    }

    /// Parameters in wire order: sort, direction, limit, after, before, timeout.
    pub fn to_query(&self) -> Query {
        Query::new()
            .set(SORT, self.sort)
            .set(SORT_DIRECTION, self.sort_direction)
            .set_opt(LIMIT, self.limit.filter(|_| !self.stream))
            .set_opt(AFTER, self.after)
            .set_opt(BEFORE, self.before)
            .set_opt(TIMEOUT, self.timeout_ms.filter(|_| self.stream))
    }
}

// ── Packets ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketsQuery {
    pub target: Target,
    pub packet_type: Option<PacketType>,
    pub after: Option<Timestamp>,
    pub before: Option<Timestamp>,
    pub limit: Option<u32>,
    pub max_pages: Option<usize>,
    pub stream: bool,
    pub timeout_ms: Option<u64>,
}

impl PacketsQuery {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            packet_type: None,
            after: None,
            before: None,
            limit: Some(DEFAULT_LIMIT),
            max_pages: None,
            stream: false,
            timeout_ms: None,
        }
    }

    pub fn device(name: impl Into<String>) -> Self {
        Self::new(Target::Device(name.into()))
    }

    pub fn folder(slug: impl Into<String>) -> Self {
        Self::new(Target::Folder(slug.into()))
    }

    pub fn packet_type(mut self, packet_type: Option<PacketType>) -> Self {
        self.packet_type = packet_type;
        self
    }

    pub fn between(mut self, after: Option<Timestamp>, before: Option<Timestamp>) -> Self {
        self.after = after;
        self.before = before;
        self
    }

    pub fn limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    pub fn max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn streamed(mut self, timeout_ms: Option<u64>) -> Self {
        self.stream = true;
        self.timeout_ms = timeout_ms;
        self
    }

    /// Parameters in wire order: limit, packet type, after, before, timeout.
    pub fn to_query(&self) -> Query {
        Query::new()
            .set_opt(LIMIT, self.limit.filter(|_| !self.stream))
            .set_opt(PACKET_TYPE, self.packet_type)
            .set_opt(AFTER, self.after)
            .set_opt(BEFORE, self.before)
            .set_opt(TIMEOUT, self.timeout_ms.filter(|_| self.stream))
    }
}

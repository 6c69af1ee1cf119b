use serde::{Deserialize, Serialize};

/// A device group. The API calls these *tags*; the slug is what every
/// folder-scoped path uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub slug: String,
}

/// A folder reference embedded in a device (`device.tags[]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub slug: String,
}

// ── Identity cache ──
//
// Two identity spaces meet here: the device address the platform uses
// (`DEC0054B0`) and the vendor sensor id found in payloads (`21680`).
// Per folder only the forward map `SensorId -> address` is stored; the
// inverse is derived from it, so the two views cannot drift apart.

use std::collections::{BTreeMap, HashMap};

use crate::model::SensorId;

/// Per-folder bijection between sensor ids and device addresses.
///
/// Grows monotonically for the lifetime of its owner and is never evicted.
/// Entries may go stale if devices are re-provisioned; nothing refreshes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityCache {
    folders: HashMap<String, BTreeMap<SensorId, String>>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `id` is the sensor behind `address` in `folder`.
    ///
    /// An address already mapped under another id moves to `id`, keeping
    /// the forward map one-to-one.
    pub fn insert(&mut self, folder: &str, id: SensorId, address: impl Into<String>) {
        let address = address.into();
        let map = self.folders.entry(folder.to_owned()).or_default();
        map.retain(|other, existing| *other == id || *existing != address);
        map.insert(id, address);
    }

    /// Address of `id` in `folder`.
    pub fn address(&self, folder: &str, id: SensorId) -> Option<&str> {
        self.folders.get(folder)?.get(&id).map(String::as_str)
    }

    /// Sensor id of `address` in `folder`.
    pub fn id(&self, folder: &str, address: &str) -> Option<SensorId> {
        self.folders
            .get(folder)?
            .iter()
            .find_map(|(id, a)| (a == address).then_some(*id))
    }

    /// Forward view of one folder.
    pub fn forward(&self, folder: &str) -> Option<&BTreeMap<SensorId, String>> {
        self.folders.get(folder)
    }

    /// Inverse view (`address -> SensorId`) of one folder, derived on demand.
    pub fn inverse(&self, folder: &str) -> BTreeMap<String, SensorId> {
        self.folders
            .get(folder)
            .map(|map| map.iter().map(|(id, a)| (a.clone(), *id)).collect())
            .unwrap_or_default()
    }

    /// Folder slugs with at least one entry, sorted.
    pub fn folders(&self) -> Vec<&str> {
        let mut folders: Vec<&str> = self
            .folders
            .iter()
            .filter(|(_, map)| !map.is_empty())
            .map(|(slug, _)| slug.as_str())
            .collect();
        folders.sort_unstable();
        folders
    }

    /// Total number of mappings across all folders.
    pub fn len(&self) -> usize {
        self.folders.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Telemetry client ──
//
// Facade over a `Fetch` implementation: folder and device listings,
// readings and packets (paged or streamed), and the identity resolver.
// The resolver mutates the owned cache, so it takes `&mut self`; a client
// shared across threads needs external synchronization.

use element_api::query::{LIMIT, SORT, SORT_DIRECTION};
use element_api::{
    ApiClient, Envelope, Fetch, Query, SortDirection, SortField, ingest_stream, paginate,
};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::identity::IdentityCache;
use crate::model::{Device, Folder, Packet, Reading, SensorId};
use crate::request::{PacketsQuery, ReadingsQuery, Target};

/// Client for one Element IoT instance.
#[derive(Debug)]
pub struct TelemetryClient<F = ApiClient> {
    fetcher: F,
    cache: IdentityCache,
}

impl TelemetryClient<ApiClient> {
    /// Build an HTTP-backed client.
    pub fn connect(config: &ClientConfig) -> Result<Self, CoreError> {
        let api = ApiClient::new(
            config.api_location.as_str(),
            config.api_key.clone(),
            &config.transport(),
        )?;
        info!(api_location = %api.base_url(), "client ready");
        Ok(Self::new(api))
    }
}

impl<F: Fetch> TelemetryClient<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: IdentityCache::new(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn cache(&self) -> &IdentityCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut IdentityCache {
        &mut self.cache
    }

    // ── Folders & devices ────────────────────────────────────────────

    pub fn folders(&self) -> Result<Vec<Folder>, CoreError> {
        Ok(paginate(&self.fetcher, "tags", &Query::new(), None)?.into_records()?)
    }

    pub fn folder_slugs(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.folders()?.into_iter().map(|f| f.slug).collect())
    }

    pub fn devices(&self, folder: &str, max_pages: Option<usize>) -> Result<Vec<Device>, CoreError> {
        let path = format!("tags/{folder}/devices");
        Ok(paginate(&self.fetcher, &path, &Query::new(), max_pages)?.into_records()?)
    }

    /// Device addresses of a folder, in listing order.
    pub fn device_addresses(&self, folder: &str) -> Result<Vec<String>, CoreError> {
        Ok(self
            .devices(folder, None)?
            .into_iter()
            .map(|d| d.name)
            .collect())
    }

    /// Device detail, including its most recent readings.
    pub fn device(&self, address: &str) -> Result<Device, CoreError> {
        let path = format!("devices/{}", address.to_lowercase());
        Ok(self.fetcher.fetch(&path, &Query::new())?.into_record()?)
    }

    // ── Readings & packets ───────────────────────────────────────────

    /// Raw readings envelope: merged pages, or the drained stream.
    pub fn readings(&self, query: &ReadingsQuery) -> Result<Envelope, CoreError> {
        let path = query.target.path("readings");
        let params = query.to_query();
        let env = if query.stream {
            ingest_stream(&self.fetcher, &path, &params)?
        } else {
            paginate(&self.fetcher, &path, &params, query.max_pages)?
        };
        warn_if_empty(&env, &query.target);
        Ok(env)
    }

    pub fn get_readings(&self, query: &ReadingsQuery) -> Result<Vec<Reading>, CoreError> {
        Ok(self.readings(query)?.into_records()?)
    }

    /// Raw packets envelope: merged pages, or the drained stream.
    pub fn packets(&self, query: &PacketsQuery) -> Result<Envelope, CoreError> {
        let path = query.target.path("packets");
        let params = query.to_query();
        let env = if query.stream {
            ingest_stream(&self.fetcher, &path, &params)?
        } else {
            paginate(&self.fetcher, &path, &params, query.max_pages)?
        };
        warn_if_empty(&env, &query.target);
        Ok(env)
    }

    pub fn get_packets(&self, query: &PacketsQuery) -> Result<Vec<Packet>, CoreError> {
        Ok(self.packets(query)?.into_records()?)
    }

    // ── Identity resolution ──────────────────────────────────────────

    /// Sensor id of the device at `address`.
    ///
    /// With a folder and a cached mapping no request is made. Otherwise the
    /// device detail is fetched and the id read from its newest embedded
    /// reading; the mapping is cached under `folder`, or under the device's
    /// first folder when none was given.
    pub fn id_from_address(
        &mut self,
        address: &str,
        folder: Option<&str>,
    ) -> Result<SensorId, CoreError> {
        if let Some(id) = folder.and_then(|f| self.cache.id(f, address)) {
            debug!(address, id = %id, "sensor id from cache");
            return Ok(id);
        }

        let device = self.device(address)?;
        let id = device.sensor_id().ok_or_else(|| CoreError::SensorIdMissing {
            address: address.to_owned(),
        })?;
        let folder = match folder {
            Some(f) => f.to_owned(),
            None => device
                .primary_folder()
                .ok_or_else(|| CoreError::FolderUnknown {
                    address: address.to_owned(),
                })?
                .to_owned(),
        };

        self.cache.insert(&folder, id, address);
        debug!(address, id = %id, folder = %folder, "sensor id resolved");
        Ok(id)
    }

    /// Address of the device whose sensor id is `id` in `folder`.
    ///
    /// On a cache miss every device of the folder is asked for a
    /// single reading, in listing order, until one reports `id`. Each
    /// id seen on the way is cached, so later lookups in the same folder are
    /// free.
    pub fn address_from_id(&mut self, id: SensorId, folder: &str) -> Result<String, CoreError> {
        if let Some(address) = self.cache.address(folder, id) {
            debug!(id = %id, address, "address from cache");
            return Ok(address.to_owned());
        }

        let query = Query::new()
            .set(SORT, SortField::MeasuredAt)
            .set(SORT_DIRECTION, SortDirection::Asc)
            .set(LIMIT, 1);

        for device in self.devices(folder, None)? {
            let path = Target::Device(device.name.clone()).path("readings");
            let readings: Vec<Reading> = self.fetcher.fetch(&path, &query)?.into_records()?;
            let Some(found) = readings.first().and_then(Reading::sensor_id) else {
                debug!(address = %device.name, "no readings, skipped");
                continue;
            };

            self.cache.insert(folder, found, device.name.clone());
            if found == id {
                debug!(id = %id, address = %device.name, folder, "address resolved");
                return Ok(device.name);
            }
        }

        Err(CoreError::AddressNotFound { id })
    }
}

fn warn_if_empty(env: &Envelope, target: &Target) {
    if env.is_empty() {
        warn!("no data for '{target}'");
    }
}

//! Cache manager: refresh policy and completion dispatch
//!
//! Ties the disk store and the fetch client together. Each public operation
//! decides between serving from cache, fetching and persisting, or fetching
//! without persisting, and emits at most one [`CacheEvent`] on completion.
//! Failures are logged and never raised to the caller; the caller learns of
//! a failure only by the absence of the expected event.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::cache::CacheStore;
use crate::config::ApiConfig;
use crate::fetch::Fetch;

/// Cache key for the contracts listing
pub const CONTRACTS_KEY: &str = "contracts";

/// Catalog entries older than this many whole days are refreshed.
///
/// Age is elapsed milliseconds floor-divided by one day, so an entry expires
/// only once strictly more than 14 whole days have elapsed (14 days and 23
/// hours still floors to 14 and is served from cache).
const CARTO_TTL_DAYS: i64 = 14;

/// Buffer size of the completion event channel
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// A cache file only ever holds a validated response body.
fn is_valid_json(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body).is_ok()
}

/// Completion notifications emitted by the cache manager
///
/// Each completed operation emits exactly one event carrying the raw
/// response (or cache file) body; a failed operation emits nothing.
#[derive(Debug, Clone)]
pub enum CacheEvent {
    /// Contracts listing loaded (from cache or network)
    ContractsUpdated(String),
    /// Station catalog for a city loaded (from cache or network)
    CartoChanged(String),
    /// Live station details received (never cached)
    StationDetails(String),
}

/// Disk-backed cache and refresh policy for JCDecaux bike-share data
pub struct CacheManager {
    store: CacheStore,
    fetcher: Arc<dyn Fetch>,
    config: ApiConfig,
    /// Last successfully loaded catalog; serialized so concurrent
    /// completions on a multi-threaded runtime cannot interleave updates.
    carto_json: Mutex<String>,
    events: mpsc::Sender<CacheEvent>,
}

impl CacheManager {
    /// Creates a manager and the receiver for its completion events
    pub fn new(
        store: CacheStore,
        fetcher: Arc<dyn Fetch>,
        config: ApiConfig,
    ) -> (Self, mpsc::Receiver<CacheEvent>) {
        let (events, receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let manager = Self {
            store,
            fetcher,
            config,
            carto_json: Mutex::new(String::new()),
            events,
        };
        (manager, receiver)
    }

    /// Returns the last successfully loaded catalog JSON
    ///
    /// Empty until a catalog load completes; a failed load leaves the
    /// previous value in place.
    pub fn carto_json(&self) -> String {
        self.carto_json.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set_carto(&self, carto: String) {
        *self.carto_json.lock().unwrap_or_else(|e| e.into_inner()) = carto;
    }

    async fn emit(&self, event: CacheEvent) {
        // A dropped receiver just means nobody is listening anymore.
        let _ = self.events.send(event).await;
    }

    /// Loads the contracts listing
    ///
    /// Without `force_refresh`, a cached copy is served as-is; a cache miss
    /// performs no fetch and emits nothing (the historical contract of this
    /// operation: callers wanting a download must force the refresh). With
    /// `force_refresh`, the network is always hit regardless of the cache,
    /// and a successful, well-formed JSON response is persisted before the
    /// event fires.
    pub async fn get_contracts(&self, force_refresh: bool) {
        if !force_refresh {
            if self.store.exists(CONTRACTS_KEY) {
                match self.store.read(CONTRACTS_KEY) {
                    Ok(contracts) => {
                        debug!("contracts already in cache, not downloading");
                        self.emit(CacheEvent::ContractsUpdated(contracts)).await;
                    }
                    Err(e) => warn!("failed to read cached contracts: {e}"),
                }
            }
            return;
        }

        let url = self.config.contracts_url();
        match self.fetcher.get(&url).await {
            Ok(body) if is_valid_json(&body) => {
                if let Err(e) = self.store.write(CONTRACTS_KEY, body.as_bytes()) {
                    warn!("failed to persist contracts: {e}");
                }
                self.emit(CacheEvent::ContractsUpdated(body)).await;
            }
            Ok(_) => error!("contracts response was not valid JSON, discarding"),
            Err(e) => error!("error while downloading contracts: {e}"),
        }
    }

    /// Loads the station catalog for `city`
    ///
    /// An existing cache entry older than the TTL is deleted first. A
    /// surviving entry is served without any network request; otherwise the
    /// catalog is fetched, validated as JSON, persisted under the city's key,
    /// and installed as the current catalog state. On fetch or validation
    /// failure nothing changes.
    pub async fn download_carto(&self, city: &str) {
        if self.store.exists(city) {
            match self.store.age_in_days(city) {
                Ok(age) if age > CARTO_TTL_DAYS => {
                    debug!("removing expired cached {city}.json (age {age} days)");
                    if let Err(e) = self.store.remove(city) {
                        warn!("failed to remove expired {city}.json: {e}");
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("could not determine age of {city}.json: {e}"),
            }
        }

        if self.store.exists(city) {
            match self.store.read(city) {
                Ok(carto) => {
                    debug!("{city}.json in cache, not downloading");
                    self.set_carto(carto.clone());
                    self.emit(CacheEvent::CartoChanged(carto)).await;
                    return;
                }
                Err(e) => warn!("failed to read cached {city}.json: {e}"),
            }
        }

        let url = self.config.carto_url(city);
        debug!("downloading carto from {url}");
        match self.fetcher.get(&url).await {
            Ok(body) if is_valid_json(&body) => {
                if let Err(e) = self.store.write(city, body.as_bytes()) {
                    warn!("failed to persist {city}.json: {e}");
                }
                self.set_carto(body.clone());
                self.emit(CacheEvent::CartoChanged(body)).await;
            }
            Ok(_) => error!("carto response for {city} was not valid JSON, discarding"),
            Err(e) => error!("error while downloading carto: {e}"),
        }
    }

    /// Fetches live details for one station within a contract
    ///
    /// Always hits the network; station details are never cached. On success
    /// the raw detail body is emitted; on failure nothing is emitted and no
    /// state changes.
    pub async fn get_station_details(&self, station_number: &str, contract: &str) {
        let url = self.config.station_details_url(station_number, contract);
        match self.fetcher.get(&url).await {
            Ok(body) => self.emit(CacheEvent::StationDetails(body)).await,
            Err(e) => error!("error while getting station details: {e}"),
        }
    }

    /// Deletes the cache directory and everything in it
    ///
    /// Returns true iff every entry and the root itself were removed, or the
    /// root was already absent.
    pub fn remove_cache_dir(&self) -> bool {
        self.store.purge_all()
    }
}

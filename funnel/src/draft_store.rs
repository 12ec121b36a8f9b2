//! Consent-gated local persistence of unfinished forms.
//!
//! The storage backend is injected so the same store works against browser
//! local storage, a file directory, or an in-memory map in tests.

use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{BookingRequestPayload, ContactSubmissionPayload, EventRequestPayload};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;

pub const EVENT_REQUEST_DRAFT_KEY: &str = "mff-calculator-data";
pub const BOOKING_DRAFT_KEY: &str = "mff-booking-data";
pub const CONTACT_DRAFT_KEY: &str = "mff-contact-data";

/// Default period of the autosave tick while a form is open
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("draft storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("draft could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("draft storage is unavailable: {0}")]
    Unavailable(String),
}

/// Minimal key/value contract of browser local storage
pub trait DraftStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, DraftError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), DraftError>;
    fn remove_item(&self, key: &str) -> Result<(), DraftError>;
}

/// Payloads that carry their own storage consent flag
pub trait ConsentAware {
    fn storage_consent(&self) -> bool;
}

impl ConsentAware for EventRequestPayload {
    fn storage_consent(&self) -> bool {
        self.storage_consent
    }
}

impl ConsentAware for BookingRequestPayload {
    fn storage_consent(&self) -> bool {
        self.storage_consent
    }
}

impl ConsentAware for ContactSubmissionPayload {
    fn storage_consent(&self) -> bool {
        self.storage_consent
    }
}

/// Shared in-memory storage; clones see the same entries, like two tabs of
/// one browser profile.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DraftStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, DraftError> {
        let items = self
            .items
            .lock()
            .map_err(|e| DraftError::Unavailable(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), DraftError> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| DraftError::Unavailable(e.to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), DraftError> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| DraftError::Unavailable(e.to_string()))?;
        items.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl DraftStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, DraftError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), DraftError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), DraftError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Draft of one form kind under one storage key
pub struct DraftStore<T, S> {
    key: String,
    storage: S,
    _payload: PhantomData<T>,
}

impl<T, S> DraftStore<T, S>
where
    T: Serialize + DeserializeOwned + ConsentAware,
    S: DraftStorage,
{
    pub fn new(key: impl Into<String>, storage: S) -> Self {
        Self {
            key: key.into(),
            storage,
            _payload: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Writes the payload if it carries consent. Returns whether it wrote.
    pub fn save(&self, payload: &T) -> Result<bool, DraftError> {
        if !payload.storage_consent() {
            return Ok(false);
        }

        let json = serde_json::to_string(payload)?;
        self.storage.set_item(&self.key, &json)?;
        Ok(true)
    }

    /// Restores a saved payload. Entries without consent or that no longer
    /// parse are treated as absent.
    pub fn load(&self) -> Result<Option<T>, DraftError> {
        let Some(json) = self.storage.get_item(&self.key)? else {
            return Ok(None);
        };

        match serde_json::from_str::<T>(&json) {
            Ok(payload) if payload.storage_consent() => Ok(Some(payload)),
            _ => Ok(None),
        }
    }

    pub fn clear(&self) -> Result<(), DraftError> {
        self.storage.remove_item(&self.key)
    }

    /// Applies a consent change; revoking consent drops the stored draft
    pub fn apply_consent(&self, payload: &T) -> Result<(), DraftError> {
        if payload.storage_consent() {
            self.save(payload)?;
        } else {
            self.clear()?;
        }
        Ok(())
    }
}

/// Fixed-interval autosave clock, driven by the host's timer
#[derive(Debug, Clone)]
pub struct Autosave {
    interval: Duration,
    last_run: Option<Instant>,
}

impl Autosave {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
        }
    }

    /// True at most once per interval
    pub fn due(&mut self, now: Instant) -> bool {
        let due = match self.last_run {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.last_run = Some(now);
        }
        due
    }

    pub fn reset(&mut self) {
        self.last_run = None;
    }
}

impl Default for Autosave {
    fn default() -> Self {
        Self::new(AUTOSAVE_INTERVAL)
    }
}

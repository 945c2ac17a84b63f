use super::settings::Settings;
use super::store::KeyValueStore;
use crate::app::AppState;
use crate::domain::IdGenerator;
use anyhow::{Context, Result};
use tracing::{error, info, warn};

/// Key under which the whole state is stored
pub const STORAGE_KEY: &str = "tasky_data_v6";

/// Saves and loads [`AppState`] as JSON in a key-value store
#[derive(Debug)]
pub struct Gateway<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> Gateway<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Use a different storage key
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serialize and write the state
    pub fn save(&mut self, state: &AppState) -> Result<()> {
        let json = serde_json::to_string(state).context("Failed to serialize state")?;
        self.store.set(&self.key, &json)
    }

    /// Read the stored state. `Ok(None)` when nothing is stored; an error
    /// when the store fails or the payload is unreadable.
    pub fn load(&self, settings: &Settings, ids: IdGenerator) -> Result<Option<AppState>> {
        let Some(raw) = self.store.get_bytes(&self.key)? else {
            return Ok(None);
        };
        let state = parse_state(&raw)
            .context("Stored state is unreadable")?
            .with_settings(settings.clone())
            .with_ids(ids);
        Ok(Some(state))
    }

    /// Load the stored state, falling back to the first-run state when nothing
    /// is stored or the payload is unreadable (bad JSON or not UTF-8). Only
    /// store I/O failures are errors.
    pub fn load_or_default(&mut self, settings: &Settings, ids: IdGenerator) -> Result<AppState> {
        let raw = self.store.get_bytes(&self.key)?;

        let state = match raw.as_deref().map(parse_state) {
            Some(Ok(state)) => {
                let mut state = state.with_settings(settings.clone()).with_ids(ids);
                if state.repair() {
                    warn!(key = %self.key, "repaired stored state");
                    self.save(&state)?;
                }
                return Ok(state);
            }
            Some(Err(e)) => {
                error!(key = %self.key, error = %e, "error loading state, starting fresh");
                self.store.backup(&self.key)?;
                AppState::with_default_list(settings.clone(), ids)
            }
            None => {
                info!(key = %self.key, "no stored state, creating default list");
                AppState::with_default_list(settings.clone(), ids)
            }
        };

        self.save(&state)?;
        Ok(state)
    }
}

/// Parse a stored payload. Missing or null collections default to empty.
pub fn parse_state<B: AsRef<[u8]>>(raw: B) -> serde_json::Result<AppState> {
    serde_json::from_slice(raw.as_ref())
}

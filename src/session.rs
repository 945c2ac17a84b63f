use crate::app::AppState;
use crate::domain::IdGenerator;
use crate::error::TodoError;
use crate::persistence::{Gateway, KeyValueStore, Settings};
use anyhow::Result;

/// An [`AppState`] bound to its gateway. Every successful mutation is
/// written through before returning.
#[derive(Debug)]
pub struct Session<S: KeyValueStore> {
    state: AppState,
    gateway: Gateway<S>,
}

impl<S: KeyValueStore> Session<S> {
    /// Load (or initialize) the stored state
    pub fn open(mut gateway: Gateway<S>, settings: &Settings, ids: IdGenerator) -> Result<Self> {
        let state = gateway.load_or_default(settings, ids)?;
        Ok(Self { state, gateway })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn gateway(&self) -> &Gateway<S> {
        &self.gateway
    }

    /// Run a mutation and persist the state if it succeeded. A failed
    /// mutation leaves both the state and the store untouched.
    pub fn mutate<T, F>(&mut self, op: F) -> Result<T>
    where
        F: FnOnce(&mut AppState) -> Result<T, TodoError>,
    {
        let value = op(&mut self.state)?;
        self.gateway.save(&self.state)?;
        Ok(value)
    }
}

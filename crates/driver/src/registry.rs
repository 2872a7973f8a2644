//! A registry of drivers, keyed by name.
//!
//! Nothing is registered implicitly: build a registry with [`initialize`], or start from
//! [`DriverRegistry::new`] and register drivers yourself.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info_span;

use bigquery_driver_configuration::environment::Environment;
use bigquery_driver_configuration::ClientSettings;

use crate::connection::Connection;
use crate::driver::{BigQueryDriver, Driver};
use crate::error::Error;

#[derive(Default)]
pub struct DriverRegistry {
    drivers: BTreeMap<String, Arc<dyn Driver>>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a driver under its name. Names are unique.
    pub fn register(&mut self, driver: impl Driver + 'static) -> Result<(), Error> {
        match self.drivers.entry(driver.name().to_string()) {
            Entry::Occupied(entry) => Err(Error::DuplicateDriver(entry.key().clone())),
            Entry::Vacant(entry) => {
                tracing::debug!(name = entry.key().as_str(), "registered driver");
                entry.insert(Arc::new(driver));
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Driver>> {
        self.drivers.get(name).cloned()
    }

    /// The names of all registered drivers, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.drivers.keys().map(String::as_str)
    }

    /// Open a connection with the driver registered under `name`.
    pub fn open(&self, name: &str, uri: &str) -> Result<Connection, Error> {
        let driver = self
            .drivers
            .get(name)
            .ok_or_else(|| Error::UnknownDriver(name.to_string()))?;
        info_span!("Open connection", driver = name).in_scope(|| driver.open(uri))
    }
}

/// Build the registry used by the rest of the process, with the BigQuery driver installed.
pub fn initialize<Env>(settings: ClientSettings, environment: Env) -> DriverRegistry
where
    Env: Environment + Send + Sync + 'static,
{
    let driver = BigQueryDriver::from_settings(settings, environment);
    let mut drivers: BTreeMap<String, Arc<dyn Driver>> = BTreeMap::new();
    drivers.insert(driver.name().to_string(), Arc::new(driver));
    DriverRegistry { drivers }
}

//! A connection driver for BigQuery.
//!
//! Connection strings are resolved by [`bigquery_driver_configuration`], and the resulting
//! configuration is handed to a [`client::ClientFactory`] that builds the actual client.

pub mod client;
pub mod connection;
pub mod context;
pub mod driver;
pub mod error;
pub mod registry;

pub use bigquery_driver_configuration as configuration;
pub use client::{BigQueryClientFactory, ClientError, ClientFactory, QueryClient};
pub use connection::{Connection, LiveConnection, Statement};
pub use context::Context;
pub use driver::{BigQueryDriver, Driver, DIAGNOSTIC_TOKEN};
pub use error::Error;
pub use registry::DriverRegistry;

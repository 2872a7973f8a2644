//! Errors returned by the driver.

use bigquery_driver_configuration::ConfigurationError;
use gcp_bigquery_client::error::BQError;

use crate::client::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The connection string was rejected. No network activity took place.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The client factory failed. The error is passed on as the factory reported it.
    #[error(transparent)]
    ClientConstruction(ClientError),
    #[error("unable to start the connection runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("the bigquery driver blocks and cannot be used from within an async runtime")]
    NestedRuntime,
    #[error("{0} is not supported by the bigquery driver")]
    Unsupported(&'static str),
    #[error("the connection is closed")]
    Closed,
    #[error("the query was cancelled")]
    Cancelled,
    #[error("query failed: {0}")]
    Query(#[from] BQError),
    #[error("no driver is registered under the name {0:?}")]
    UnknownDriver(String),
    #[error("a driver is already registered under the name {0:?}")]
    DuplicateDriver(String),
}

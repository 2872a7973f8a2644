//! Common functions used across test cases.

use std::sync::Arc;

use bigquery_driver::BigQueryDriver;
use tests_common::fakes::RecordingClientFactory;

/// Creates a driver backed by the given fake factory.
pub fn driver_with(factory: &Arc<RecordingClientFactory>) -> BigQueryDriver {
    tests_common::init_logging();
    BigQueryDriver::new(Arc::clone(factory))
}

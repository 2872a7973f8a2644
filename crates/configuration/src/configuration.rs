//! The resolved configuration of a single connection attempt.

use serde::Serialize;

/// The 'Configuration' type collects everything the driver needs to construct a BigQuery client
/// and address the dataset a connection targets.
///
/// Values of this type are only produced by [`crate::uri::resolve`], which guarantees that the
/// project id and dataset are non-empty and that every field is lowercase. A configuration is
/// immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    project_id: String,
    location: String,
    data_set: String,
    scopes: Vec<String>,
}

impl Configuration {
    pub(crate) fn new(
        project_id: String,
        location: String,
        data_set: String,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            project_id,
            location,
            data_set,
            scopes,
        }
    }

    /// The Google Cloud project the client is created for.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// The region the dataset lives in. Empty when the connection string did not name one.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn data_set(&self) -> &str {
        &self.data_set
    }

    /// The permission scopes to request, in the order given. Empty means the default scope.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }
}

//! Settings for constructing BigQuery clients.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::environment::{self, Environment};
use crate::error::SettingsError;
use crate::values::{Secret, ServiceKey};

pub const SETTINGS_FILENAME: &str = "settings.json";
pub const DEFAULT_SERVICE_KEY_VARIABLE: &str = "BIGQUERY_SERVICE_KEY";

/// Client settings.
///
/// The connection string says *what* to connect to; these settings say *who* connects.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientSettings {
    /// Service account key, as JSON, used to authenticate against BigQuery.
    #[serde(default = "default_service_key")]
    pub service_key: ServiceKey,
}

impl ClientSettings {
    /// Read the service account key, looking it up in the environment if necessary.
    pub fn service_key(&self, environment: impl Environment) -> Result<String, environment::Error> {
        let ServiceKey(secret) = &self.service_key;
        secret.resolve(environment)
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            service_key: default_service_key(),
        }
    }
}

fn default_service_key() -> ServiceKey {
    ServiceKey(Secret::FromEnvironment {
        variable: DEFAULT_SERVICE_KEY_VARIABLE.into(),
    })
}

/// Parse the client settings from a directory.
///
/// A directory without a settings file yields the default settings.
pub fn parse_settings(settings_dir: impl AsRef<Path>) -> Result<ClientSettings, SettingsError> {
    let settings_file = settings_dir.as_ref().join(SETTINGS_FILENAME);

    let contents = match std::fs::read_to_string(&settings_file) {
        Ok(contents) => contents,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                file_path = %settings_file.display(),
                "no settings file found, using defaults"
            );
            return Ok(ClientSettings::default());
        }
        Err(source) => {
            return Err(SettingsError::IoError {
                file_path: settings_file,
                source,
            })
        }
    };

    serde_json::from_str(&contents).map_err(|error| SettingsError::ParseError {
        file_path: settings_file.clone(),
        line: error.line(),
        column: error.column(),
        message: error.to_string(),
    })
}

pub mod configuration;
pub mod environment;
pub mod error;
pub mod settings;
pub mod uri;
pub mod values;

pub use configuration::Configuration;
pub use error::{ConfigurationError, SettingsError};
pub use settings::{parse_settings, ClientSettings};
pub use uri::{resolve, SCHEME, SCHEME_PREFIX};

mod secret;
mod service_key;

pub use secret::Secret;
pub use service_key::ServiceKey;

//! Where credentials referenced by the client settings are read from.

use std::collections::HashMap;

/// A source of named values, usually the process environment.
pub trait Environment {
    fn read(&self, variable: &str) -> Result<String, Error>;
}

impl<T: Environment> Environment for &T {
    fn read(&self, variable: &str) -> Result<String, Error> {
        (*self).read(variable)
    }
}

/// Reads from the environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn read(&self, variable: &str) -> Result<String, Error> {
        std::env::var(variable).map_err(|error| match error {
            std::env::VarError::NotPresent => Error::NonExistentVariable(variable.to_string()),
            std::env::VarError::NotUnicode(_) => Error::NonUnicodeValue(variable.to_string()),
        })
    }
}

/// An environment with nothing in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyEnvironment;

impl Environment for EmptyEnvironment {
    fn read(&self, variable: &str) -> Result<String, Error> {
        Err(Error::NonExistentVariable(variable.to_string()))
    }
}

impl Environment for HashMap<String, String> {
    fn read(&self, variable: &str) -> Result<String, Error> {
        self.get(variable)
            .cloned()
            .ok_or_else(|| Error::NonExistentVariable(variable.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("the environment variable {0:?} is not set")]
    NonExistentVariable(String),
    #[error("the environment variable {0:?} is not valid unicode")]
    NonUnicodeValue(String),
}

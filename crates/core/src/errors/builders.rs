//! Builder methods for creating errors with context

use super::types::Error;
use std::time::Duration;

impl Error {
    /// Create a setup error
    #[must_use]
    pub fn setup(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Setup {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a batch write error
    #[must_use]
    pub fn batch_write(keys: usize, message: impl Into<String>) -> Self {
        Error::BatchWrite {
            keys,
            message: message.into(),
        }
    }

    /// Create a batch read error
    #[must_use]
    pub fn batch_read(keys: usize, message: impl Into<String>) -> Self {
        Error::BatchRead {
            keys,
            message: message.into(),
        }
    }

    /// Create a client call error
    #[must_use]
    pub fn client(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Client {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create an environment variable error
    #[must_use]
    pub fn environment(variable: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Environment {
            variable: variable.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration,
        }
    }
}

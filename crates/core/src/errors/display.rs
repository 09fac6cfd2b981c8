//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Setup { endpoint, message } => {
                write!(f, "failed to set up cache client for '{endpoint}': {message}")
            }
            Error::BatchWrite { keys, message } => {
                write!(f, "batch write of {keys} keys failed: {message}")
            }
            Error::BatchRead { keys, message } => {
                write!(f, "batch read of {keys} keys failed: {message}")
            }
            Error::Client { operation, message } => {
                write!(f, "cache client '{operation}' failed: {message}")
            }
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::Environment { variable, message } => {
                write!(f, "environment variable '{variable}' error: {message}")
            }
            Error::Timeout {
                operation,
                duration,
            } => {
                write!(f, "operation '{operation}' timed out after {duration:?}")
            }
        }
    }
}

//! Error type of the command line tool.

use bsdf::LoadError;
use std::{
    error::Error,
    fmt::{Debug, Display, Formatter},
};

/// Error reported to the user before exiting.
#[derive(Debug)]
pub struct CliError {
    message: String,
    source: Option<Box<dyn Error>>,
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(cause) => write!(f, "{}, caused by {}", self.message, cause),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> { self.source.as_deref() }
}

impl CliError {
    /// Creates a new CliError.
    pub fn new<S>(message: S, source: Option<Box<dyn Error>>) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            source,
        }
    }

    /// Creates a new CliError from a std::io::Error.
    pub fn from_io_error<S>(err: std::io::Error, message: S) -> Self
    where
        S: Into<String>,
    {
        Self::new(message, Some(Box::new(err)))
    }

    /// Creates a new CliError from a failed table load.
    pub fn from_load_error<S>(err: LoadError, message: S) -> Self
    where
        S: Into<String>,
    {
        Self::new(message, Some(Box::new(err)))
    }
}

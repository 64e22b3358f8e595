use crate::byte_stream::Location;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Parser error that defines an error (message) on the given position
#[derive(Clone, Debug, PartialEq)]
pub struct CssError {
    /// Error message
    pub message: String,
    /// Location of the error, if available (during parsing mostly)
    pub location: Option<Location>,
}

impl CssError {
    #[must_use]
    pub fn new(message: &str) -> Self {
        CssError {
            message: message.to_string(),
            location: None,
        }
    }

    #[must_use]
    pub fn with_location(message: &str, location: Location) -> Self {
        CssError {
            message: message.to_string(),
            location: Some(location),
        }
    }
}

impl Display for CssError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.location {
            Some(location) => write!(f, "{} on {}", self.message, location),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for CssError {}

pub type CssResult<T> = Result<T, CssError>;

/// Filesystem failures that abort a run
#[derive(Debug, Error)]
pub enum FileError {
    #[error("file {path} does not exist")]
    Missing { path: String },
    #[error("could not read file {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },
    #[error("could not write file {path}: {source}")]
    Unwritable {
        path: String,
        source: std::io::Error,
    },
    #[error("could not create path {path}: {source}")]
    CreateFailed {
        path: String,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_carries_location() {
        let e = CssError::with_location("unexpected token '{'", Location::new(3, 7, 0));
        assert_eq!(e.to_string(), "unexpected token '{' on row 3 column 7");

        let e = CssError::new("no node tree found");
        assert_eq!(e.to_string(), "no node tree found");
    }
}

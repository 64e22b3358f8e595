use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration file.\nError on row {line} col {column}.\n{message}")]
    Parse {
        message: String,
        line: u64,
        column: u64,
    },
    #[error("{0}")]
    Invalid(String),
    #[error("could not read config file {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn parse(message: impl Into<String>, line: u64, column: u64) -> Self {
        ConfigError::Parse {
            message: message.into(),
            line,
            column,
        }
    }
}

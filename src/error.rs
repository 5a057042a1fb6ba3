use crate::net::NetworkError;
use std::io;
use thiserror::Error;
use tracing_subscriber::filter::ParseError;

#[derive(Debug, Error)]
pub enum UltmaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("cannot write config file: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
    #[error("no config directory available on this system")]
    NoConfigDir,
    #[error("network error: {0}")]
    Network(#[from] NetworkError),
    #[error("match storage error: {0}")]
    Storage(#[from] bincode::Error),
    #[error("invalid log filter: {0}")]
    LogFilter(#[from] ParseError),
}

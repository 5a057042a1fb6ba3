use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("http: {0}")]
    Http(#[from] hyper::Error),
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("request body too large")]
    BodyTooLarge,
    #[error("server already shut down")]
    Shutdown,
}

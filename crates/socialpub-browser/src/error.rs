use socialpub_core::PublishError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid cookie file: {0}")]
    CookieFile(#[from] serde_json::Error),

    #[error("Timed out after {seconds}s waiting for {what}")]
    Timeout { what: String, seconds: u64 },

    #[error("Stale element reference: {0}")]
    StaleElement(usize),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

impl From<Error> for PublishError {
    fn from(err: Error) -> Self {
        PublishError::Interaction(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

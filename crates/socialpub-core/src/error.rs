use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read post file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse post file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why a publisher operation reported failure.
///
/// Publishers keep the boolean `login`/`publish` contract; this is recorded
/// alongside for diagnostics and exposed through `Publisher::last_error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("Browser session could not be started: {0}")]
    Setup(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Page interaction failed: {0}")]
    Interaction(String),

    #[error("Could not verify result: {0}")]
    Verification(String),

    #[error("Publisher not started. Call login() first.")]
    NotStarted,
}

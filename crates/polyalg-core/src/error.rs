use thiserror::Error;

/// Canonical result for the PolyAlg crates.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    /// A construct that has no PolyAlg representation (yet).
    #[error("{0} is not supported by PolyAlg")]
    NotImplemented(String),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Internal invariant failed: {0}")]
    Invariant(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Config(e.to_string())
    }
}

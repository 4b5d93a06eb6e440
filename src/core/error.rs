use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Path not found: {0}")]
    PathResolution(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid domain pattern: {0}")]
    Pattern(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::PathResolution(_) => "PATH_NOT_FOUND",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Pattern(_) => "PATTERN_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
            Error::Other(_) => "ERROR",
        }
    }
}

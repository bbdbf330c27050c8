use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NuumiError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("No post with id {0}")]
    NotFound(String),

    #[error("Post id {0} is already in use")]
    DuplicateId(String),

    #[error("Anyhow error: {0}")]
    Anyhow(String),
}

impl From<serde_json::Error> for NuumiError {
    fn from(err: serde_json::Error) -> Self {
        NuumiError::Json(err.to_string())
    }
}

impl From<io::Error> for NuumiError {
    fn from(err: io::Error) -> Self {
        NuumiError::Io(err.to_string())
    }
}

impl From<anyhow::Error> for NuumiError {
    fn from(err: anyhow::Error) -> Self {
        NuumiError::Anyhow(format!("{:#}", err))
    }
}

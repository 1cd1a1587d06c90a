use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Plugin error: {0}")]
    Plugin(String),
    #[error("Project error: {0}")]
    Project(String),
    #[error("Knob error: {0}")]
    Knob(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl LibraryError {
    pub fn project(msg: impl Into<String>) -> Self {
        LibraryError::Project(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        LibraryError::Validation(msg.into())
    }

    pub fn knob(msg: impl Into<String>) -> Self {
        LibraryError::Knob(msg.into())
    }
}

impl From<Box<dyn std::error::Error>> for LibraryError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        LibraryError::Runtime(err.to_string())
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scroll backend error: {0}")]
    Backend(String),

    #[error("Container already has a controller: {0}")]
    ContainerInUse(String),

    #[error("Controller has been destroyed")]
    ControllerDestroyed,

    #[error("Scene not found: {0}")]
    SceneNotFound(String),

    #[error("Duration callback failed: {0}")]
    Duration(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

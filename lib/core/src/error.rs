use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Service not ready: catalog and models are not loaded")]
    NotReady,

    #[error("Unknown concept: {0}")]
    UnknownConcept(String),

    #[error("Catalog is empty after cleaning")]
    EmptyCatalog,

    #[error("Invalid artifact: {0}")]
    Artifact(String),

    #[error("Invalid feature dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

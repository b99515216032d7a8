use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Malformed path: {0} (must be absolute, starting with '/')")]
    MalformedPath(String),

    #[error("Invalid file name: {0:?} (must be non-empty and contain no '/')")]
    InvalidName(String),

    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Entry already exists: {0}")]
    AlreadyExists(String),

    #[error("Catalog inconsistency: {0}")]
    Inconsistent(String),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

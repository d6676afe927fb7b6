use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("Mapping error: {0}")]
    Mapping(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Nothing to pack")]
    Empty,
}

pub type Result<T> = std::result::Result<T, AtlasError>;

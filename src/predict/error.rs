use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("TLE directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("invalid TLE in {file}: {message}")]
    InvalidTle { file: String, message: String },
    #[error("unusable orbital elements: {0}")]
    Elements(String),
}

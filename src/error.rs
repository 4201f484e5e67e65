use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StampError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty input: no image bytes to decode")]
    EmptyInput,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Image too large: {0} pixels, maximum allowed {1}")]
    ImageTooLarge(u64, u64),

    #[error("Asset catalog error: {0}")]
    AssetCatalog(String),

    #[error("Invalid stamp size: {0}. Must be one of 16, 32, 64, 128, 256")]
    InvalidStampSize(u32),

    #[error("Object not found in store: {0}")]
    ObjectNotFound(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("File too large: {0} bytes. Maximum allowed: {1} bytes")]
    FileTooLarge(u64, u64),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("No image files found in input path: {0}")]
    NoImageFilesFound(String),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    #[error("Batch memory limit exceeded: estimated {0}MiB, maximum allowed {1}MiB")]
    BatchMemoryLimitExceeded(u64, u64),

    #[error("Batch file count limit exceeded: {0} files, maximum allowed {1}")]
    BatchFileLimitExceeded(usize, usize),

    #[error(
        "Insufficient available memory: estimated batch requires {0}MiB, but only {1}MiB available"
    )]
    InsufficientMemory(u64, u64),
}

pub type Result<T> = std::result::Result<T, StampError>;

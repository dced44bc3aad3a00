//! Error types for the media renamer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for media renamer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the media renamer
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory does not exist: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Failed to read metadata from {path}: {message}")]
    MetadataRead { path: PathBuf, message: String },

    #[error("Target already exists: {path}")]
    TargetExists { path: PathBuf },

    #[error("Invalid file name: {path}")]
    InvalidFileName { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

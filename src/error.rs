// src/error.rs
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReqsentryError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown detector category: '{0}'")]
    UnknownCategory(String),

    #[error("Invalid rule pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid rules file: {0}")]
    Rules(#[from] serde_json::Error),

    #[error("Invalid requirement: {0}")]
    InvalidRequirement(String),

    #[error("Unsupported file extension: '{0}' (supported: .txt, .md)")]
    UnsupportedExtension(String),

    #[error("No requirements found in {0}")]
    EmptyInput(PathBuf),

    #[error("Analysis run failed: {0}")]
    RunFailed(String),
}

pub type Result<T> = std::result::Result<T, ReqsentryError>;

// Allow `?` on std::io::Error by converting to ReqsentryError::Io with unknown path.
impl From<std::io::Error> for ReqsentryError {
    fn from(source: std::io::Error) -> Self {
        ReqsentryError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

// Gracefully convert WalkDir errors
impl From<walkdir::Error> for ReqsentryError {
    fn from(e: walkdir::Error) -> Self {
        let path = e
            .path()
            .map_or_else(|| PathBuf::from("<unknown>"), Path::to_path_buf);
        match e.into_io_error() {
            Some(source) => ReqsentryError::Io { source, path },
            None => ReqsentryError::Config("file walk failed".to_string()),
        }
    }
}

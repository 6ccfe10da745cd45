use std::path::PathBuf;
use thiserror::Error;

/// Failure to parse a single label line
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected {expected} fields, found {found}")]
    WrongFieldCount { expected: usize, found: usize },
    #[error("field {field} is not numeric: '{value}'")]
    NonNumeric { field: &'static str, value: String },
}

/// Failure to read, convert or write a label file
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("{}:{line}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        source: ParseError,
    },
    #[error("Failed to read image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Invalid command-line configuration, detected before any file is touched
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("The number of {what} folders must match: got {}", join_counts(.counts))]
    FolderCountMismatch {
        what: &'static str,
        counts: Vec<usize>,
    },
    #[error("Invalid class mapping JSON: {0}")]
    InvalidClassMapping(#[from] serde_json::Error),
}

fn join_counts(counts: &[usize]) -> String {
    counts
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

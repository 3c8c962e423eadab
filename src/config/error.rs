use std::path::PathBuf;
use thiserror::Error;

/// Why a desk file could not be read, written or accepted
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("desk file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("desk file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("desk file {} is not valid TOML: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("cannot encode desk as TOML: {0}")]
    Serialize(String),

    /// `field` uses the file's own paths, e.g. `staff[2].workload_capacity`
    #[error("invalid desk setting '{field}': {message}")]
    Validation { field: String, message: String },
}

//! Error taxonomy for a conversion run.
//!
//! Every stage returns [`ConvertError`]. Inside the reader and writer the
//! individual steps use `anyhow` with context, and the chain is folded into
//! the `Read`/`Write` variants at the stage boundary.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Wrong invocation. Holds clap's rendered usage text.
    #[error("{0}")]
    Usage(String),
    #[error("File '{}' does not exist!", .0.display())]
    InputNotFound(PathBuf),
    #[error("File '{}' already exists!", .0.display())]
    OutputExists(PathBuf),
    #[error("Error reading CSV file: {0:#}")]
    Read(anyhow::Error),
    #[error("No data found in file {}", .0.display())]
    EmptyDataset(PathBuf),
    #[error("Error writing YAML file: {0:#}")]
    Write(anyhow::Error),
}

impl ConvertError {
    /// Process exit status for this failure. Usage errors follow clap's
    /// convention of `2`; everything else exits with `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::Usage(_) => 2,
            _ => 1,
        }
    }
}

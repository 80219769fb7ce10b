//! Path preconditions checked before any file is opened.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;

use crate::error::ConvertError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Checks that `input` is an existing regular file and that nothing lives at
/// `output`. Neither file is opened.
///
/// The input is checked before the output. Only metadata is inspected, so an
/// occupied destination still fails before any byte of the input is read.
/// `symlink_metadata` is used so a dangling symlink counts as an existing
/// entry.
pub fn resolve_paths(input: &Path, output: &Path) -> Result<ResolvedPaths, ConvertError> {
    if !input.is_file() {
        return Err(ConvertError::InputNotFound(input.to_path_buf()));
    }
    if fs::symlink_metadata(output).is_ok() {
        return Err(ConvertError::OutputExists(output.to_path_buf()));
    }
    debug!("Resolved {input:?} -> {output:?}");
    Ok(ResolvedPaths {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
    })
}

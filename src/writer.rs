//! Document writer: serializes a [`Dataset`] to YAML and persists it.
//!
//! The whole document is rendered in memory before the destination is
//! created. The file is then written through [`PendingFile`], which removes
//! it again unless [`PendingFile::commit`] is reached.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::{
    error::ConvertError,
    reader::Dataset,
    yaml_provider::{self, YamlProvider},
};

/// Output file that is deleted on drop unless committed.
///
/// Opened with `create_new`, so it never replaces an existing entry.
#[derive(Debug)]
pub struct PendingFile {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    committed: bool,
}

impl PendingFile {
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .with_context(|| format!("Creating output file {path:?}"))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Some(BufWriter::new(file)),
            committed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes and syncs the file, then keeps it.
    pub fn commit(mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer
                .flush()
                .with_context(|| format!("Flushing output file {:?}", self.path))?;
            writer
                .get_ref()
                .sync_all()
                .with_context(|| format!("Syncing output file {:?}", self.path))?;
        }
        self.committed = true;
        Ok(())
    }
}

impl Write for PendingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.writer.as_mut() {
            Some(writer) => writer.write(buf),
            None => Err(io::Error::other("output file already closed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        // Close the handle before unlinking.
        drop(self.writer.take());
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed partial output {:?}", self.path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!("Could not remove partial output {:?}: {err}", self.path),
        }
    }
}

/// Writes `dataset` to `path` and returns the number of records written.
pub fn write_dataset(dataset: &Dataset, path: &Path) -> Result<usize, ConvertError> {
    write_dataset_with(dataset, path, yaml_provider::provider())
}

pub fn write_dataset_with(
    dataset: &Dataset,
    path: &Path,
    provider: &dyn YamlProvider,
) -> Result<usize, ConvertError> {
    persist(dataset, path, provider).map_err(ConvertError::Write)?;
    info!("Wrote {} record(s) to {:?}", dataset.len(), path);
    Ok(dataset.len())
}

fn persist(dataset: &Dataset, path: &Path, provider: &dyn YamlProvider) -> Result<()> {
    let value = yaml_provider::to_value(dataset).context("Serializing records")?;
    let serialized = provider
        .dump_value(&value)
        .context("Rendering YAML document")?;
    let mut output = PendingFile::create(path)?;
    output
        .write_all(serialized.as_bytes())
        .with_context(|| format!("Writing output file {:?}", output.path()))?;
    output.commit()
}

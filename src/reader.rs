//! Tabular reader: parses a CSV file into an ordered [`Dataset`].
//!
//! Every [`Record`] carries exactly the header's field names in header order.
//! Rows shorter than the header are padded with missing (`None`) values. Rows
//! longer than the header are rejected or, with [`ExtraFields::Collect`], keep
//! their surplus cells under [`EXTRA_FIELDS_KEY`].

use std::{collections::HashSet, io::Read, path::Path, sync::Arc};

use anyhow::{Context, Result, bail};
use encoding_rs::Encoding;
use log::{debug, info};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{cli::ExtraFields, error::ConvertError, io_utils};

/// Catch-all key for surplus cells when collecting overlong rows.
pub const EXTRA_FIELDS_KEY: &str = "_extra";

#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    pub delimiter: Option<u8>,
    pub encoding: Option<String>,
    pub extra_fields: ExtraFields,
}

/// One data row keyed by the shared header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    headers: Arc<[String]>,
    values: Vec<Option<String>>,
    extra: Option<Vec<String>>,
}

impl Record {
    /// Field name/value pairs in header order. Missing cells yield `None`.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.headers
            .iter()
            .zip(&self.values)
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields()
            .find(|(field, _)| *field == name)
            .and_then(|(_, value)| value)
    }

    pub fn extra(&self) -> Option<&[String]> {
        self.extra.as_deref()
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = self.headers.len() + usize::from(self.extra.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, &value)?;
        }
        if let Some(extra) = &self.extra {
            map.serialize_entry(EXTRA_FIELDS_KEY, extra)?;
        }
        map.end()
    }
}

/// Ordered rows from one input file, header row excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    headers: Arc<[String]>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Serialize for Dataset {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.records.serialize(serializer)
    }
}

/// Reads `path` into a non-empty [`Dataset`].
pub fn read_dataset(path: &Path, options: &ReadOptions) -> Result<Dataset, ConvertError> {
    let dataset = load(path, options).map_err(ConvertError::Read)?;
    if dataset.is_empty() {
        return Err(ConvertError::EmptyDataset(path.to_path_buf()));
    }
    info!("Read {} row(s) from {:?}", dataset.len(), path);
    Ok(dataset)
}

fn load(path: &Path, options: &ReadOptions) -> Result<Dataset> {
    let delimiter = io_utils::resolve_input_delimiter(options.delimiter);
    let encoding = io_utils::resolve_encoding(options.encoding.as_deref())?;
    debug!(
        "Reading {:?} with delimiter {:?} and encoding {}",
        path,
        delimiter as char,
        encoding.name()
    );
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    parse_dataset(&mut reader, encoding, options.extra_fields)
        .with_context(|| format!("Parsing {path:?}"))
}

/// Builds a dataset from an already opened csv reader.
pub fn parse_dataset<R: Read>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
    extra_fields: ExtraFields,
) -> Result<Dataset> {
    let headers: Arc<[String]> = io_utils::reader_headers(reader, encoding)?.into();
    ensure_unique_headers(&headers)?;
    if extra_fields == ExtraFields::Collect && headers.iter().any(|h| h == EXTRA_FIELDS_KEY) {
        bail!("Header column '{EXTRA_FIELDS_KEY}' collides with the catch-all key for extra fields");
    }

    let mut records = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        let line = record.position().map(|p| p.line()).unwrap_or(idx as u64 + 2);
        let mut cells = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding line {line}"))?;

        let extra = if cells.len() > headers.len() {
            match extra_fields {
                ExtraFields::Reject => bail!(
                    "Line {line} has {} field(s) but the header has {}",
                    cells.len(),
                    headers.len()
                ),
                ExtraFields::Collect => Some(cells.split_off(headers.len())),
            }
        } else {
            None
        };

        let mut values: Vec<Option<String>> = cells.into_iter().map(Some).collect();
        if values.len() < headers.len() {
            debug!(
                "Line {line} has {} field(s); padding to {}",
                values.len(),
                headers.len()
            );
            values.resize(headers.len(), None);
        }
        records.push(Record {
            headers: Arc::clone(&headers),
            values,
            extra,
        });
    }

    Ok(Dataset { headers, records })
}

fn ensure_unique_headers(headers: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(headers.len());
    for name in headers {
        if !seen.insert(name.as_str()) {
            bail!("Duplicate header column '{name}'");
        }
    }
    Ok(())
}

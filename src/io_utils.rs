//! I/O helpers for reading CSV input.
//!
//! - **Delimiter resolution**: always comma unless `--delimiter` overrides it.
//!   The file extension is never consulted.
//! - **Encoding**: fields are read as raw bytes and decoded with `encoding_rs`,
//!   defaulting to UTF-8. Undecodable bytes are an error, never replaced.
//! - **Reader construction**: `flexible(true)` so row length mismatches reach
//!   the reader's own policy instead of failing inside the csv crate.

use std::{
    borrow::Cow,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(provided: Option<u8>) -> u8 {
    provided.unwrap_or(DEFAULT_CSV_DELIMITER)
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_csv_reader_from_path(path: &Path, delimiter: u8) -> Result<csv::Reader<BufReader<File>>> {
    let reader =
        BufReader::new(File::open(path).with_context(|| format!("Opening input file {path:?}"))?);
    Ok(open_csv_reader(reader, delimiter))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
        .ok_or_else(|| anyhow!("Failed to decode text with encoding {}", encoding.name()))
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

/// Decodes the header record, dropping a UTF-8 byte order mark from the first
/// field if one survived the csv reader.
pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<String>>
where
    R: Read,
{
    let headers = reader.byte_headers().context("Reading header row")?;
    headers
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let field = if idx == 0 && encoding == UTF_8 {
                field.strip_prefix(UTF8_BOM).unwrap_or(field)
            } else {
                field
            };
            decode_bytes(field, encoding)
        })
        .collect()
}

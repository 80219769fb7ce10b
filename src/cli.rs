use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "csv-yaml",
    author,
    version,
    about = "Convert a CSV file with a header row into a YAML document",
    long_about = None
)]
pub struct Cli {
    /// Input CSV file; the first row is the header
    pub input: PathBuf,
    /// Destination YAML file (must not exist yet)
    pub output: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// How to treat rows with more cells than the header
    #[arg(long = "extra-fields", value_enum, default_value_t = ExtraFields::Reject)]
    pub extra_fields: ExtraFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExtraFields {
    /// Fail the conversion on the first overlong row
    #[default]
    Reject,
    /// Keep surplus cells as a list under the `_extra` key
    Collect,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            if first == '"' || first == '\n' || first == '\r' {
                return Err(format!("Delimiter cannot be {first:?}"));
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delimiter_accepts_named_and_literal_forms() {
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter("semicolon").unwrap(), b';');
        assert_eq!(parse_delimiter("|").unwrap(), b'|');
        assert_eq!(parse_delimiter(":").unwrap(), b':');
    }

    #[test]
    fn parse_delimiter_rejects_bad_input() {
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("é").is_err());
        assert!(parse_delimiter("\"").is_err());
    }

    #[test]
    fn cli_requires_both_paths() {
        assert!(Cli::try_parse_from(["csv-yaml", "in.csv"]).is_err());
        let cli = Cli::try_parse_from(["csv-yaml", "in.csv", "out.yml"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("in.csv"));
        assert_eq!(cli.output, PathBuf::from("out.yml"));
        assert_eq!(cli.extra_fields, ExtraFields::Reject);
        assert!(cli.delimiter.is_none());
    }

    #[test]
    fn cli_parses_optional_flags() {
        let cli = Cli::try_parse_from([
            "csv-yaml",
            "--delimiter",
            ";",
            "--extra-fields",
            "collect",
            "--input-encoding",
            "windows-1252",
            "in.csv",
            "out.yml",
        ])
        .unwrap();
        assert_eq!(cli.delimiter, Some(b';'));
        assert_eq!(cli.extra_fields, ExtraFields::Collect);
        assert_eq!(cli.input_encoding.as_deref(), Some("windows-1252"));
    }
}

pub mod cli;
pub mod error;
pub mod io_utils;
pub mod reader;
pub mod resolve;
pub mod writer;
pub mod yaml_provider;

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use clap::{Parser, error::ErrorKind};
use log::{LevelFilter, info};

use crate::{cli::Cli, error::ConvertError, reader::ReadOptions};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_yaml", LevelFilter::Warn);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
}

impl Summary {
    pub fn report(&self) -> String {
        format!(
            "Conversion successful: {} -> {}\n{} rows converted",
            self.input.display(),
            self.output.display(),
            self.rows
        )
    }
}

pub fn run() -> Result<Summary, ConvertError> {
    run_from(env::args_os())
}

/// Parses `args` (including the program name) and runs one conversion.
///
/// `--help` and `--version` print and exit the process directly.
pub fn run_from<I, T>(args: I) -> Result<Summary, ConvertError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    init_logging();
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => return Err(ConvertError::Usage(err.render().to_string())),
    };
    let options = ReadOptions {
        delimiter: cli.delimiter,
        encoding: cli.input_encoding.clone(),
        extra_fields: cli.extra_fields,
    };
    convert(&cli.input, &cli.output, &options)
}

/// Resolver, reader and writer in sequence.
pub fn convert(input: &Path, output: &Path, options: &ReadOptions) -> Result<Summary, ConvertError> {
    let paths = resolve::resolve_paths(input, output)?;
    info!(
        "Converting '{}' -> '{}'",
        paths.input.display(),
        paths.output.display()
    );
    let dataset = reader::read_dataset(&paths.input, options)?;
    let rows = writer::write_dataset(&dataset, &paths.output)?;
    Ok(Summary {
        input: paths.input,
        output: paths.output,
        rows,
    })
}

//! File helpers shared by the readers and writers.

use color_eyre::eyre::{eyre, ContextCompat, Report, Result, WrapErr};
use color_eyre::Help;
use itertools::Itertools;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use zstd::stream::read::Decoder;

pub use gvf_table::get_delimiter;


/// Compression formats that can be read transparently.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decompress {
    Zst,
}

impl FromStr for Decompress {
    type Err = Report;
    fn from_str(s: &str) -> Result<Self, Report> {
        match s {
            "zst" => Ok(Decompress::Zst),
            _ext => Err(eyre!("Decompression for {_ext:?} is not implemented yet.")),
        }
    }
}

/// Open a file for reading, decompressing on the fly based on its extension.
///
/// ## Arguments
///
/// - `path` - Input file path, plain text or `.zst`.
///
/// ## Examples
///
/// ```rust
/// use gvf_merge::utils::open_reader;
/// use std::io::Read;
///
/// let dir  = tempfile::tempdir()?;
/// let path = dir.path().join("calls.tsv");
/// std::fs::write(&path, "mutation\n")?;
///
/// let mut text = String::new();
/// open_reader(&path)?.read_to_string(&mut text)?;
/// assert_eq!(text, "mutation\n");
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn open_reader<P>(path: &P) -> Result<Box<dyn Read>, Report>
where
    P: AsRef<Path> + Debug,
{
    let file = File::open(path).wrap_err(format!("Failed to open: {path:?}"))?;
    let ext = path.as_ref().extension().and_then(|ext| ext.to_str());

    match ext.map(Decompress::from_str) {
        Some(Ok(Decompress::Zst)) => {
            let decoder = Decoder::new(file).wrap_err(format!("Failed to decode: {path:?}"))?;
            Ok(Box::new(decoder))
        }
        _ => Ok(Box::new(BufReader::new(file))),
    }
}

/// Read a delimited table with a fixed header into records.
///
/// Every header in `required` must be present, any extra columns are ignored.
/// Surrounding whitespace is trimmed from headers and values. A row that
/// fails to parse fails the whole table, naming the line and column.
///
/// ## Arguments
///
/// - `path` - Input table, delimiter chosen by extension.
/// - `required` - Header names that must be present.
pub fn read_table<T, P>(path: &P, required: &[&str]) -> Result<Vec<T>, Report>
where
    T: DeserializeOwned,
    P: AsRef<Path> + Debug,
{
    let delim = get_delimiter(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delim as u8)
        .trim(csv::Trim::All)
        .from_reader(open_reader(path)?);

    let headers =
        reader.headers().wrap_err(format!("Failed to read headers: {path:?}"))?.clone();
    let missing = required.iter().filter(|h| !headers.iter().any(|header| header == **h)).collect_vec();
    if !missing.is_empty() {
        return Err(eyre!("Missing required column(s) {missing:?} in: {path:?}")
            .suggestion(format!("Expected headers: {}", required.join(", "))));
    }

    reader
        .deserialize::<T>()
        .enumerate()
        .map(|(i, record)| {
            // +2 for the header line and 1-based numbering
            let line = i + 2;
            let column = record.as_ref().err().and_then(|e| match e.kind() {
                csv::ErrorKind::Deserialize { err, .. } => {
                    err.field().and_then(|f| headers.get(f as usize))
                }
                _ => None,
            });
            let message = match column {
                Some(column) => format!("Failed to parse column {column:?} on line {line} of: {path:?}"),
                None => format!("Failed to parse line {line} of: {path:?}"),
            };
            record.wrap_err(message)
        })
        .collect()
}

/// Create the parent directory of a path, if it doesn't exist yet.
pub fn create_parent_dir<P>(path: &P) -> Result<(), Report>
where
    P: AsRef<Path> + Debug,
{
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .wrap_err(format!("Failed to create directory: {parent:?}"))?;
        }
    }
    Ok(())
}

/// Returns the file name of a path without its table and compression extensions.
///
/// ```rust
/// use gvf_merge::utils::file_stem;
/// assert_eq!(file_stem(&"data/B.1.1.7.tsv.zst")?, "B.1.1.7");
/// assert_eq!(file_stem(&"data/alpha_calls.tsv")?, "alpha_calls");
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn file_stem<P>(path: &P) -> Result<String, Report>
where
    P: AsRef<Path> + Debug,
{
    let mut stem = path
        .as_ref()
        .file_name()
        .wrap_err(format!("Failed to get file name: {path:?}"))?
        .to_str()
        .wrap_err(format!("Failed to convert file name to str: {path:?}"))?;

    for ext in [".zst", ".tsv", ".txt", ".csv", ".gvf"] {
        stem = stem.strip_suffix(ext).unwrap_or(stem);
    }
    Ok(stem.to_string())
}

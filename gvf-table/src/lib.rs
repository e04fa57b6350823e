//! Create and write a row-based [`Table`] of report values.

use color_eyre::eyre::{eyre, ContextCompat, Report, Result, WrapErr};
use color_eyre::Help;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::fs::File;
use std::io::Write;
use std::path::Path;


/// A row-based [`Table`] of generic data.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Table<T> {
    /// Names of the table columns.
    pub headers: Vec<T>,
    /// Rows of table values.
    pub rows: Vec<Vec<T>>,
}

impl<T> Table<T>
where
    T: Clone + Display + Debug + PartialEq<T>,
{
    /// Returns a new [`Table`] with headers and no rows.
    ///
    /// ## Examples
    ///
    /// ```
    /// let mut table = gvf_table::Table::with_headers(["strain", "count"]);
    /// table.add_row(["B.1.1.7", "2"])?;
    /// # assert_eq!(table.rows, vec![vec!["B.1.1.7", "2"]]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn with_headers<I>(headers: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Table { headers: headers.into_iter().collect(), rows: Vec::new() }
    }

    /// Add a new row to the table.
    ///
    /// ## Arguments
    ///
    /// * `row` - A iterable object of new data (`T`) to add as a row.
    ///
    /// The row must be the same length as the headers.
    ///
    /// ## Examples
    ///
    /// ```
    /// let mut table = gvf_table::Table::with_headers(["1", "2", "3"]);
    /// table.add_row(["A", "B", "C"])?;
    /// assert!(table.add_row(["D", "E"]).is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn add_row<I>(&mut self, row: I) -> Result<(), Report>
    where
        I: IntoIterator<Item = T>,
    {
        let row = row.into_iter().collect_vec();
        let (new, ex) = (row.len(), self.headers.len());
        if new != ex {
            return Err(eyre!("New row size ({new}) does not match table headers ({ex})."));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Write [`Table`] to file [`Path`].
    ///
    /// ## Arguments
    ///
    /// * `path` - Output file path.
    /// * `delim` - Optional delimiter. Otherwise, will be identified based on path suffix.
    ///
    /// ## Examples
    ///
    /// ```
    /// let mut table = gvf_table::Table::with_headers(["1", "2", "3"]);
    /// table.add_row(["A", "B", "C"])?;
    ///
    /// let dir = tempfile::tempdir()?;
    /// table.write(&dir.path().join("table.tsv"), None)?;
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn write<P>(&self, path: &P, delim: Option<char>) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        let delim = match delim {
            Some(c) => c,
            None => get_delimiter(path)?,
        }
        .to_string();

        let mut file =
            File::create(path).wrap_err_with(|| eyre!("Unable to create file: {path:?}"))?;

        // write headers
        let line = format!("{}\n", self.headers.iter().join(&delim));
        file.write_all(line.as_bytes())
            .wrap_err_with(|| eyre!("Unable to write table headers: {line}"))?;

        // write regular rows
        self.rows.iter().try_for_each(|row| {
            let line = format!("{}\n", row.iter().join(&delim));
            file.write_all(line.as_bytes())
                .wrap_err_with(|| format!("Unable to write table rows: {line}"))?;
            Ok::<(), Report>(())
        })?;

        Ok(())
    }
}

/// Get delimiter based on file extension.
///
/// Compression suffixes (`.zst`) are skipped before the lookup.
///
/// - `.tsv` => `\t`
/// - `.txt` => `\t`
/// - `.gvf` => `\t`
/// - `.csv` => `,`
///
/// ```rust
/// use gvf_table::get_delimiter;
///
/// assert_eq!(get_delimiter(&"file.tsv")?, '\t');
/// assert_eq!(get_delimiter(&"file.tsv.zst")?, '\t');
/// assert_eq!(get_delimiter(&"file.csv")?, ',');
/// assert!(get_delimiter(&"file").is_err());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn get_delimiter<P>(path: &P) -> Result<char, Report>
where
    P: AsRef<Path> + Debug,
{
    let mut path = path.as_ref().to_path_buf();
    if path.extension().is_some_and(|ext| ext == "zst") {
        path = path.with_extension("");
    }
    let ext = path
        .extension()
        .wrap_err(format!("Failed to get file extension: {path:?}"))?
        .to_str()
        .wrap_err(format!("Failed to convert file extension to str: {path:?}"))?;
    // convert extension to the expected delimiter
    match ext {
        "tsv" | "txt" | "gvf" => Ok('\t'),
        "csv" => Ok(','),
        _ext => Err(eyre!("Unknown file extension: {_ext:?}")
            .suggestion("Options: tsv, txt, gvf, or csv")),
    }
}

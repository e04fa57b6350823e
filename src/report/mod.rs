//! Diagnostic reports of unmatched mutation names, one row per strain.

use crate::merge::Diagnostics;
use color_eyre::eyre::{Report, Result, WrapErr};
use gvf_table::Table;
use itertools::Itertools;
use log::info;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

#[cfg(test)]
mod tests;

/// Column headers of both reports.
pub const HEADERS: &[&str] = &["strain", "count", "mutations"];
/// File name of the unannotated mutations report.
pub const UNANNOTATED: &str = "unmatched_mutations.tsv";
/// File name of the missing clade-defining mutations report.
pub const MISSING_CLADE_DEFINING: &str = "unmatched_clade_defining.tsv";

/// Diagnostic tables appended to as each file of a batch is merged.
#[derive(Clone, Debug, PartialEq)]
pub struct Reports {
    /// Call-set mutations with no functional annotation.
    pub unannotated: Table<String>,
    /// Clade-defining mutations absent from the call set.
    pub missing_clade_defining: Table<String>,
}

impl Default for Reports {
    fn default() -> Self {
        Self::new()
    }
}

impl Reports {
    pub fn new() -> Self {
        let headers = || HEADERS.iter().map(|h| h.to_string());
        Reports {
            unannotated: Table::with_headers(headers()),
            missing_clade_defining: Table::with_headers(headers()),
        }
    }

    /// Append the diagnostics of one merged file.
    pub fn add(&mut self, diagnostics: &Diagnostics) -> Result<(), Report> {
        let row = |mutations: &[String]| {
            [diagnostics.strain.clone(), mutations.len().to_string(), mutations.iter().join(",")]
        };
        self.unannotated.add_row(row(diagnostics.unannotated.as_slice()))?;
        self.missing_clade_defining.add_row(row(diagnostics.missing_clade_defining.as_slice()))?;
        Ok(())
    }

    /// Write both reports into a directory, returning their paths.
    pub fn write<P>(&self, output_dir: &P) -> Result<[PathBuf; 2], Report>
    where
        P: AsRef<Path> + Debug,
    {
        std::fs::create_dir_all(output_dir)
            .wrap_err(format!("Failed to create directory: {output_dir:?}"))?;

        let unannotated = output_dir.as_ref().join(UNANNOTATED);
        info!("Writing unannotated mutations: {unannotated:?}");
        self.unannotated.write(&unannotated, Some('\t'))?;

        let missing = output_dir.as_ref().join(MISSING_CLADE_DEFINING);
        info!("Writing missing clade-defining mutations: {missing:?}");
        self.missing_clade_defining.write(&missing, Some('\t'))?;

        Ok([unannotated, missing])
    }
}

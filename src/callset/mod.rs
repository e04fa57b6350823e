//! Mutations called in one strain's samples.

use crate::utils;
use color_eyre::eyre::{Report, Result, WrapErr};
use color_eyre::Help;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

#[cfg(test)]
mod tests;

/// Column headers that every call-set table must have.
pub const HEADERS: &[&str] = &[
    "mutation",
    "strain",
    "position",
    "ref",
    "alt",
    "alt_freq",
    "ref_codon",
    "alt_codon",
    "ref_aa",
    "alt_aa",
];

// ----------------------------------------------------------------------------
// Call
// ----------------------------------------------------------------------------

/// A single called mutation.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Call {
    /// Canonical mutation name (ex. `S:N501Y`).
    pub mutation: String,
    /// Lineage the call was made in.
    pub strain: String,
    /// 1-based reference position.
    pub position: usize,
    #[serde(rename = "ref")]
    pub reference: String,
    pub alt: String,
    pub alt_freq: f64,
    pub ref_codon: String,
    pub alt_codon: String,
    pub ref_aa: String,
    pub alt_aa: String,

    // optional columns
    #[serde(default)]
    pub seqid: Option<String>,
    /// Nucleotide-level name (ex. `c.1501A>T`).
    #[serde(default)]
    pub nt_name: Option<String>,
    #[serde(default)]
    pub gene: Option<String>,
    /// Effect type (ex. `missense_variant`).
    #[serde(default)]
    pub mutation_type: Option<String>,
    /// Alternate allele depth.
    #[serde(default)]
    pub ao: Option<u64>,
    /// Total depth.
    #[serde(default)]
    pub dp: Option<u64>,
    /// Reference allele depth.
    #[serde(default)]
    pub ro: Option<u64>,
}

// ----------------------------------------------------------------------------
// CallSet
// ----------------------------------------------------------------------------

/// All mutations called in one input file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallSet {
    /// Calls in file order.
    pub calls: Vec<Call>,
    /// File the calls were read from.
    pub path: Option<PathBuf>,
}

impl FromIterator<Call> for CallSet {
    fn from_iter<I: IntoIterator<Item = Call>>(iter: I) -> Self {
        CallSet { calls: iter.into_iter().collect(), path: None }
    }
}

impl CallSet {
    /// Read a call-set table.
    ///
    /// Any row that fails to parse (ex. a non-numeric position) fails the
    /// whole file.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use gvf_merge::callset::CallSet;
    ///
    /// let dir  = tempfile::tempdir()?;
    /// let path = dir.path().join("B.1.1.7.tsv");
    /// std::fs::write(&path, "mutation\tstrain\tposition\tref\talt\talt_freq\tref_codon\talt_codon\tref_aa\talt_aa\n\
    ///                        S:N501Y\tB.1.1.7\t23063\tA\tT\t0.98\tAAT\tTAT\tN\tY\n")?;
    ///
    /// let call_set = CallSet::read(&path)?;
    /// assert_eq!(call_set.calls[0].position, 23063);
    /// assert_eq!(call_set.strain(), Some("B.1.1.7"));
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn read<P>(path: &P) -> Result<CallSet, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let calls: Vec<Call> = utils::read_table(path, HEADERS)
            .wrap_err(format!("Failed to read call set: {path:?}"))
            .suggestion("Optional headers: seqid, nt_name, gene, mutation_type, ao, dp, ro")?;
        debug!("Read {} calls: {path:?}", calls.len());
        Ok(CallSet { calls, path: Some(path.as_ref().to_path_buf()) })
    }

    /// Returns the reference strain of the file, the strain of its first call.
    pub fn strain(&self) -> Option<&str> {
        self.calls.first().map(|call| call.strain.as_str())
    }

    /// Returns the set of all mutation names in the file.
    pub fn mutations(&self) -> BTreeSet<&str> {
        self.calls.iter().map(|call| call.mutation.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

//! Clade-defining mutations of each lineage.

use crate::utils;
use color_eyre::eyre::{Report, Result, WrapErr};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::path::Path;


/// Column headers of the clade-defining mutation table.
pub const HEADERS: &[&str] = &["strain", "mutation"];

#[derive(Clone, Debug, Deserialize, Serialize)]
struct Row {
    strain: String,
    mutation: String,
}

/// Clade-defining mutation names, grouped by strain.
///
/// ## Examples
///
/// ```rust
/// use gvf_merge::clade::CladeDefining;
///
/// let clades = CladeDefining::from_iter([("BA.1", "S:N501Y"), ("BA.1", "S:S371L")]);
/// assert!(clades.contains("BA.1", "S:N501Y"));
/// assert!(!clades.contains("BA.2", "S:N501Y"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CladeDefining {
    strains: BTreeMap<String, BTreeSet<String>>,
}

impl<S, M> FromIterator<(S, M)> for CladeDefining
where
    S: Into<String>,
    M: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, M)>>(iter: I) -> Self {
        let mut strains: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        iter.into_iter().for_each(|(strain, mutation)| {
            strains.entry(strain.into()).or_default().insert(mutation.into());
        });
        CladeDefining { strains }
    }
}

impl CladeDefining {
    /// Read the clade-defining mutation table.
    pub fn read<P>(path: &P) -> Result<CladeDefining, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let rows: Vec<Row> = utils::read_table(path, HEADERS)
            .wrap_err(format!("Failed to read clade-defining mutations: {path:?}"))?;
        let clades = CladeDefining::from_iter(rows.into_iter().map(|row| (row.strain, row.mutation)));
        debug!("Read clade-defining mutations for {} strains: {path:?}", clades.strains.len());
        Ok(clades)
    }

    /// Returns the clade-defining mutations of a strain, empty if it has none.
    pub fn get(&self, strain: &str) -> BTreeSet<&str> {
        self.strains
            .get(strain)
            .map(|mutations| mutations.iter().map(|m| m.as_str()).collect())
            .unwrap_or_default()
    }

    /// Returns true if the mutation is clade-defining for the strain.
    pub fn contains(&self, strain: &str, mutation: &str) -> bool {
        self.strains.get(strain).is_some_and(|mutations| mutations.contains(mutation))
    }
}

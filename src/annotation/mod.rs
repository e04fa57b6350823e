//! Functional annotations of mutations, keyed by mutation name.

use crate::utils;
use color_eyre::eyre::{Report, Result, WrapErr};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::Path;

#[cfg(test)]
mod tests;

/// Column headers of the functional annotation table.
pub const HEADERS: &[&str] = &[
    "mutation",
    "function_category",
    "function_description",
    "source",
    "citation",
    "comb_mutation",
];

// ----------------------------------------------------------------------------
// Annotation
// ----------------------------------------------------------------------------

/// A known functional effect of a mutation.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Annotation {
    /// Mutation name (ex. `S:N501Y`).
    pub mutation: String,
    pub function_category: String,
    pub function_description: String,
    /// Source URL.
    pub source: String,
    pub citation: String,
    /// Other mutations that must co-occur for the function to apply, comma-delimited.
    pub comb_mutation: String,
}

// ----------------------------------------------------------------------------
// Annotations
// ----------------------------------------------------------------------------

/// The functional annotation table, indexed by mutation name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Annotations {
    /// Annotation rows in table order.
    pub rows: Vec<Annotation>,
    /// Mutation name to row indices, in table order.
    index: BTreeMap<String, Vec<usize>>,
}

impl FromIterator<Annotation> for Annotations {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        let rows: Vec<Annotation> = iter.into_iter().collect();
        let mut index: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        rows.iter().enumerate().for_each(|(i, row)| {
            index.entry(row.mutation.clone()).or_default().push(i);
        });
        Annotations { rows, index }
    }
}

impl Annotations {
    /// Read the functional annotation table.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use gvf_merge::annotation::Annotations;
    ///
    /// let dir  = tempfile::tempdir()?;
    /// let path = dir.path().join("functional_annotation.tsv");
    /// std::fs::write(&path, "mutation\tfunction_category\tfunction_description\tsource\tcitation\tcomb_mutation\n\
    ///                        S:N501Y\treceptor binding\tincreased affinity\thttps://example.org\tDoe 2021\t\n")?;
    ///
    /// let annotations = Annotations::read(&path)?;
    /// assert_eq!(annotations.get("S:N501Y").count(), 1);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn read<P>(path: &P) -> Result<Annotations, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let rows: Vec<Annotation> = utils::read_table(path, HEADERS)
            .wrap_err(format!("Failed to read functional annotations: {path:?}"))?;
        let annotations = Annotations::from_iter(rows);
        debug!(
            "Read {} functional annotations for {} mutations: {path:?}",
            annotations.rows.len(),
            annotations.index.len()
        );
        Ok(annotations)
    }

    /// Returns all annotations of a mutation, in table order.
    pub fn get<'a>(&'a self, mutation: &str) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.index.get(mutation).into_iter().flatten().map(|i| &self.rows[*i])
    }

    /// Returns true if at least one annotation exists for the mutation.
    pub fn contains(&self, mutation: &str) -> bool {
        self.index.contains_key(mutation)
    }
}

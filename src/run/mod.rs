//! Merge a batch of call-set files into GVF files and diagnostic reports.

use crate::annotation::Annotations;
use crate::callset::CallSet;
use crate::clade::CladeDefining;
use crate::config::Config;
use crate::merge::{self, Diagnostics};
use crate::report::Reports;
use crate::{gvf, utils};
#[cfg(feature = "cli")]
use clap::Parser;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use indicatif::{style::ProgressStyle, ProgressBar};
use itertools::Itertools;
use log::{error, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tabled::Table;

#[cfg(test)]
mod tests;

/// Extension of the merged output files.
pub const EXTENSION: &str = "merged.gvf";

// ----------------------------------------------------------------------------
// RunArgs
// ----------------------------------------------------------------------------

/// Merge call sets with functional annotations.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
pub struct RunArgs {
    /// Functional annotation table.
    #[cfg_attr(feature = "cli", clap(short = 'a', long, required = true))]
    pub annotations: PathBuf,

    /// Clade-defining mutations table, with columns strain and mutation.
    #[cfg_attr(feature = "cli", clap(short = 'c', long))]
    pub clade_defining: Option<PathBuf>,

    /// JSON config of lineage and gene lookup tables.
    ///
    /// Write the default with `gvf-merge config`.
    #[cfg_attr(feature = "cli", clap(long))]
    pub config: Option<PathBuf>,

    /// Reference strain of the input, overriding the strain of its first call.
    ///
    /// Only valid with a single input file.
    #[cfg_attr(feature = "cli", clap(short = 's', long))]
    pub strain: Option<String>,

    /// Output directory.
    ///
    /// If the directory does not exist, it will be created.
    #[cfg_attr(feature = "cli", clap(short = 'o', long, required = true))]
    pub output_dir: PathBuf,

    /// Number of CPU threads to use.
    #[cfg_attr(feature = "cli", clap(short = 't', long, default_value_t = RunArgs::default().threads))]
    #[serde(skip)]
    pub threads: usize,

    /// Call-set tables, one per strain (.tsv, .txt, optionally .zst compressed).
    #[cfg_attr(feature = "cli", clap(required = true))]
    pub inputs: Vec<PathBuf>,
}

impl Default for RunArgs {
    fn default() -> Self {
        RunArgs {
            annotations: PathBuf::new(),
            clade_defining: None,
            config: None,
            strain: None,
            output_dir: PathBuf::new(),
            threads: 1,
            inputs: Vec::new(),
        }
    }
}

impl RunArgs {
    /// Returns the GVF output path of an input file.
    ///
    /// ```rust
    /// use gvf_merge::RunArgs;
    /// use std::path::PathBuf;
    ///
    /// let args = RunArgs { output_dir: PathBuf::from("out"), ..Default::default() };
    /// assert_eq!(args.output_path(&"calls/B.1.1.7.tsv.zst")?, PathBuf::from("out/B.1.1.7.merged.gvf"));
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn output_path<P>(&self, input: &P) -> Result<PathBuf, Report>
    where
        P: AsRef<Path> + std::fmt::Debug,
    {
        let stem = utils::file_stem(input)?;
        Ok(self.output_dir.join(format!("{stem}.{EXTENSION}")))
    }

    /// Check arguments that clap cannot.
    pub fn validate(&self) -> Result<(), Report> {
        if self.inputs.is_empty() {
            return Err(eyre!("No call-set files were provided."));
        }
        if self.strain.is_some() && self.inputs.len() > 1 {
            return Err(eyre!("--strain can only be used with a single input, found {}.", self.inputs.len()))
                .suggestion("Each call set takes its reference strain from its first call.");
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Summary
// ----------------------------------------------------------------------------

/// The result of merging one file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub strain: String,
    /// Calls read from the input.
    pub input_rows: usize,
    /// GVF records written.
    pub output_rows: usize,
    pub groups_assigned: usize,
    pub groups_dropped: usize,
    pub diagnostics: Diagnostics,
    /// Distinct mutation names of the call set.
    pub mutations: BTreeSet<String>,
}

/// The result of a batch.
#[derive(Debug, Default)]
pub struct Summary {
    /// Merged files, in input order.
    pub files: Vec<FileSummary>,
    /// Files that could not be merged, with their error.
    pub failed: Vec<(PathBuf, Report)>,
    /// Paths of the diagnostic reports.
    pub reports: Vec<PathBuf>,
}

impl Summary {
    /// Returns the number of distinct mutation names across all merged files.
    pub fn unique_mutations(&self) -> usize {
        self.files.iter().flat_map(|file| file.mutations.iter()).unique().count()
    }

    /// Tabulate the per-file results.
    pub fn to_table(&self) -> Table {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record([
            "Strain",
            "Input Rows",
            "Output Rows",
            "Groups Assigned",
            "Groups Dropped",
            "Unmatched",
            "Missing Clade-Defining",
        ]);
        self.files.iter().for_each(|file| {
            builder.push_record([
                file.strain.clone(),
                file.input_rows.to_string(),
                file.output_rows.to_string(),
                file.groups_assigned.to_string(),
                file.groups_dropped.to_string(),
                file.diagnostics.unannotated.len().to_string(),
                file.diagnostics.missing_clade_defining.len().to_string(),
            ]);
        });
        builder.build()
    }

    /// Returns an error listing the files that failed.
    pub fn ensure_success(&self) -> Result<(), Report> {
        if self.failed.is_empty() {
            return Ok(());
        }
        let files = self.failed.iter().map(|(path, _)| format!("{path:?}")).join(", ");
        Err(eyre!("{}/{} files failed to merge: {files}", self.failed.len(), self.len()))
            .suggestion("Errors for each file were logged above.")
    }

    /// Returns the number of input files, merged or failed.
    pub fn len(&self) -> usize {
        self.files.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ----------------------------------------------------------------------------
// Run
// ----------------------------------------------------------------------------

/// Inputs shared by every file of a batch.
struct Shared {
    annotations: Annotations,
    clades: CladeDefining,
    config: Config,
}

/// Merge every call set of a batch.
///
/// Shared inputs are read once. A file that fails is logged and skipped, and
/// listed in [`Summary::failed`]; the reports contain the files that merged.
pub fn run(args: &RunArgs) -> Result<Summary, Report> {
    args.validate()?;

    // ------------------------------------------------------------------------
    // Shared Inputs

    let config = match &args.config {
        Some(path) => Config::read(path)?,
        None => Config::default(),
    };
    let annotations = Annotations::read(&args.annotations)?;
    info!("Read {} functional annotations: {:?}", annotations.rows.len(), args.annotations);
    let clades = match &args.clade_defining {
        Some(path) => CladeDefining::read(path)?,
        None => CladeDefining::default(),
    };
    let shared = Shared { annotations, clades, config };

    // ------------------------------------------------------------------------
    // Merge

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build()
        .wrap_err(format!("Failed to build thread pool with {} threads.", args.threads))?;

    let style = ProgressStyle::with_template("{bar:40} {pos}/{len} ({percent}%) | Files | Elapsed: {elapsed_precise}")
        .wrap_err("Failed to create progress bar from template.")?;
    let progress_bar = ProgressBar::new(args.inputs.len() as u64).with_style(style);

    info!("Merging {} call sets with {} threads.", args.inputs.len(), args.threads);
    let results = pool.install(|| {
        args.inputs
            .par_iter()
            .map(|input| {
                let result = merge_file(input, args, &shared);
                progress_bar.inc(1);
                result
            })
            .collect::<Vec<_>>()
    });
    progress_bar.finish_and_clear();

    // ------------------------------------------------------------------------
    // Collect

    let mut summary = Summary::default();
    let mut reports = Reports::new();
    args.inputs.iter().zip(results).try_for_each(|(input, result)| {
        match result {
            Ok(file) => {
                reports.add(&file.diagnostics)?;
                summary.files.push(file);
            }
            Err(e) => {
                error!("Failed to merge {input:?}: {e:?}");
                summary.failed.push((input.clone(), e));
            }
        }
        Ok::<(), Report>(())
    })?;

    summary.reports = reports.write(&args.output_dir)?.to_vec();
    info!("Unique mutations across all strains: {}", summary.unique_mutations());
    info!("Summary:\n{}", summary.to_table());

    Ok(summary)
}

/// Merge one call-set file and write its GVF.
fn merge_file(input: &Path, args: &RunArgs, shared: &Shared) -> Result<FileSummary, Report> {
    info!("Merging: {input:?}");
    let call_set = CallSet::read(&input)?;

    let strain = match (&args.strain, call_set.strain()) {
        (Some(strain), _) => strain.clone(),
        (None, Some(strain)) => strain.to_string(),
        (None, None) => utils::file_stem(&input)?,
    };

    let merged = merge::merge(&call_set, &shared.annotations, &shared.clades, &strain);
    let records = merged.to_gvf(&shared.config);

    let output = args.output_path(&input)?;
    info!("Writing {} records: {output:?}", records.len());
    gvf::write(&records, &output)?;

    Ok(FileSummary {
        input: input.to_path_buf(),
        output,
        input_rows: call_set.len(),
        output_rows: records.len(),
        groups_assigned: merged.groups_assigned,
        groups_dropped: merged.groups_dropped,
        mutations: call_set.mutations().into_iter().map(String::from).collect(),
        diagnostics: merged.diagnostics,
        strain,
    })
}

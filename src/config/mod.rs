//! Lineage and gene lookup tables, passed to the merger as immutable [`Config`].

#[cfg(feature = "cli")]
use clap::Parser;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Debug, Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};
use strum::{Display as StrumDisplay, EnumString};

#[cfg(test)]
mod tests;

/// Gene name reported for positions outside every configured gene.
pub const INTERGENIC: &str = "INTERGENIC";

// ----------------------------------------------------------------------------
// Variant Status
// ----------------------------------------------------------------------------

/// WHO-style designation of a lineage.
#[derive(Clone, Copy, Debug, Deserialize, EnumString, PartialEq, Serialize, StrumDisplay)]
pub enum Status {
    /// Variant of Concern
    #[strum(serialize = "VOC")]
    Voc,
    /// Variant of Interest
    #[strum(serialize = "VOI")]
    Voi,
}

// ----------------------------------------------------------------------------
// Gene Range
// ----------------------------------------------------------------------------

/// Inclusive 1-based coordinates of a gene on the reference genome.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GeneRange {
    pub start: usize,
    pub end: usize,
}

impl GeneRange {
    pub fn contains(&self, position: usize) -> bool {
        self.start <= position && position <= self.end
    }
}

impl Display for GeneRange {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ----------------------------------------------------------------------------
// Config
// ----------------------------------------------------------------------------

/// Lookup tables used when writing GVF records.
///
/// The [`Default`] holds the SARS-CoV-2 tables.
///
/// ## Examples
///
/// ```rust
/// use gvf_merge::config::{Config, Status};
///
/// let config = Config::default();
/// assert_eq!(config.who_label("B.1.617.2"), Some("Delta"));
/// assert_eq!(config.status("B.1.617.2"), Some(Status::Voc));
/// assert_eq!(config.status("B.1.525"), Some(Status::Voi));
/// assert_eq!(config.status("BA.1"), None);
/// assert_eq!(config.gene(23063), "S");
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    /// Sequence id used when a call has none.
    pub seqid: String,
    /// PANGO lineage to WHO label.
    pub who_labels: BTreeMap<String, String>,
    /// WHO labels designated as Variants of Concern.
    pub variants_of_concern: BTreeSet<String>,
    /// Gene name to reference coordinates.
    pub genes: BTreeMap<String, GeneRange>,
}

impl Default for Config {
    fn default() -> Self {
        let who_labels = [
            ("B.1.1.7", "Alpha"),
            ("B.1.351", "Beta"),
            ("P.1", "Gamma"),
            ("B.1.617.2", "Delta"),
            ("B.1.427", "Epsilon"),
            ("B.1.429", "Epsilon"),
            ("P.2", "Zeta"),
            ("B.1.525", "Eta"),
            ("P.3", "Theta"),
            ("B.1.526", "Iota"),
            ("B.1.617.1", "Kappa"),
        ];
        let variants_of_concern = ["Alpha", "Beta", "Gamma", "Delta"];
        let genes = [
            ("5'UTR", 1, 265),
            ("ORF1ab", 266, 21555),
            ("S", 21563, 25384),
            ("ORF3a", 25393, 26220),
            ("E", 26245, 26472),
            ("M", 26523, 27191),
            ("ORF6", 27202, 27387),
            ("ORF7a", 27394, 27759),
            ("ORF8", 27894, 28259),
            ("N", 28274, 29533),
            ("ORF10", 29558, 29674),
            ("3'UTR", 29675, 29903),
        ];

        Config {
            seqid: "NC_045512.2".to_string(),
            who_labels: who_labels
                .into_iter()
                .map(|(lineage, label)| (lineage.to_string(), label.to_string()))
                .collect(),
            variants_of_concern: variants_of_concern.into_iter().map(String::from).collect(),
            genes: genes
                .into_iter()
                .map(|(gene, start, end)| (gene.to_string(), GeneRange { start, end }))
                .collect(),
        }
    }
}

impl Config {
    /// Returns the WHO label of a lineage, if it has one.
    pub fn who_label(&self, lineage: &str) -> Option<&str> {
        self.who_labels.get(lineage).map(|label| label.as_str())
    }

    /// Returns the VOC/VOI [`Status`] of a lineage.
    ///
    /// Lineages without a WHO label have no status.
    pub fn status(&self, lineage: &str) -> Option<Status> {
        let label = self.who_label(lineage)?;
        match self.variants_of_concern.contains(label) {
            true => Some(Status::Voc),
            false => Some(Status::Voi),
        }
    }

    /// Returns the gene overlapping a reference position, or [`INTERGENIC`].
    pub fn gene(&self, position: usize) -> &str {
        self.genes
            .iter()
            .find(|(_gene, range)| range.contains(position))
            .map(|(gene, _range)| gene.as_str())
            .unwrap_or(INTERGENIC)
    }

    /// Read [`Config`] from a JSON file.
    ///
    /// Keys missing from the file keep their default values.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use gvf_merge::config::Config;
    ///
    /// let config_out = Config::default();
    /// let file       = tempfile::NamedTempFile::new()?;
    /// config_out.write(&file.path())?;
    ///
    /// let config_in = Config::read(&file.path())?;
    /// assert_eq!(config_in, config_out);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn read<P>(path: &P) -> Result<Config, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let file =
            std::fs::File::open(path).wrap_err(eyre!("Failed to open Config file: {path:?}."))?;
        let reader = std::io::BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .wrap_err(eyre!("Failed to deserialize Config file: {path:?}."))?;
        config.validate().wrap_err(eyre!("Invalid Config file: {path:?}."))?;
        Ok(config)
    }

    /// Write [`Config`] to a JSON file.
    pub fn write<P>(&self, path: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        crate::utils::create_parent_dir(path)?;
        let mut file = std::fs::File::create(path)
            .wrap_err(eyre!("Failed to create Config file: {path:?}"))?;
        let output = serde_json::to_string_pretty(self)
            .wrap_err(eyre!("Failed to serialize Config: {self:?}"))?;
        file.write_all(format!("{}\n", output).as_bytes())
            .wrap_err(eyre!("Failed to write Config file: {path:?}"))?;
        Ok(())
    }

    /// Check that every gene range is well-formed.
    pub fn validate(&self) -> Result<(), Report> {
        self.genes.iter().try_for_each(|(gene, range)| {
            if range.start == 0 || range.start > range.end {
                return Err(eyre!("Gene {gene} has invalid coordinates: {range}"));
            }
            Ok(())
        })
    }
}

// ----------------------------------------------------------------------------
// ConfigArgs
// ----------------------------------------------------------------------------

/// Write the default configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
pub struct ConfigArgs {
    /// Output JSON path.
    #[cfg_attr(feature = "cli", clap(short = 'o', long, required = true))]
    pub output: PathBuf,
}

/// Write the default [`Config`] for editing.
pub fn write_default(args: &ConfigArgs) -> Result<(), Report> {
    log::info!("Writing default config: {:?}", args.output);
    Config::default().write(&args.output)
}

//! Genome Variation Format (GVF) records and writer.
//!
//! The column layout, pragmas and attribute key order are consumed by the
//! downstream visualization and must stay stable.

use crate::config::Config;
use crate::merge::MergedRow;
use crate::utils;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use indoc::indoc;
use std::fmt::{Debug, Display, Formatter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use strum::{Display as StrumDisplay, EnumString};


/// Pragma lines written before the column header.
pub const PRAGMAS: &str = indoc! {"
    ##gff-version 3
    ##gvf-version 1.10
    ##species NCBI_Taxonomy_URI=http://www.ncbi.nlm.nih.gov/Taxonomy/Browser/wwwtax.cgi?id=2697049
"};

/// Column headers.
pub const HEADERS: &[&str] =
    &["#seqid", "#source", "#type", "#start", "#end", "#score", "#strand", "#phase", "#attributes"];

/// Rewrite characters that would break the `key=value;` encoding.
///
/// ```rust
/// use gvf_merge::gvf::escape;
/// assert_eq!(escape("binds ACE2; reduces neutralization"), "binds ACE2: reduces neutralization");
/// ```
pub fn escape(value: &str) -> String {
    value.replace(';', ":")
}

// ----------------------------------------------------------------------------
// Kind
// ----------------------------------------------------------------------------

/// Variant type, written in the `#type` column.
#[derive(Clone, Copy, Debug, EnumString, PartialEq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Kind {
    /// Single nucleotide polymorphism.
    Snp,
    /// Multiple nucleotide polymorphism.
    Mnp,
    /// Insertion.
    Ins,
    /// Deletion.
    Del,
}

impl Kind {
    /// Classify a variant by its allele lengths.
    ///
    /// ```rust
    /// use gvf_merge::gvf::Kind;
    /// assert_eq!(Kind::from_alleles("A", "T"), Kind::Snp);
    /// assert_eq!(Kind::from_alleles("AC", "GT"), Kind::Mnp);
    /// assert_eq!(Kind::from_alleles("A", "ATTT"), Kind::Ins);
    /// assert_eq!(Kind::from_alleles("ATTT", "A"), Kind::Del);
    /// ```
    pub fn from_alleles(reference: &str, alt: &str) -> Self {
        match (reference.len(), alt.len()) {
            (r, a) if a > r => Kind::Ins,
            (r, a) if a < r => Kind::Del,
            (1, _) => Kind::Snp,
            _ => Kind::Mnp,
        }
    }
}

// ----------------------------------------------------------------------------
// Attributes
// ----------------------------------------------------------------------------

/// The `#attributes` column of a merged record.
///
/// Displayed as `key=value;` pairs in a fixed key order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    pub id: String,
    pub name: String,
    pub nt_name: String,
    pub gene: String,
    pub mutation_type: String,
    pub reference_seq: String,
    pub variant_seq: String,
    pub ao: String,
    pub dp: String,
    pub ro: String,
    pub alt_freq: String,
    pub ref_codon: String,
    pub alt_codon: String,
    pub ref_aa: String,
    pub alt_aa: String,
    pub viral_lineage: String,
    pub who_label: String,
    pub status: String,
    pub function_category: String,
    pub source: String,
    pub citation: String,
    pub comb_mutation: String,
    pub function_description: String,
    pub clade_defining: bool,
}

impl Attributes {
    /// Returns `(key, value, quoted)` in output order.
    pub fn pairs(&self) -> [(&'static str, &str, bool); 24] {
        let clade_defining = match self.clade_defining {
            true => "True",
            false => "False",
        };
        [
            ("ID", self.id.as_str(), false),
            ("Name", self.name.as_str(), false),
            ("nt_name", self.nt_name.as_str(), false),
            ("gene", self.gene.as_str(), false),
            ("mutation_type", self.mutation_type.as_str(), false),
            ("Reference_seq", self.reference_seq.as_str(), false),
            ("Variant_seq", self.variant_seq.as_str(), false),
            ("ao", self.ao.as_str(), false),
            ("dp", self.dp.as_str(), false),
            ("ro", self.ro.as_str(), false),
            ("alt_freq", self.alt_freq.as_str(), false),
            ("ref_codon", self.ref_codon.as_str(), false),
            ("alt_codon", self.alt_codon.as_str(), false),
            ("ref_aa", self.ref_aa.as_str(), false),
            ("alt_aa", self.alt_aa.as_str(), false),
            ("viral_lineage", self.viral_lineage.as_str(), false),
            ("who_label", self.who_label.as_str(), false),
            ("status", self.status.as_str(), false),
            ("function_category", self.function_category.as_str(), true),
            ("source", self.source.as_str(), false),
            ("citation", self.citation.as_str(), true),
            ("comb_mutation", self.comb_mutation.as_str(), false),
            ("function_description", self.function_description.as_str(), true),
            ("clade_defining", clade_defining, false),
        ]
    }
}

impl Display for Attributes {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        self.pairs().into_iter().try_for_each(|(key, value, quoted)| {
            let value = escape(value);
            match quoted {
                true => write!(f, "{key}=\"{value}\";"),
                false => write!(f, "{key}={value};"),
            }
        })
    }
}

// ----------------------------------------------------------------------------
// Record
// ----------------------------------------------------------------------------

/// One GVF line.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub seqid: String,
    pub source: String,
    pub kind: Kind,
    pub start: usize,
    pub end: usize,
    pub score: String,
    pub strand: String,
    pub phase: String,
    pub attributes: Attributes,
}

impl Record {
    /// Build the GVF record of a merged row.
    ///
    /// Missing call fields fall back to the [`Config`] tables: the default
    /// seqid, and the gene overlapping the call position.
    pub fn from_merged(row: &MergedRow, config: &Config) -> Self {
        let call = row.call;
        let annotation = row.annotation.cloned().unwrap_or_default();
        let depth = |d: Option<u64>| d.map(|d| d.to_string()).unwrap_or_default();

        let attributes = Attributes {
            id: row.group_id.to_string(),
            name: call.mutation.clone(),
            nt_name: call.nt_name.clone().unwrap_or_default(),
            gene: call.gene.clone().unwrap_or_else(|| config.gene(call.position).to_string()),
            mutation_type: call.mutation_type.clone().unwrap_or_default(),
            reference_seq: call.reference.clone(),
            variant_seq: call.alt.clone(),
            ao: depth(call.ao),
            dp: depth(call.dp),
            ro: depth(call.ro),
            alt_freq: format!("{:?}", call.alt_freq),
            ref_codon: call.ref_codon.clone(),
            alt_codon: call.alt_codon.clone(),
            ref_aa: call.ref_aa.clone(),
            alt_aa: call.alt_aa.clone(),
            viral_lineage: call.strain.clone(),
            who_label: config.who_label(&call.strain).unwrap_or_default().to_string(),
            status: config.status(&call.strain).map(|s| s.to_string()).unwrap_or_default(),
            function_category: annotation.function_category,
            source: annotation.source,
            citation: annotation.citation,
            comb_mutation: annotation.comb_mutation,
            function_description: annotation.function_description,
            clade_defining: row.clade_defining,
        };

        Record {
            seqid: call.seqid.clone().unwrap_or_else(|| config.seqid.clone()),
            source: ".".to_string(),
            kind: Kind::from_alleles(&call.reference, &call.alt),
            start: call.position,
            end: call.position + call.alt.len().max(1) - 1,
            score: ".".to_string(),
            strand: "+".to_string(),
            phase: ".".to_string(),
            attributes,
        }
    }

    /// Returns the column values in output order.
    pub fn fields(&self) -> [String; 9] {
        [
            self.seqid.clone(),
            self.source.clone(),
            self.kind.to_string(),
            self.start.to_string(),
            self.end.to_string(),
            self.score.clone(),
            self.strand.clone(),
            self.phase.clone(),
            self.attributes.to_string(),
        ]
    }
}

/// Write GVF records with pragmas and column headers.
///
/// Values containing quotes are quoted CSV-style, as the downstream reader
/// expects.
pub fn write<P>(records: &[Record], path: &P) -> Result<(), Report>
where
    P: AsRef<Path> + Debug,
{
    utils::create_parent_dir(path)?;
    let file = File::create(path).wrap_err_with(|| eyre!("Unable to create file: {path:?}"))?;
    let mut file = BufWriter::new(file);
    file.write_all(PRAGMAS.as_bytes())
        .wrap_err_with(|| eyre!("Unable to write pragmas: {path:?}"))?;

    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(file);
    writer.write_record(HEADERS).wrap_err_with(|| eyre!("Unable to write headers: {path:?}"))?;
    records.iter().try_for_each(|record| {
        writer
            .write_record(record.fields())
            .wrap_err_with(|| eyre!("Unable to write record: {record:?}"))
    })?;
    writer.flush().wrap_err_with(|| eyre!("Unable to flush: {path:?}"))?;

    Ok(())
}

//! Merge a call set with functional annotations.
//!
//! ## Algorithm
//!
//! 1. Left-join calls to annotations on mutation name, keeping call order.
//!    Calls without an annotation keep one row with empty enrichment.
//! 2. Form each row's [`Group`] from its mutation and the annotation's
//!    co-occurring mutations. An unannotated call takes the first complete
//!    group that lists it, or the group of itself alone.
//! 3. Assign a shared [`GroupId`] to every row of a group whose members are
//!    all in the call set, in first-seen order. Rows of incomplete groups are
//!    removed.
//! 4. Flag rows as clade-defining for the file's reference strain.
//! 5. Collect diagnostics of unannotated and missing clade-defining mutations.

use crate::annotation::{Annotation, Annotations};
use crate::callset::{Call, CallSet};
use crate::clade::CladeDefining;
use crate::config::Config;
use crate::group::{Assigner, Group, GroupId};
use crate::gvf;
use log::{debug, info, warn};
use std::collections::BTreeMap;


// ----------------------------------------------------------------------------
// Merged Row
// ----------------------------------------------------------------------------

/// A call joined to one of its annotations, with its group id.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedRow<'a> {
    pub call: &'a Call,
    /// [`None`] when the mutation has no functional annotation.
    pub annotation: Option<&'a Annotation>,
    pub group: Group,
    pub group_id: GroupId,
    pub clade_defining: bool,
}

// ----------------------------------------------------------------------------
// Diagnostics
// ----------------------------------------------------------------------------

/// Names that could not be matched while merging one file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    /// Reference strain of the file.
    pub strain: String,
    /// Call-set mutations with no functional annotation, sorted and unique.
    pub unannotated: Vec<String>,
    /// Clade-defining mutations of the strain absent from the call set, sorted.
    pub missing_clade_defining: Vec<String>,
}

// ----------------------------------------------------------------------------
// Merged
// ----------------------------------------------------------------------------

/// The result of merging one call set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Merged<'a> {
    /// Reference strain of the file.
    pub strain: String,
    /// Rows of complete groups, in join order.
    pub rows: Vec<MergedRow<'a>>,
    /// Number of rows after the join, before incomplete groups were removed.
    pub joined: usize,
    /// Number of distinct groups given an id.
    pub groups_assigned: usize,
    /// Number of distinct groups removed for missing members.
    pub groups_dropped: usize,
    pub diagnostics: Diagnostics,
}

impl<'a> Merged<'a> {
    /// Convert the merged rows into GVF records.
    pub fn to_gvf(&self, config: &Config) -> Vec<gvf::Record> {
        self.rows.iter().map(|row| gvf::Record::from_merged(row, config)).collect()
    }
}

/// Merge a call set with functional annotations.
///
/// ## Arguments
///
/// - `call_set` - Calls of one input file.
/// - `annotations` - Functional annotation table.
/// - `clades` - Clade-defining mutations of every strain.
/// - `strain` - Reference strain of the file.
///
/// ## Examples
///
/// ```rust
/// use gvf_merge::annotation::{Annotation, Annotations};
/// use gvf_merge::callset::{Call, CallSet};
/// use gvf_merge::clade::CladeDefining;
/// use gvf_merge::merge::merge;
///
/// let call = |m: &str| Call { mutation: m.to_string(), strain: "BA.1".to_string(), ..Default::default() };
/// let call_set = CallSet::from_iter([call("A"), call("B")]);
/// let annotations = Annotations::from_iter([Annotation {
///     mutation: "A".to_string(),
///     comb_mutation: "B".to_string(),
///     ..Default::default()
/// }]);
///
/// // B has no annotation of its own, so it joins the complete group {A, B}
/// let merged = merge(&call_set, &annotations, &CladeDefining::default(), "BA.1");
/// let ids = merged.rows.iter().map(|row| row.group_id.to_string()).collect::<Vec<_>>();
/// assert_eq!(ids, ["ID_0", "ID_0"]);
/// ```
pub fn merge<'a>(
    call_set: &'a CallSet,
    annotations: &'a Annotations,
    clades: &CladeDefining,
    strain: &str,
) -> Merged<'a> {
    let present = call_set.mutations();
    let mut assigner = Assigner::new(&present);

    // ------------------------------------------------------------------------
    // Join

    let joined = call_set
        .calls
        .iter()
        .flat_map(|call| {
            let matches = annotations.get(&call.mutation).map(Some).collect::<Vec<_>>();
            match matches.is_empty() {
                true => vec![(call, None)],
                false => matches.into_iter().map(|a| (call, a)).collect(),
            }
        })
        .collect::<Vec<_>>();

    // ------------------------------------------------------------------------
    // Complete Groups

    // first complete annotated group of each member, in join order
    let complete = joined
        .iter()
        .filter_map(|(call, annotation)| {
            annotation.map(|a| Group::new(&call.mutation, &a.comb_mutation))
        })
        .filter(|group| group.is_complete(&present))
        .collect::<Vec<_>>();
    let mut containing: BTreeMap<&str, &Group> = BTreeMap::new();
    complete.iter().for_each(|group| {
        group.members().for_each(|member| {
            containing.entry(member).or_insert(group);
        })
    });

    // ------------------------------------------------------------------------
    // Group

    let num_joined = joined.len();
    let rows = joined
        .into_iter()
        .filter_map(|(call, annotation)| {
            // unannotated calls join a complete group listing them, else stand alone
            let group = match annotation {
                Some(a) => Group::new(&call.mutation, &a.comb_mutation),
                None => match containing.get(call.mutation.as_str()) {
                    Some(group) => (*group).clone(),
                    None => Group::new(&call.mutation, ""),
                },
            };
            let group_id = assigner.assign(group.clone())?;
            let clade_defining = call.strain == strain && clades.contains(strain, &call.mutation);
            Some(MergedRow { call, annotation, group, group_id, clade_defining })
        })
        .collect::<Vec<_>>();

    // ------------------------------------------------------------------------
    // Diagnostics

    let unannotated = present
        .iter()
        .filter(|m| !annotations.contains(m))
        .map(|m| m.to_string())
        .collect::<Vec<_>>();
    let clade_defining = clades.get(strain);
    let missing_clade_defining = clade_defining
        .iter()
        .filter(|m| !present.contains(*m))
        .map(|m| m.to_string())
        .collect::<Vec<_>>();

    if !unannotated.is_empty() {
        warn!(
            "{strain}: {}/{} mutations were not found in the functional annotations.",
            unannotated.len(),
            present.len()
        );
    }
    if !missing_clade_defining.is_empty() {
        warn!(
            "{strain}: {}/{} clade-defining mutations were not found in the call set.",
            missing_clade_defining.len(),
            clade_defining.len()
        );
    }
    debug!("{strain}: {} rows were removed with incomplete groups.", num_joined - rows.len());
    info!(
        "{strain}: {} rows, {} groups assigned, {} groups dropped.",
        rows.len(),
        assigner.assigned(),
        assigner.dropped()
    );

    Merged {
        strain: strain.to_string(),
        joined: num_joined,
        groups_assigned: assigner.assigned(),
        groups_dropped: assigner.dropped(),
        rows,
        diagnostics: Diagnostics {
            strain: strain.to_string(),
            unannotated,
            missing_clade_defining,
        },
    }
}

//! Co-occurring mutation groups and their shared identifiers.
//!
//! A [`Group`] is the canonical member set formed from a mutation and the
//! mutations its annotation says must co-occur with it. The [`Assigner`] gives
//! each complete group a sequential [`GroupId`] in the order groups are first
//! seen, and rejects groups with members missing from the call set.

use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};


/// Member values that stand for a missing mutation.
pub const PLACEHOLDERS: &[&str] = &["nan", "NaN", "None", ""];

/// Characters stripped from both ends of every member.
const ARTIFACTS: &[char] = &['\'', '"', '[', ']'];

/// Strip quoting and whitespace artifacts from a member name.
///
/// Returns [`None`] for placeholders.
///
/// ```rust
/// use gvf_merge::group::canonicalize;
///
/// assert_eq!(canonicalize(" 'S:N501Y'"), Some("S:N501Y".to_string()));
/// assert_eq!(canonicalize("[\"S:E484K\""), Some("S:E484K".to_string()));
/// assert_eq!(canonicalize("nan"), None);
/// assert_eq!(canonicalize(" ' ' "), None);
/// ```
pub fn canonicalize(member: &str) -> Option<String> {
    let member = member.trim_matches(|c: char| c.is_whitespace() || ARTIFACTS.contains(&c));
    match PLACEHOLDERS.contains(&member) {
        true => None,
        false => Some(member.to_string()),
    }
}

// ----------------------------------------------------------------------------
// Group
// ----------------------------------------------------------------------------

/// A canonical, sorted and deduplicated set of co-occurring mutation names.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Group {
    members: BTreeSet<String>,
}

impl<S: AsRef<str>> FromIterator<S> for Group {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let members = iter.into_iter().filter_map(|m| canonicalize(m.as_ref())).collect();
        Group { members }
    }
}

impl Display for Group {
    /// The group key, members joined by `,`.
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.members.iter().join(","))
    }
}

impl Group {
    /// Build the group of a mutation and its comma-delimited co-occurring list.
    ///
    /// ## Examples
    ///
    /// Permuted member lists produce the same group.
    ///
    /// ```rust
    /// use gvf_merge::group::Group;
    ///
    /// let a = Group::new("S:N501Y", "'S:E484K', 'S:K417N'");
    /// let b = Group::new("S:K417N", "S:N501Y,S:E484K");
    /// assert_eq!(a, b);
    /// assert_eq!(a.to_string(), "S:E484K,S:K417N,S:N501Y");
    ///
    /// // missing co-occurring lists only hold the mutation itself
    /// assert_eq!(Group::new("S:N501Y", "nan").to_string(), "S:N501Y");
    /// ```
    pub fn new(mutation: &str, comb_mutation: &str) -> Self {
        std::iter::once(mutation).chain(comb_mutation.split(',')).collect()
    }

    /// Returns the members in sorted order.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.as_str())
    }

    /// Returns true if every member is in `present`.
    pub fn is_complete(&self, present: &BTreeSet<&str>) -> bool {
        self.members().all(|m| present.contains(m))
    }

    /// Returns the members absent from `present`.
    pub fn missing<'g>(&'g self, present: &BTreeSet<&str>) -> Vec<&'g str> {
        self.members().filter(|m| !present.contains(m)).collect()
    }
}

// ----------------------------------------------------------------------------
// Group Id
// ----------------------------------------------------------------------------

/// Identifier shared by all rows of one complete group, displayed as `ID_<n>`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct GroupId(pub usize);

impl Display for GroupId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "ID_{}", self.0)
    }
}

// ----------------------------------------------------------------------------
// Assigner
// ----------------------------------------------------------------------------

/// Assigns [`GroupId`]s to groups in first-seen order.
///
/// The decision for a group is made once, on first encounter, and reused for
/// every later row with the same group.
///
/// ## Examples
///
/// ```rust
/// use gvf_merge::group::{Assigner, Group, GroupId};
/// use std::collections::BTreeSet;
///
/// let present = BTreeSet::from(["A", "B", "C"]);
/// let mut assigner = Assigner::new(&present);
///
/// assert_eq!(assigner.assign(Group::new("A", "B")), Some(GroupId(0)));
/// assert_eq!(assigner.assign(Group::new("C", "D")), None);
/// assert_eq!(assigner.assign(Group::new("C", "")),  Some(GroupId(1)));
/// assert_eq!(assigner.assign(Group::new("B", "A")), Some(GroupId(0)));
/// ```
#[derive(Debug)]
pub struct Assigner<'p> {
    /// Mutation names present in the call set.
    present: &'p BTreeSet<&'p str>,
    /// Every group seen so far, with its id if complete.
    groups: IndexMap<Group, Option<GroupId>>,
    /// Next id to hand out.
    next: usize,
}

impl<'p> Assigner<'p> {
    pub fn new(present: &'p BTreeSet<&'p str>) -> Self {
        Assigner { present, groups: IndexMap::new(), next: 0 }
    }

    /// Returns the id of the group, or [`None`] if the group is incomplete.
    pub fn assign(&mut self, group: Group) -> Option<GroupId> {
        if let Some(id) = self.groups.get(&group) {
            return *id;
        }

        let id = match group.is_complete(self.present) {
            true => {
                let id = GroupId(self.next);
                self.next += 1;
                Some(id)
            }
            false => {
                debug!("Dropping group {group}, missing: {:?}", group.missing(self.present));
                None
            }
        };
        self.groups.insert(group, id);
        id
    }

    /// Returns the number of distinct groups that received an id.
    pub fn assigned(&self) -> usize {
        self.next
    }

    /// Returns the number of distinct groups that were rejected.
    pub fn dropped(&self) -> usize {
        self.groups.len() - self.next
    }
}

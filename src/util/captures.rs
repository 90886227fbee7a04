/*!
Types for reporting capturing group offsets, and for mapping between
capturing group names and indices.
*/

use std::{collections::HashMap, sync::Arc};

use crate::util::{
    primitives::NonMaxUsize,
    search::{Match, Span},
};

/// The span of a single capturing group, or `usize::MAX` sentinels while the
/// group has not been recorded. Two slots per group: `2g` holds the starting
/// offset and `2g + 1` the ending offset.
pub(crate) type Slot = Option<NonMaxUsize>;

/// Represents information about the capturing groups in a compiled regex.
///
/// A `GroupInfo` maps capturing group indices to their names (if any) and
/// back again. Group index `0` always refers to the implicit group spanning
/// the overall match and never has a name. Explicit groups are numbered
/// `1, 2, …` in the order their opening parenthesis appears in the pattern.
///
/// This type is cheap to clone: the maps are shared behind an `Arc`, and
/// every [`Captures`](crate::Captures) value produced by a search holds one
/// of these clones so that group names can be resolved without going back to
/// the regex.
#[derive(Clone, Debug)]
pub struct GroupInfo(Arc<GroupInfoInner>);

#[derive(Debug)]
struct GroupInfoInner {
    /// Group index to name. Index 0 is always `None`.
    index_to_name: Vec<Option<Arc<str>>>,
    /// Name to group index. Only named groups appear here.
    name_to_index: HashMap<Arc<str>, usize>,
}

impl GroupInfo {
    /// Create group information from the list of group names in index order.
    ///
    /// `names[0]` corresponds to the implicit whole-match group and must be
    /// `None`. The parser guarantees that names are unique, so this does not
    /// re-validate them.
    pub(crate) fn new(names: Vec<Option<Arc<str>>>) -> GroupInfo {
        debug_assert!(names.first().map_or(false, |n| n.is_none()));
        let mut name_to_index = HashMap::new();
        for (index, name) in names.iter().enumerate() {
            if let Some(ref name) = *name {
                name_to_index.insert(Arc::clone(name), index);
            }
        }
        GroupInfo(Arc::new(GroupInfoInner {
            index_to_name: names,
            name_to_index,
        }))
    }

    /// Returns the total number of capturing groups, including the implicit
    /// group `0` for the overall match.
    ///
    /// This is always at least `1`.
    #[inline]
    pub fn group_len(&self) -> usize {
        self.0.index_to_name.len()
    }

    /// Return the group index of the group with the given name, or `None` if
    /// no such group exists.
    #[inline]
    pub fn to_index(&self, name: &str) -> Option<usize> {
        self.0.name_to_index.get(name).copied()
    }

    /// Return the name of the group at the given index, or `None` if the
    /// group is unnamed or the index is invalid.
    #[inline]
    pub fn to_name(&self, index: usize) -> Option<&str> {
        self.0.index_to_name.get(index)?.as_deref()
    }

    /// Returns an iterator over all group names, in group index order. The
    /// first item is always `None` (the whole-match group).
    pub fn names(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.0.index_to_name.iter().map(|n| n.as_deref())
    }

    /// The number of capture slots: two per group.
    #[inline]
    pub(crate) fn slot_len(&self) -> usize {
        self.group_len() * 2
    }
}

/// The capturing groups recorded for a single match.
///
/// A `Captures` value is produced by [`Regex::captures`] and
/// [`Regex::captures_all`]. It always contains the span of the overall match
/// (group `0`). For every explicit group, a span is present if and only if
/// the winning path through the NFA traversed that group; groups that did
/// not participate in the match are absent, not empty.
///
/// [`Regex::captures`]: crate::Regex::captures
/// [`Regex::captures_all`]: crate::Regex::captures_all
#[derive(Clone, Debug)]
pub struct Captures {
    group_info: GroupInfo,
    slots: Vec<Slot>,
}

impl Captures {
    /// Create a new `Captures` from the slot table recorded at the accept
    /// state of a successful search.
    pub(crate) fn new(group_info: GroupInfo, slots: Vec<Slot>) -> Captures {
        debug_assert_eq!(group_info.slot_len(), slots.len());
        Captures { group_info, slots }
    }

    /// Returns the span of the overall match.
    ///
    /// This never returns `None`: a `Captures` value only exists for
    /// successful matches and group `0` is always recorded.
    #[inline]
    pub fn get_match(&self) -> Option<Match> {
        self.get_group(0).map(Match::new)
    }

    /// Returns the span of the capturing group at the given index, or `None`
    /// if the index is invalid or the group did not participate in the match.
    pub fn get_group(&self, index: usize) -> Option<Span> {
        if index >= self.group_info.group_len() {
            return None;
        }
        let start = self.slots[index * 2]?.get();
        let end = self.slots[index * 2 + 1]?.get();
        debug_assert!(start <= end);
        Some(Span { start, end })
    }

    /// Returns the span of the capturing group with the given name, or
    /// `None` if no such group exists or it did not participate in the
    /// match.
    pub fn get_group_by_name(&self, name: &str) -> Option<Span> {
        self.get_group(self.group_info.to_index(name)?)
    }

    /// Returns the total number of capturing groups in the pattern,
    /// including the implicit group `0`.
    ///
    /// This is the number of groups *defined*, not the number that
    /// participated in this particular match.
    #[inline]
    pub fn group_len(&self) -> usize {
        self.group_info.group_len()
    }

    /// Returns a reference to the underlying group information.
    #[inline]
    pub fn group_info(&self) -> &GroupInfo {
        &self.group_info
    }

    /// Returns an iterator over the groups that participated in the match,
    /// in group index order. Group `0` is always the first item.
    pub fn iter(&self) -> CapturesIter<'_> {
        CapturesIter { caps: self, index: 0 }
    }
}

impl<'a> IntoIterator for &'a Captures {
    type Item = Capture<'a>;
    type IntoIter = CapturesIter<'a>;

    fn into_iter(self) -> CapturesIter<'a> {
        self.iter()
    }
}

/// A single recorded capturing group: its index, its name (if any) and the
/// span it matched.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Capture<'a> {
    index: usize,
    name: Option<&'a str>,
    span: Span,
}

impl<'a> Capture<'a> {
    /// The index of this capturing group. `0` is the overall match.
    #[inline]
    pub fn group(&self) -> usize {
        self.index
    }

    /// The name of this capturing group, if it has one.
    #[inline]
    pub fn name(&self) -> Option<&'a str> {
        self.name
    }

    /// The span matched by this group.
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    /// The starting offset of this group's span.
    #[inline]
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// The ending offset of this group's span.
    #[inline]
    pub fn end(&self) -> usize {
        self.span.end
    }
}

/// An iterator over the participating groups of one match, in index order.
///
/// This is created by [`Captures::iter`].
#[derive(Debug)]
pub struct CapturesIter<'a> {
    caps: &'a Captures,
    index: usize,
}

impl<'a> Iterator for CapturesIter<'a> {
    type Item = Capture<'a>;

    fn next(&mut self) -> Option<Capture<'a>> {
        while self.index < self.caps.group_len() {
            let index = self.index;
            self.index += 1;
            if let Some(span) = self.caps.get_group(index) {
                return Some(Capture {
                    index,
                    name: self.caps.group_info().to_name(index),
                    span,
                });
            }
        }
        None
    }
}

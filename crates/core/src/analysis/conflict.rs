use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::hash::Hash;

use crate::analysis::overlap::OverlapPair;
use crate::trace::indexed::Trace;

/// An overlapping pair in which both records write, together with the
/// resources they have in common. `resources` is never empty.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "Resource: Ord + ::serde::Deserialize<'de>"))
)]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConflictEntry<Resource> {
    pub pair: OverlapPair,
    pub resources: BTreeSet<Resource>,
}

/// Select the overlapping pairs that are write-write conflicts.
///
/// A pair conflicts iff both records are [`Write`](crate::trace::types::AccessMode::Write)
/// and their resource sets intersect. Read-read and read-write overlaps are
/// never conflicts. Because the comparison runs on the deduplicated resource
/// sets, a resource listed twice by one record is still shared once.
///
/// Entries are returned in the order of `overlaps`.
///
/// # Panics
///
/// Panics if a pair refers to a record outside `trace`.
#[must_use]
pub fn classify_conflicts<Resource, Time>(
    trace: &Trace<'_, Resource, Time>,
    overlaps: &[OverlapPair],
) -> Vec<ConflictEntry<Resource>>
where
    Resource: Eq + Hash + Clone + Ord,
{
    overlaps
        .iter()
        .filter_map(|pair| {
            let x = &trace[pair.first];
            let y = &trace[pair.second];
            if !(x.record.mode.is_write() && y.record.mode.is_write()) {
                return None;
            }
            let resources: BTreeSet<Resource> = x
                .resource_set
                .intersection(&y.resource_set)
                .map(|resource| (*resource).clone())
                .collect();
            (!resources.is_empty()).then_some(ConflictEntry {
                pair: *pair,
                resources,
            })
        })
        .collect()
}

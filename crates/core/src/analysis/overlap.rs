//! Pairwise interval overlap detection.
//!
//! Every unordered pair of records is compared exactly once, so a trace of
//! `n` records costs `n * (n - 1) / 2` comparisons and may produce that many
//! pairs. This is the dominant cost of the whole analysis: O(n^2) time and
//! O(n^2) worst-case output.

use alloc::vec::Vec;
use core::hash::Hash;

use crate::trace::indexed::{Trace, TraceEntry};
use crate::trace::types::RecordId;

/// Two records whose intervals overlap.
///
/// `first` always precedes `second` in the trace. `declared_resources` is the
/// combined length of both records' resource sequences; it feeds the
/// diagnostic total only.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlapPair {
    pub first: RecordId,
    pub second: RecordId,
    pub declared_resources: usize,
}

impl OverlapPair {
    #[must_use]
    pub const fn ids(&self) -> [RecordId; 2] {
        [self.first, self.second]
    }

    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.first == id || self.second == id
    }
}

/// Result of the pairwise scan.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Overlaps {
    /// Overlapping pairs in generation order (row-major over the upper triangle).
    pub pairs: Vec<OverlapPair>,
    /// Sum of `declared_resources` over *every* examined pair, overlapping or
    /// not. Records taking part in many pairs are counted many times; this is a
    /// volume diagnostic, not a per-resource access count.
    pub total_resource_accesses: usize,
}

/// Scans the pairs `(x, y)` for every `y` in `rest`.
fn scan_row<Resource, Time>(
    x: &TraceEntry<'_, Resource, Time>,
    rest: &[TraceEntry<'_, Resource, Time>],
    overlaps: &mut Overlaps,
) where
    Resource: Eq + Hash,
    Time: Ord,
{
    for y in rest {
        let declared_resources = x.declared_resources() + y.declared_resources();
        overlaps.total_resource_accesses += declared_resources;
        if x.record.overlaps(y.record) {
            overlaps.pairs.push(OverlapPair {
                first: x.id,
                second: y.id,
                declared_resources,
            });
        }
    }
}

/// Find every pair of records in `trace` whose closed intervals intersect.
///
/// Pairs are reported in the order they are generated, which is stable for a
/// fixed input order. An empty or single-record trace yields no pairs and a
/// total of zero.
#[must_use]
pub fn detect_overlaps<Resource, Time>(trace: &Trace<'_, Resource, Time>) -> Overlaps
where
    Resource: Eq + Hash,
    Time: Ord,
{
    let entries = trace.entries();
    let mut overlaps = Overlaps::default();
    for (i, x) in entries.iter().enumerate() {
        scan_row(x, &entries[i + 1..], &mut overlaps);
    }
    overlaps
}

/// Parallel [`detect_overlaps`]: each row of the upper triangle is scanned by
/// a rayon task and the rows are concatenated in index order.
///
/// The result is identical to the sequential scan, pair order included.
#[cfg(feature = "parallel")]
#[must_use]
pub fn detect_overlaps_parallel<Resource, Time>(trace: &Trace<'_, Resource, Time>) -> Overlaps
where
    Resource: Eq + Hash + Sync,
    Time: Ord + Sync,
{
    use rayon::iter::{IntoParallelIterator, ParallelIterator};

    let entries = trace.entries();
    let rows: Vec<Overlaps> = (0..entries.len())
        .into_par_iter()
        .map(|i| {
            let mut row = Overlaps::default();
            scan_row(&entries[i], &entries[i + 1..], &mut row);
            row
        })
        .collect();

    let mut overlaps = Overlaps::default();
    for mut row in rows {
        overlaps.pairs.append(&mut row.pairs);
        overlaps.total_resource_accesses += row.total_resource_accesses;
    }
    overlaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::types::ExecutionRecord;

    fn overlaps_of(records: &[ExecutionRecord<&'static str, u64>]) -> Overlaps {
        let trace = Trace::try_from(records).expect("well-formed");
        detect_overlaps(&trace)
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(overlaps_of(&[]), Overlaps::default());
        let single = overlaps_of(&[ExecutionRecord::write(1, 0, 10, vec!["a", "b"])]);
        assert!(single.pairs.is_empty());
        assert_eq!(single.total_resource_accesses, 0);
    }

    #[test]
    fn test_two_overlapping() {
        let result = overlaps_of(&[
            ExecutionRecord::write(1, 0, 10, vec!["a"]),
            ExecutionRecord::write(1, 5, 15, vec!["a", "b"]),
        ]);
        assert_eq!(
            result.pairs,
            vec![OverlapPair {
                first: RecordId(0),
                second: RecordId(1),
                declared_resources: 3,
            }]
        );
        assert_eq!(result.total_resource_accesses, 3);
    }

    #[test]
    fn test_disjoint_still_counts_volume() {
        let result = overlaps_of(&[
            ExecutionRecord::write(1, 0, 10, vec!["a"]),
            ExecutionRecord::write(1, 11, 20, vec!["a"]),
        ]);
        assert!(result.pairs.is_empty());
        assert_eq!(result.total_resource_accesses, 2);
    }

    #[test]
    fn test_touching_endpoints_overlap() {
        let result = overlaps_of(&[
            ExecutionRecord::read(1, 0, 10, vec![]),
            ExecutionRecord::read(1, 10, 20, vec![]),
        ]);
        assert_eq!(result.pairs.len(), 1);
    }

    #[test]
    fn test_generation_order() {
        // 0 overlaps 1 and 2, 1 overlaps 2, 3 is isolated
        let result = overlaps_of(&[
            ExecutionRecord::write(1, 0, 10, vec!["a"]),
            ExecutionRecord::write(1, 2, 8, vec!["a"]),
            ExecutionRecord::write(1, 5, 12, vec!["a"]),
            ExecutionRecord::write(1, 50, 60, vec!["a"]),
        ]);
        let ids: Vec<(usize, usize)> = result
            .pairs
            .iter()
            .map(|p| (p.first.index(), p.second.index()))
            .collect();
        assert_eq!(ids, vec![(0, 1), (0, 2), (1, 2)]);
        // six examined pairs, two declared resources each
        assert_eq!(result.total_resource_accesses, 12);
    }

    #[test]
    fn test_duplicates_count_in_volume() {
        let result = overlaps_of(&[
            ExecutionRecord::write(1, 0, 10, vec!["a", "a"]),
            ExecutionRecord::write(1, 0, 10, vec!["a"]),
        ]);
        assert_eq!(result.pairs[0].declared_resources, 3);
    }

    #[test]
    fn test_pair_helpers() {
        let pair = OverlapPair {
            first: RecordId(2),
            second: RecordId(5),
            declared_resources: 0,
        };
        assert_eq!(pair.ids(), [RecordId(2), RecordId(5)]);
        assert!(pair.contains(RecordId(5)));
        assert!(!pair.contains(RecordId(3)));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let records: Vec<ExecutionRecord<&str, u64>> = (0..40u64)
            .map(|i| ExecutionRecord::write(1, i * 3, i * 3 + 7, vec!["a"; (i % 3) as usize]))
            .collect();
        let trace = Trace::try_from(records.as_slice()).expect("well-formed");
        assert_eq!(detect_overlaps(&trace), detect_overlaps_parallel(&trace));
    }
}

use core::hash::Hash;

use hashbrown::{HashMap, HashSet};

use crate::analysis::conflict::ConflictEntry;
use crate::analysis::overlap::OverlapPair;
use crate::trace::indexed::Trace;
use crate::trace::types::{AccessMode, RecordId};

/// Read and write accesses to one resource.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AccessCounts {
    pub reads: u64,
    pub writes: u64,
}

impl AccessCounts {
    const fn record(&mut self, mode: AccessMode) {
        match mode {
            AccessMode::Read => self.reads += 1,
            AccessMode::Write => self.writes += 1,
            AccessMode::None => {}
        }
    }
}

/// Tally reads and writes per resource over the records that take part in at
/// least one overlap.
///
/// A record in several overlapping pairs is counted once: participants are
/// deduplicated by [`RecordId`], not by value. Each resource the record
/// declares gets one read or write according to its mode; a record with mode
/// `None` still makes its resources appear, with nothing added.
///
/// # Panics
///
/// Panics if a pair refers to a record outside `trace`.
#[must_use]
pub fn aggregate_accesses<Resource, Time>(
    trace: &Trace<'_, Resource, Time>,
    overlaps: &[OverlapPair],
) -> HashMap<Resource, AccessCounts>
where
    Resource: Eq + Hash + Clone,
{
    let participants: HashSet<RecordId> = overlaps.iter().flat_map(OverlapPair::ids).collect();

    let mut accesses: HashMap<Resource, AccessCounts> = HashMap::new();
    for id in participants {
        let record = trace[id].record;
        for resource in &record.resources {
            accesses
                .entry(resource.clone())
                .or_default()
                .record(record.mode);
        }
    }
    accesses
}

/// Count, per resource, the conflicting pairs that share it.
#[must_use]
pub fn aggregate_conflicts<Resource>(
    conflicts: &[ConflictEntry<Resource>],
) -> HashMap<Resource, u64>
where
    Resource: Eq + Hash + Clone,
{
    let mut per_resource: HashMap<Resource, u64> = HashMap::new();
    for conflict in conflicts {
        for resource in &conflict.resources {
            *per_resource.entry(resource.clone()).or_default() += 1;
        }
    }
    per_resource
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::conflict::classify_conflicts;
    use crate::analysis::overlap::detect_overlaps;
    use crate::trace::types::ExecutionRecord;

    #[test]
    fn test_participants_counted_once() {
        // record 0 overlaps both 1 and 2 but contributes a single write
        let records = vec![
            ExecutionRecord::write(1, 0, 100, vec!["a"]),
            ExecutionRecord::read(1, 10, 20, vec!["a"]),
            ExecutionRecord::read(1, 30, 40, vec!["a", "b"]),
        ];
        let trace = Trace::try_from(records.as_slice()).expect("well-formed");
        let overlaps = detect_overlaps(&trace);
        assert_eq!(overlaps.pairs.len(), 2);

        let accesses = aggregate_accesses(&trace, &overlaps.pairs);
        assert_eq!(
            accesses["a"],
            AccessCounts {
                reads: 2,
                writes: 1
            }
        );
        assert_eq!(
            accesses["b"],
            AccessCounts {
                reads: 1,
                writes: 0
            }
        );
    }

    #[test]
    fn test_identical_records_are_distinct() {
        let records = vec![
            ExecutionRecord::write(1, 0, 10, vec!["a"]),
            ExecutionRecord::write(1, 0, 10, vec!["a"]),
        ];
        let trace = Trace::try_from(records.as_slice()).expect("well-formed");
        let overlaps = detect_overlaps(&trace);
        let accesses = aggregate_accesses(&trace, &overlaps.pairs);
        assert_eq!(accesses["a"].writes, 2);
    }

    #[test]
    fn test_non_participants_ignored() {
        let records = vec![
            ExecutionRecord::write(1, 0, 10, vec!["a"]),
            ExecutionRecord::write(1, 5, 15, vec!["a"]),
            ExecutionRecord::write(1, 50, 60, vec!["lonely"]),
        ];
        let trace = Trace::try_from(records.as_slice()).expect("well-formed");
        let overlaps = detect_overlaps(&trace);
        let accesses = aggregate_accesses(&trace, &overlaps.pairs);
        assert!(!accesses.contains_key("lonely"));
        assert_eq!(accesses.len(), 1);
    }

    #[test]
    fn test_none_mode_appears_with_zero() {
        let records = vec![
            ExecutionRecord::idle(1, 0, 10, vec!["a"]),
            ExecutionRecord::idle(1, 5, 15, vec!["b"]),
        ];
        let trace = Trace::try_from(records.as_slice()).expect("well-formed");
        let overlaps = detect_overlaps(&trace);
        let accesses = aggregate_accesses(&trace, &overlaps.pairs);
        assert_eq!(accesses["a"], AccessCounts::default());
        assert_eq!(accesses["b"], AccessCounts::default());
    }

    #[test]
    fn test_aggregate_conflicts() {
        let records = vec![
            ExecutionRecord::write(1, 0, 10, vec!["a", "b"]),
            ExecutionRecord::write(1, 1, 9, vec!["a", "b"]),
            ExecutionRecord::write(1, 2, 8, vec!["a"]),
        ];
        let trace = Trace::try_from(records.as_slice()).expect("well-formed");
        let overlaps = detect_overlaps(&trace);
        let conflicts = classify_conflicts(&trace, &overlaps.pairs);
        let per_resource = aggregate_conflicts(&conflicts);
        assert_eq!(per_resource["a"], 3);
        assert_eq!(per_resource["b"], 1);
    }

    #[test]
    fn test_empty_inputs() {
        let records: Vec<ExecutionRecord<&str, u64>> = vec![];
        let trace = Trace::try_from(records.as_slice()).expect("well-formed");
        assert!(aggregate_accesses(&trace, &[]).is_empty());
        assert!(aggregate_conflicts::<&str>(&[]).is_empty());
    }
}

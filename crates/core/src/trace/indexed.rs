//! The ingestion boundary of the analysis.
//!
//! A [`Trace`] borrows the caller's records, assigns each one a [`RecordId`]
//! (its input position), and converts its resource sequence into a set once.
//! Every later stage compares those sets instead of rebuilding them per pair.

use alloc::vec::Vec;
use core::hash::Hash;
use core::ops::Index;

use hashbrown::HashSet;

use crate::trace::error::Error;
use crate::trace::types::{ExecutionRecord, RecordId};

/// A record together with its identity and deduplicated resource set.
#[derive(Debug)]
pub struct TraceEntry<'a, Resource, Time>
where
    Resource: Eq + Hash,
{
    pub id: RecordId,
    pub record: &'a ExecutionRecord<Resource, Time>,
    pub resource_set: HashSet<&'a Resource>,
}

impl<Resource, Time> TraceEntry<'_, Resource, Time>
where
    Resource: Eq + Hash,
{
    /// Number of resources as declared by the source, duplicates included.
    #[must_use]
    pub fn declared_resources(&self) -> usize {
        self.record.resources.len()
    }
}

/// Validated, indexed view over the records of one analysis run.
///
/// Constructed via `TryFrom<&[ExecutionRecord]>`, which rejects any record
/// whose interval ends before it starts.
#[derive(Debug)]
pub struct Trace<'a, Resource, Time>
where
    Resource: Eq + Hash,
{
    entries: Vec<TraceEntry<'a, Resource, Time>>,
}

impl<'a, Resource, Time> TryFrom<&'a [ExecutionRecord<Resource, Time>]>
    for Trace<'a, Resource, Time>
where
    Resource: Eq + Hash,
    Time: Ord + Clone,
{
    type Error = Error<Time>;

    fn try_from(records: &'a [ExecutionRecord<Resource, Time>]) -> Result<Self, Self::Error> {
        let entries = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let id = RecordId(index);
                if !record.is_well_formed() {
                    return Err(Error::MalformedRecord {
                        id,
                        process_id: record.process_id,
                        start: record.start.clone(),
                        end: record.end.clone(),
                    });
                }
                Ok(TraceEntry {
                    id,
                    record,
                    resource_set: record.resources.iter().collect(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }
}

impl<'a, Resource, Time> Trace<'a, Resource, Time>
where
    Resource: Eq + Hash,
{
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[TraceEntry<'a, Resource, Time>] {
        &self.entries
    }

    /// Looks up the entry with the given id.
    ///
    /// Ids handed out by this trace are always in range; `None` only for ids
    /// that belong to a different trace.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&TraceEntry<'a, Resource, Time>> {
        self.entries.get(id.index())
    }

    /// The original record behind `id`.
    #[must_use]
    pub fn record(&self, id: RecordId) -> Option<&'a ExecutionRecord<Resource, Time>> {
        self.get(id).map(|entry| entry.record)
    }
}

/// # Panics
///
/// Panics if `id` was not handed out by this trace.
impl<'a, Resource, Time> Index<RecordId> for Trace<'a, Resource, Time>
where
    Resource: Eq + Hash,
{
    type Output = TraceEntry<'a, Resource, Time>;

    fn index(&self, id: RecordId) -> &Self::Output {
        &self.entries[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_assigns_positional_ids() {
        let records = vec![
            ExecutionRecord::write(1, 0, 10, vec!["a"]),
            ExecutionRecord::write(1, 0, 10, vec!["a"]),
        ];
        let trace = Trace::try_from(records.as_slice()).expect("well-formed");
        assert_eq!(trace.len(), 2);
        let ids: Vec<RecordId> = trace.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![RecordId(0), RecordId(1)]);
        // structurally equal records are still two entries
        assert_ne!(trace.entries()[0].id, trace.entries()[1].id);
    }

    #[test]
    fn test_ingest_deduplicates_resources() {
        let records = vec![ExecutionRecord::read(1, 0, 1, vec!["a", "b", "a", "a"])];
        let trace = Trace::try_from(records.as_slice()).expect("well-formed");
        let entry = &trace.entries()[0];
        assert_eq!(entry.resource_set.len(), 2);
        assert_eq!(entry.declared_resources(), 4);
    }

    #[test]
    fn test_ingest_rejects_reversed_interval() {
        let records = vec![
            ExecutionRecord::write(1, 0, 10, vec!["a"]),
            ExecutionRecord::write(9, 20, 15, vec!["a"]),
        ];
        let err = Trace::try_from(records.as_slice()).expect_err("end before start");
        assert_eq!(
            err,
            Error::MalformedRecord {
                id: RecordId(1),
                process_id: 9,
                start: 20,
                end: 15,
            }
        );
        assert!(err.to_string().contains("malformed record #1"));
    }

    #[test]
    fn test_ingest_empty() {
        let records: Vec<ExecutionRecord<&str, u64>> = vec![];
        let trace = Trace::try_from(records.as_slice()).expect("empty is fine");
        assert!(trace.is_empty());
        assert!(trace.get(RecordId(0)).is_none());
    }

    #[test]
    fn test_record_lookup() {
        let records = vec![ExecutionRecord::idle(4, 1, 2, vec!["x"])];
        let trace = Trace::try_from(records.as_slice()).expect("well-formed");
        assert_eq!(trace.record(RecordId(0)), Some(&records[0]));
        assert_eq!(trace[RecordId(0)].resource_set.len(), 1);
    }
}

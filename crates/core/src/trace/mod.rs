pub mod display;
pub mod error;
pub mod indexed;
pub mod types;

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::iter::Sum;
use core::ops::Sub;

pub use display::format_trace;

use crate::trace::types::{ExecutionRecord, ProcessId};

/// Which processes a set of records covers.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessCensus {
    /// Total number of records seen.
    pub count: usize,
    /// Every process id that occurs at least once.
    pub distinct: BTreeSet<ProcessId>,
    /// The process id of every record, in input order.
    pub all: Vec<ProcessId>,
}

impl ProcessCensus {
    /// Number of records per process id.
    #[must_use]
    pub fn frequencies(&self) -> BTreeMap<ProcessId, usize> {
        let mut frequencies = BTreeMap::new();
        for pid in &self.all {
            *frequencies.entry(*pid).or_insert(0) += 1;
        }
        frequencies
    }

    #[must_use]
    pub fn contains(&self, process_id: ProcessId) -> bool {
        self.distinct.contains(&process_id)
    }
}

/// Count the records and collect the process ids they belong to.
#[must_use]
pub fn census<Resource, Time>(records: &[ExecutionRecord<Resource, Time>]) -> ProcessCensus {
    let all: Vec<ProcessId> = records.iter().map(|record| record.process_id).collect();
    ProcessCensus {
        count: records.len(),
        distinct: all.iter().copied().collect(),
        all,
    }
}

/// Keep only the records of `process_id`, preserving input order.
///
/// The analysis never filters on its own; callers run this before
/// [`analyze`](crate::analysis::analyze).
#[must_use]
pub fn filter_by_process<Resource, Time>(
    records: &[ExecutionRecord<Resource, Time>],
    process_id: ProcessId,
) -> Vec<ExecutionRecord<Resource, Time>>
where
    Resource: Clone,
    Time: Clone,
{
    records
        .iter()
        .filter(|record| record.process_id == process_id)
        .cloned()
        .collect()
}

/// Sum of `end - start` over all records.
#[must_use]
pub fn total_runtime<Resource, Time, Span>(records: &[ExecutionRecord<Resource, Time>]) -> Span
where
    Time: Clone + Sub<Output = Span>,
    Span: Sum<Span>,
{
    records
        .iter()
        .map(|record| record.end.clone() - record.start.clone())
        .sum()
}

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use self::aggregate::{aggregate_accesses, aggregate_conflicts};
use self::conflict::{classify_conflicts, ConflictEntry};
use self::error::Error;
use self::overlap::{detect_overlaps, OverlapPair, Overlaps};
use self::summary::{merge_summary, ResourceSummary};
use crate::trace::indexed::Trace;
use crate::trace::types::ExecutionRecord;

pub mod aggregate;
pub mod conflict;
pub mod error;
pub mod overlap;
pub mod summary;

pub use aggregate::AccessCounts;
pub use summary::ResourceStats;

/// Everything the analysis of one process produces.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "Resource: Ord + ::serde::Deserialize<'de>"))
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis<Resource> {
    /// Number of records analysed.
    pub records: usize,
    /// Overlapping pairs, in generation order.
    pub overlaps: Vec<OverlapPair>,
    /// Diagnostic resource volume over all examined pairs; see [`Overlaps`].
    pub total_resource_accesses: usize,
    /// Write-write conflicts, in overlap order.
    pub conflicts: Vec<ConflictEntry<Resource>>,
    /// Per-resource reads, writes and conflicts.
    pub summary: ResourceSummary<Resource>,
}

impl<Resource> Analysis<Resource>
where
    Resource: Ord,
{
    #[must_use]
    pub fn is_conflict_free(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Analyse the execution records of one process.
///
/// `records` should all share one process id; the analysis does not filter
/// them (see [`filter_by_process`](crate::trace::filter_by_process)). Mixed
/// processes are not rejected, but the result is meaningless.
///
/// The pipeline ingests the records into a [`Trace`], detects every
/// overlapping pair, classifies write-write conflicts, aggregates accesses and
/// conflicts per resource, and merges both aggregates into a
/// [`ResourceSummary`]. Runtime is dominated by the quadratic overlap scan.
///
/// An empty slice is valid and yields an empty [`Analysis`].
///
/// # Errors
///
/// Returns [`Error::Ingest`] if a record ends before it starts.
///
/// Returns [`Error::Invariant`] if the aggregates disagree about which
/// resources exist; this indicates a defect in the analysis itself.
pub fn analyze<Resource, Time>(
    records: &[ExecutionRecord<Resource, Time>],
) -> Result<Analysis<Resource>, Error<Resource, Time>>
where
    Resource: Eq + Hash + Clone + Ord + Debug,
    Time: Ord + Clone,
{
    tracing::debug!(records = records.len(), "analyzing trace");

    let trace = Trace::try_from(records)?;
    let overlaps = detect_overlaps(&trace);
    summarize(&trace, overlaps)
}

/// [`analyze`] with the overlap scan sharded across the rayon thread pool.
///
/// Produces exactly the same [`Analysis`] as [`analyze`].
///
/// # Errors
///
/// Same as [`analyze`].
#[cfg(feature = "parallel")]
pub fn analyze_parallel<Resource, Time>(
    records: &[ExecutionRecord<Resource, Time>],
) -> Result<Analysis<Resource>, Error<Resource, Time>>
where
    Resource: Eq + Hash + Clone + Ord + Debug + Sync,
    Time: Ord + Clone + Sync,
{
    tracing::debug!(
        records = records.len(),
        threads = rayon::current_num_threads(),
        "analyzing trace in parallel"
    );

    let trace = Trace::try_from(records)?;
    let overlaps = overlap::detect_overlaps_parallel(&trace);
    summarize(&trace, overlaps)
}

/// Every stage after the overlap scan.
fn summarize<Resource, Time>(
    trace: &Trace<'_, Resource, Time>,
    overlaps: Overlaps,
) -> Result<Analysis<Resource>, Error<Resource, Time>>
where
    Resource: Eq + Hash + Clone + Ord + Debug,
{
    let Overlaps {
        pairs,
        total_resource_accesses,
    } = overlaps;
    tracing::debug!(
        overlaps = pairs.len(),
        total_resource_accesses,
        "overlap scan finished"
    );

    let conflicts = classify_conflicts(trace, &pairs);
    tracing::debug!(
        conflicts = conflicts.len(),
        "write-write conflicts classified"
    );

    let accesses = aggregate_accesses(trace, &pairs);
    let conflicts_per_resource = aggregate_conflicts(&conflicts);
    let summary = merge_summary(&accesses, &conflicts_per_resource)?;
    tracing::debug!(resources = summary.len(), "resource summary merged");

    Ok(Analysis {
        records: trace.len(),
        overlaps: pairs,
        total_resource_accesses,
        conflicts,
        summary,
    })
}

//! Resource-conflict detection for overlapping process executions.
//!
//! `tracecop_core` analyses the execution records of one logical process and
//! reports where overlapping executions may corrupt shared state. Each record
//! carries a time interval, the resources it touched, and a single
//! [`AccessMode`](trace::types::AccessMode) for all of them.
//!
//! The analysis is a strictly left-to-right pipeline:
//!
//! 1. **Ingestion** -- records become a [`Trace`](trace::indexed::Trace): each
//!    record gets an index-based identity and its resource sequence is turned
//!    into a set once, up front.
//! 2. **Overlap detection** -- every unordered pair of records is compared with
//!    a closed-interval test. This is the dominant, quadratic step.
//! 3. **Conflict classification** -- an overlapping pair is a conflict when
//!    both records write and they share at least one resource.
//! 4. **Aggregation** -- read/write counts over the records taking part in an
//!    overlap, and conflict counts over the conflicting pairs.
//! 5. **Summary** -- both aggregates merged into a per-resource
//!    `(reads, writes, conflicts)` table.
//!
//! # Entry point
//!
//! The main entry point is [`analyze()`], which takes the records of one
//! process and returns an [`Analysis`], or an
//! [`Error`](analysis::error::Error) if a record is malformed.
//!
//! ```rust
//! use tracecop_core::analyze;
//! use tracecop_core::trace::types::ExecutionRecord;
//!
//! let records = vec![
//!     ExecutionRecord::write(7, 0u64, 10, vec!["f1"]),
//!     ExecutionRecord::write(7, 5, 15, vec!["f1"]),
//! ];
//! let analysis = analyze(&records)?;
//! assert_eq!(analysis.conflicts.len(), 1);
//! assert_eq!(analysis.summary.get(&"f1").map(|s| s.conflicts), Some(1));
//! # Ok::<(), tracecop_core::analysis::error::Error<&str, u64>>(())
//! ```
//!
//! Selecting the records of one process is the caller's job; see
//! [`trace::filter_by_process`].
//!
//! # Crate features
//!
//! - **`serde`** -- enables `Serialize`/`Deserialize` derives on the record,
//!   pair, conflict and summary types.
//! - **`schemars`** -- enables `JsonSchema` derives on the input types.
//! - **`parallel`** -- enables [`analysis::analyze_parallel`], which shards the
//!   pairwise scan with rayon.
//!
//! Without `parallel` this crate is `no_std` compatible (requires `alloc`).

#![cfg_attr(not(any(test, feature = "parallel", feature = "schemars")), no_std)]
extern crate alloc;

pub mod analysis;
pub mod trace;

pub use analysis::{analyze, Analysis};

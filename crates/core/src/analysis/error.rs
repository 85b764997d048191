use core::fmt::{Debug, Display, Formatter, Result};

use derive_more::From;

use crate::trace::error::Error as TraceError;

/// A resource was counted in a conflict but never as an access.
///
/// Every conflicting resource comes from a record that takes part in an
/// overlap, so this only happens when the pipeline itself is broken.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaccountedConflict<Resource> {
    pub resource: Resource,
    pub conflicts: u64,
}

/// Error returned when a trace cannot be analysed.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum Error<Resource, Time> {
    /// A record could not be ingested (e.g. it ends before it starts).
    Ingest(TraceError<Time>),
    /// Internal invariant violation while merging the per-resource aggregates.
    Invariant(UnaccountedConflict<Resource>),
}

impl<Resource, Time> Display for Error<Resource, Time>
where
    Resource: Debug,
    Time: Debug,
{
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Ingest(err) => write!(f, "{err}"),
            Self::Invariant(UnaccountedConflict {
                resource,
                conflicts,
            }) => write!(
                f,
                "internal error: resource {resource:?} has {conflicts} conflict(s) but no recorded access"
            ),
        }
    }
}

use core::fmt::{Debug, Display, Formatter, Result};

use crate::trace::types::{ProcessId, RecordId};

/// Error ingesting raw execution records into a [`Trace`](super::indexed::Trace).
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error<Time> {
    /// The record ends before it starts.
    MalformedRecord {
        id: RecordId,
        process_id: ProcessId,
        start: Time,
        end: Time,
    },
}

impl<Time> Display for Error<Time>
where
    Time: Debug,
{
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Self::MalformedRecord {
                id,
                process_id,
                start,
                end,
            } => write!(
                f,
                "malformed record {id} of process {process_id}: ends at {end:?} before it starts at {start:?}"
            ),
        }
    }
}

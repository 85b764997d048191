use alloc::vec::Vec;
use core::fmt::{Debug, Display, Formatter, Result};

/// Identifier of the logical process a record belongs to.
///
/// Assigned by whatever produced the trace and stable across every execution
/// of the same process; never generated by this crate.
pub type ProcessId = u64;

/// The access discipline a record applies to all of its resources.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessMode {
    #[cfg_attr(feature = "serde", serde(rename = "r"))]
    Read,
    #[cfg_attr(feature = "serde", serde(rename = "w"))]
    Write,
    /// The record touched its resources without reading or writing them.
    #[cfg_attr(feature = "serde", serde(rename = "n"))]
    None,
}

impl AccessMode {
    /// Single-letter code used by the text and JSON trace formats.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Read => 'r',
            Self::Write => 'w',
            Self::None => 'n',
        }
    }

    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'r' => Some(Self::Read),
            'w' => Some(Self::Write),
            'n' => Some(Self::None),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl Display for AccessMode {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}", self.code())
    }
}

/// One timestamped, resource-tagged execution of a process.
///
/// `resources` keeps the order and any duplicates of the source; the analysis
/// treats it as a set wherever resources of two records are compared.
/// Records are expected to satisfy `start <= end`.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ExecutionRecord<Resource, Time> {
    pub process_id: ProcessId,
    pub start: Time,
    pub end: Time,
    pub resources: Vec<Resource>,
    pub mode: AccessMode,
}

impl<Resource, Time> ExecutionRecord<Resource, Time> {
    #[must_use]
    pub const fn new(
        process_id: ProcessId,
        start: Time,
        end: Time,
        resources: Vec<Resource>,
        mode: AccessMode,
    ) -> Self {
        Self {
            process_id,
            start,
            end,
            resources,
            mode,
        }
    }

    #[must_use]
    pub const fn read(
        process_id: ProcessId,
        start: Time,
        end: Time,
        resources: Vec<Resource>,
    ) -> Self {
        Self::new(process_id, start, end, resources, AccessMode::Read)
    }

    #[must_use]
    pub const fn write(
        process_id: ProcessId,
        start: Time,
        end: Time,
        resources: Vec<Resource>,
    ) -> Self {
        Self::new(process_id, start, end, resources, AccessMode::Write)
    }

    #[must_use]
    pub const fn idle(
        process_id: ProcessId,
        start: Time,
        end: Time,
        resources: Vec<Resource>,
    ) -> Self {
        Self::new(process_id, start, end, resources, AccessMode::None)
    }
}

impl<Resource, Time> ExecutionRecord<Resource, Time>
where
    Time: Ord,
{
    /// Returns `true` if the record does not end before it starts.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }

    /// Closed-interval overlap test: touching endpoints count as overlapping.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        intervals_overlap(&self.start, &self.end, &other.start, &other.end)
    }
}

/// Returns `true` if `[start1, end1]` and `[start2, end2]` intersect.
#[must_use]
pub fn intervals_overlap<Time: Ord>(
    start1: &Time,
    end1: &Time,
    start2: &Time,
    end2: &Time,
) -> bool {
    start1 <= end2 && end1 >= start2
}

impl<Resource, Time> Debug for ExecutionRecord<Resource, Time>
where
    Resource: Debug,
    Time: Debug,
{
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "#{}[{:?}..{:?}]{}{:?}",
            self.process_id, self.start, self.end, self.mode, self.resources
        )
    }
}

/// Compact text form: `<pid> <start>..<end> <mode> {<resource> ...}`.
impl<Resource, Time> Display for ExecutionRecord<Resource, Time>
where
    Resource: Display,
    Time: Display,
{
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "{} {}..{} {} {{",
            self.process_id, self.start, self.end, self.mode
        )?;
        for (i, resource) in self.resources.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{resource}")?;
        }
        write!(f, "}}")
    }
}

/// Identity of a record within one analysed trace: its position in the input.
///
/// Two records with identical fields are still distinct events and carry
/// distinct ids.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub usize);

impl RecordId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_mode_codes() {
        for mode in [AccessMode::Read, AccessMode::Write, AccessMode::None] {
            assert_eq!(AccessMode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(AccessMode::from_code('x'), None);
        assert!(AccessMode::Write.is_write());
        assert!(!AccessMode::Read.is_write());
    }

    #[test]
    fn test_intervals_overlap_closed() {
        assert!(intervals_overlap(&0, &10, &5, &15));
        assert!(intervals_overlap(&5, &15, &0, &10));
        // touching endpoints
        assert!(intervals_overlap(&0, &10, &10, &20));
        assert!(!intervals_overlap(&0, &10, &11, &20));
        // containment
        assert!(intervals_overlap(&0, &100, &40, &60));
        // zero-length interval
        assert!(intervals_overlap(&5, &5, &0, &10));
    }

    #[test]
    fn test_record_constructors() {
        let record = ExecutionRecord::write(3, 1, 2, vec!["a"]);
        assert_eq!(record.mode, AccessMode::Write);
        assert_eq!(
            ExecutionRecord::read(3, 1, 2, vec!["a"]).mode,
            AccessMode::Read
        );
        assert_eq!(
            ExecutionRecord::idle(3, 1, 2, vec!["a"]).mode,
            AccessMode::None
        );
        assert!(record.is_well_formed());
        assert!(!ExecutionRecord::write(3, 2, 1, vec!["a"]).is_well_formed());
    }

    #[test]
    fn test_record_debug() {
        let record = ExecutionRecord::write(3, 1, 2, vec!["a", "b"]);
        assert_eq!(format!("{record:?}"), "#3[1..2]w[\"a\", \"b\"]");
    }

    #[test]
    fn test_record_display() {
        let record = ExecutionRecord::read(3, 1, 2, vec!["a", "b"]);
        assert_eq!(record.to_string(), "3 1..2 r {a b}");
        let empty: ExecutionRecord<&str, u64> = ExecutionRecord::idle(4, 0, 0, vec![]);
        assert_eq!(empty.to_string(), "4 0..0 n {}");
    }
}

use alloc::collections::btree_map::{self, BTreeMap};
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::analysis::aggregate::AccessCounts;
use crate::analysis::error::UnaccountedConflict;

/// Reads, writes and conflicts recorded for one resource.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ResourceStats {
    pub reads: u64,
    pub writes: u64,
    pub conflicts: u64,
}

/// Per-resource view of an analysis, ordered by resource.
///
/// Every resource declared by a record that takes part in an overlap has an
/// entry; `conflicts` is zero unless the resource is shared by at least one
/// conflicting pair.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "Resource: Ord + ::serde::Deserialize<'de>"))
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSummary<Resource>(pub BTreeMap<Resource, ResourceStats>);

impl<Resource> Default for ResourceSummary<Resource>
where
    Resource: Ord,
{
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<Resource> ResourceSummary<Resource>
where
    Resource: Ord,
{
    #[must_use]
    pub fn get(&self, resource: &Resource) -> Option<&ResourceStats> {
        self.0.get(resource)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Resource, ResourceStats> {
        self.0.iter()
    }

    /// Column sums over all resources.
    #[must_use]
    pub fn totals(&self) -> ResourceStats {
        self.0
            .values()
            .fold(ResourceStats::default(), |acc, stats| ResourceStats {
                reads: acc.reads + stats.reads,
                writes: acc.writes + stats.writes,
                conflicts: acc.conflicts + stats.conflicts,
            })
    }
}

impl<'a, Resource> IntoIterator for &'a ResourceSummary<Resource>
where
    Resource: Ord,
{
    type Item = (&'a Resource, &'a ResourceStats);
    type IntoIter = btree_map::Iter<'a, Resource, ResourceStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Merge the access and conflict aggregates into one table.
///
/// Every key of `accesses` is emitted; resources without an entry in
/// `conflicts` get a conflict count of zero.
///
/// # Errors
///
/// Returns [`UnaccountedConflict`] if `conflicts` names a resource that
/// `accesses` does not. When several do, the smallest one is reported.
pub fn merge_summary<Resource>(
    accesses: &HashMap<Resource, AccessCounts>,
    conflicts: &HashMap<Resource, u64>,
) -> Result<ResourceSummary<Resource>, UnaccountedConflict<Resource>>
where
    Resource: Eq + Hash + Clone + Ord + Debug,
{
    if let Some((resource, count)) = conflicts
        .iter()
        .filter(|(resource, _)| !accesses.contains_key(*resource))
        .min_by(|a, b| a.0.cmp(b.0))
    {
        tracing::error!(
            ?resource,
            conflicts = count,
            "conflicting resource has no recorded access"
        );
        return Err(UnaccountedConflict {
            resource: resource.clone(),
            conflicts: *count,
        });
    }

    let summary = accesses
        .iter()
        .map(|(resource, counts)| {
            (
                resource.clone(),
                ResourceStats {
                    reads: counts.reads,
                    writes: counts.writes,
                    conflicts: conflicts.get(resource).copied().unwrap_or(0),
                },
            )
        })
        .collect();

    Ok(ResourceSummary(summary))
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    const fn counts(reads: u64, writes: u64) -> AccessCounts {
        AccessCounts { reads, writes }
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("capture lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_merge_defaults_to_zero() {
        let accesses = HashMap::from([("a", counts(1, 2)), ("b", counts(3, 0))]);
        let conflicts = HashMap::from([("a", 1)]);

        let summary = merge_summary(&accesses, &conflicts).expect("consistent aggregates");
        assert_eq!(summary.len(), 2);
        assert_eq!(
            summary.get(&"a"),
            Some(&ResourceStats {
                reads: 1,
                writes: 2,
                conflicts: 1
            })
        );
        assert_eq!(
            summary.get(&"b"),
            Some(&ResourceStats {
                reads: 3,
                writes: 0,
                conflicts: 0
            })
        );
    }

    #[test]
    fn test_merge_rejects_unaccounted_conflict() {
        let accesses = HashMap::from([("a", counts(0, 2))]);
        let conflicts = HashMap::from([("z", 4), ("a", 1), ("y", 2)]);

        let err = merge_summary(&accesses, &conflicts).expect_err("y and z were never accessed");
        assert_eq!(
            err,
            UnaccountedConflict {
                resource: "y",
                conflicts: 2
            }
        );
    }

    #[test]
    fn test_unaccounted_conflict_is_logged_with_resource() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .finish();

        let accesses = HashMap::from([("a", counts(0, 2))]);
        let conflicts = HashMap::from([("ghost", 3)]);
        let merge = || merge_summary(&accesses, &conflicts);
        let result = tracing::subscriber::with_default(subscriber, merge);
        assert!(result.is_err());

        let output = capture.0.lock().expect("capture lock").clone();
        let output = String::from_utf8(output).expect("utf-8 log output");
        assert!(output.contains("ERROR"), "{output}");
        assert!(output.contains("resource=\"ghost\""), "{output}");
        assert!(output.contains("conflicts=3"), "{output}");
    }

    #[test]
    fn test_merge_empty() {
        let summary = merge_summary::<&str>(&HashMap::new(), &HashMap::new()).expect("empty");
        assert!(summary.is_empty());
        assert_eq!(summary.totals(), ResourceStats::default());
    }

    #[test]
    fn test_summary_is_sorted_and_totals() {
        let accesses = HashMap::from([
            ("c", counts(1, 0)),
            ("a", counts(0, 2)),
            ("b", counts(4, 1)),
        ]);
        let conflicts = HashMap::from([("a", 1)]);
        let summary = merge_summary(&accesses, &conflicts).expect("consistent aggregates");

        let keys: Vec<&str> = summary.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(
            summary.totals(),
            ResourceStats {
                reads: 5,
                writes: 3,
                conflicts: 1
            }
        );
    }
}

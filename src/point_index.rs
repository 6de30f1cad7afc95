use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::interval_tree::{Interval, IntervalId};

/// An ordered index over interval boundary values.
///
/// Every distinct boundary value maps to the intervals owning it, so
/// numerically equal boundaries contributed by different intervals fuse into
/// a single point. A degenerate interval (`start == end`) contributes its
/// boundary once, keeping each owner list free of duplicates.
#[derive(Clone, Debug, Default)]
pub(crate) struct PointIndex<K> {
    points: BTreeMap<K, Vec<IntervalId>>,
}

impl<K> PointIndex<K>
where
    K: Ord + Copy,
{
    /// Indexes the start and end boundaries of every interval in the arena.
    pub fn build<V>(arena: &[Interval<K, V>]) -> Self {
        let mut points: BTreeMap<K, Vec<IntervalId>> = BTreeMap::new();
        for (id, interval) in arena.iter().enumerate() {
            points.entry(interval.start()).or_default().push(id);
            if interval.end() != interval.start() {
                points.entry(interval.end()).or_default().push(id);
            }
        }
        PointIndex { points }
    }

    /// Iterates over the boundary points falling within the closed `range`,
    /// yielding the owners of each point in ascending value order.
    ///
    /// Output sensitive: `O(log n + k)` for `k` points yielded.
    ///
    /// # Panics
    ///
    /// Panics if the range is reversed (`start > end`).
    pub fn range_search(&self, range: RangeInclusive<K>) -> impl Iterator<Item = &[IntervalId]> + '_ {
        self.points.range(range).map(|(_, owners)| owners.as_slice())
    }

    /// Looks up the owners of the exact boundary `value`, if any interval has one there.
    #[cfg(test)]
    pub fn owners_at(&self, value: &K) -> Option<&[IntervalId]> {
        self.points.get(value).map(Vec::as_slice)
    }
}

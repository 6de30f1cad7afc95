use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::node::{self, Node};
use crate::point_index::PointIndex;

/// Stable identity of an interval inside an [`IntervalTree`]: its slot in the
/// arena the index was built from. Two intervals with equal bounds occupy
/// distinct slots and therefore stay distinct entities.
pub(crate) type IntervalId = usize;

/// A closed interval `[start, end]` carrying an opaque payload.
///
/// The payload is never inspected by the index; it is handed back untouched
/// by queries.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interval<K, V> {
    start: K,
    end: K,
    payload: V,
}

impl<K, V> Interval<K, V> {
    /// Creates a new closed interval.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    pub fn new(start: K, end: K, payload: V) -> Interval<K, V>
    where
        K: Ord,
    {
        assert!(start <= end, "interval: start must not exceed end");
        Interval {
            start,
            end,
            payload,
        }
    }

    /// The lower boundary of the interval.
    pub fn start(&self) -> K
    where
        K: Copy,
    {
        self.start
    }

    /// The upper boundary of the interval.
    pub fn end(&self) -> K
    where
        K: Copy,
    {
        self.end
    }

    /// The payload attached at construction.
    pub fn payload(&self) -> &V {
        &self.payload
    }

    /// Whether `x` falls within the closed interval.
    pub fn contains(&self, x: K) -> bool
    where
        K: Ord,
    {
        self.start <= x && x <= self.end
    }

    /// Ascending by start, ties broken ascending by end.
    pub(crate) fn cmp_by_start(&self, other: &Self) -> Ordering
    where
        K: Ord,
    {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }

    /// Descending by end, ties broken descending by start.
    pub(crate) fn cmp_by_end(&self, other: &Self) -> Ordering
    where
        K: Ord,
    {
        other
            .end
            .cmp(&self.end)
            .then_with(|| other.start.cmp(&self.start))
    }
}

impl<K, V> fmt::Display for Interval<K, V>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[ {} - {} ]", self.start, self.end)
    }
}

/// A static index over a collection of closed intervals.
///
/// Built once by [`IntervalTree::new`] and read-only afterwards. Two
/// substructures are kept over the same interval arena: a centered interval
/// tree answering point queries, and an ordered index over boundary points
/// whose range scans, merged with one point query, answer range-intersection
/// queries. Both run in `O(log n + k)` for `k` results.
#[derive(Clone, Debug, Default)]
pub struct IntervalTree<K, V> {
    intervals: Vec<Interval<K, V>>,
    root: Option<Box<Node<K>>>,
    points: PointIndex<K>,
}

impl<K, V> IntervalTree<K, V>
where
    K: Ord + Copy,
{
    /// Builds the index over `intervals`, in `O(n log n)`.
    ///
    /// An empty list is valid; every query on the resulting index returns
    /// an empty vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use centered_interval_tree::{Interval, IntervalTree};
    ///
    /// let tree = IntervalTree::new(vec![
    ///     Interval::new(1, 5, "a"),
    ///     Interval::new(10, 15, "b"),
    ///     Interval::new(3, 12, "c"),
    /// ]);
    /// assert_eq!(tree.len(), 3);
    /// ```
    pub fn new(intervals: Vec<Interval<K, V>>) -> IntervalTree<K, V> {
        let ids: Vec<IntervalId> = (0..intervals.len()).collect();
        let root = node::build(ids, &intervals);
        let points = PointIndex::build(&intervals);

        IntervalTree {
            intervals,
            root,
            points,
        }
    }

    /// The number of intervals indexed.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether the index holds no interval.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Returns every interval containing the point `x`, without duplicates.
    ///
    /// Output sensitive: `O(log n + k)` for `k` returned intervals.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use centered_interval_tree::{Interval, IntervalTree};
    ///
    /// let tree = IntervalTree::new(vec![
    ///     Interval::new(1, 5, "a"),
    ///     Interval::new(10, 15, "b"),
    ///     Interval::new(3, 12, "c"),
    /// ]);
    ///
    /// let mut hits: Vec<&str> = tree.containing(4).iter().map(|i| *i.payload()).collect();
    /// hits.sort_unstable();
    /// assert_eq!(hits, ["a", "c"]);
    /// assert!(tree.containing(20).is_empty());
    /// ```
    pub fn containing(&self, x: K) -> Vec<&Interval<K, V>> {
        let mut hits = Vec::new();
        if let Some(ref root) = self.root {
            root.stab(x, &self.intervals, &mut hits);
        }
        hits.into_iter().map(|id| &self.intervals[id]).collect()
    }

    /// Returns every interval intersecting the closed `range` — partially
    /// overlapping, fully contained, touching an edge, or enclosing the whole
    /// range — without duplicates, in `O(log n + k)`.
    ///
    /// # Panics
    ///
    /// Panics if the range is reversed (`start > end`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use centered_interval_tree::{Interval, IntervalTree};
    ///
    /// let tree = IntervalTree::new(vec![
    ///     Interval::new(0, 100, "wide"),
    ///     Interval::new(10, 20, "low"),
    ///     Interval::new(90, 110, "high"),
    ///     Interval::new(200, 300, "far"),
    /// ]);
    ///
    /// let hits = tree.intersecting(50..=60);
    /// assert_eq!(hits.len(), 1);
    /// assert_eq!(*hits[0].payload(), "wide");
    /// ```
    pub fn intersecting(&self, range: RangeInclusive<K>) -> Vec<&Interval<K, V>> {
        let mut seen = HashSet::new();
        let mut hits = Vec::new();

        // Any interval with a boundary inside the range overlaps it partially,
        // is contained in it, or touches one of its edges.
        for owners in self.points.range_search(range.clone()) {
            for &id in owners {
                if seen.insert(id) {
                    hits.push(id);
                }
            }
        }

        // The one remaining case: intervals enclosing the whole range. They
        // have no boundary inside it but all of them contain its start.
        let mut enclosing = Vec::new();
        if let Some(ref root) = self.root {
            root.stab(*range.start(), &self.intervals, &mut enclosing);
        }
        for id in enclosing {
            if seen.insert(id) {
                hits.push(id);
            }
        }

        hits.into_iter().map(|id| &self.intervals[id]).collect()
    }
}

impl<K, V> fmt::Display for IntervalTree<K, V>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.root {
            Some(ref root) => write!(f, "{}", root),
            None => write!(f, "Empty tree"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn tree_over(bounds: &[(i64, i64)]) -> IntervalTree<i64, usize> {
        IntervalTree::new(
            bounds
                .iter()
                .enumerate()
                .map(|(id, &(start, end))| Interval::new(start, end, id))
                .collect(),
        )
    }

    fn payloads(hits: Vec<&Interval<i64, usize>>) -> Vec<usize> {
        let mut ids: Vec<usize> = hits.iter().map(|i| *i.payload()).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn containing_finds_exactly_the_spanning_intervals() {
        let tree = tree_over(&[(1, 5), (10, 15), (3, 12)]);

        assert_eq!(payloads(tree.containing(4)), vec![0, 2]);
        assert_eq!(payloads(tree.containing(11)), vec![1, 2]);
        assert!(tree.containing(20).is_empty());
    }

    #[test]
    fn containing_includes_boundaries() {
        let tree = tree_over(&[(1, 5), (5, 9)]);

        assert_eq!(payloads(tree.containing(5)), vec![0, 1]);
        assert_eq!(payloads(tree.containing(1)), vec![0]);
        assert_eq!(payloads(tree.containing(9)), vec![1]);
        assert!(tree.containing(0).is_empty());
        assert!(tree.containing(10).is_empty());
    }

    #[test]
    fn intersecting_finds_an_enclosing_interval() {
        let tree = tree_over(&[(0, 100), (10, 20), (90, 110), (200, 300)]);
        assert_eq!(payloads(tree.intersecting(50..=60)), vec![0]);
    }

    #[test]
    fn intersecting_finds_boundary_overlaps() {
        let tree = tree_over(&[(5, 15), (20, 30)]);
        assert_eq!(payloads(tree.intersecting(10..=25)), vec![0, 1]);
    }

    #[test]
    fn intersecting_includes_edge_touches() {
        let tree = tree_over(&[(5, 10), (15, 20)]);

        assert_eq!(payloads(tree.intersecting(10..=15)), vec![0, 1]);
        assert_eq!(payloads(tree.intersecting(0..=5)), vec![0]);
        assert!(tree.intersecting(11..=14).is_empty());
    }

    #[test]
    fn intersecting_returns_each_interval_once() {
        // Both boundaries inside the range, plus a containing(start) hit.
        let tree = tree_over(&[(2, 4), (0, 100), (3, 3)]);
        assert_eq!(payloads(tree.intersecting(0..=50)), vec![0, 1, 2]);
    }

    #[test]
    fn empty_index_answers_every_query_with_nothing() {
        let tree = tree_over(&[]);

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.containing(42).is_empty());
        assert!(tree.intersecting(0..=1_000).is_empty());
    }

    #[test]
    fn equal_bounds_stay_distinct_entities() {
        let tree = tree_over(&[(1, 5), (1, 5)]);

        assert_eq!(payloads(tree.containing(3)), vec![0, 1]);
        assert_eq!(payloads(tree.intersecting(0..=10)), vec![0, 1]);
    }

    #[test]
    fn repeated_queries_return_identical_sequences() {
        let tree = tree_over(&[(1, 9), (2, 8), (3, 7), (4, 6), (5, 5)]);

        let first: Vec<usize> = tree.containing(5).iter().map(|i| *i.payload()).collect();
        let second: Vec<usize> = tree.containing(5).iter().map(|i| *i.payload()).collect();
        assert_eq!(first, second);

        let first: Vec<usize> = tree.intersecting(2..=6).iter().map(|i| *i.payload()).collect();
        let second: Vec<usize> = tree.intersecting(2..=6).iter().map(|i| *i.payload()).collect();
        assert_eq!(first, second);
    }

    #[test]
    #[should_panic(expected = "start must not exceed end")]
    fn reversed_interval_is_rejected() {
        let _ = Interval::new(5, 1, ());
    }

    #[test]
    #[should_panic]
    fn reversed_query_range_is_rejected() {
        let tree = tree_over(&[(1, 5)]);
        let _ = tree.intersecting(10..=2);
    }

    #[test]
    fn display_renders_interval_and_tree() {
        let interval = Interval::new(1, 5, ());
        assert_eq!(format!("{}", interval), "[ 1 - 5 ]");

        let empty: IntervalTree<i64, usize> = tree_over(&[]);
        assert_eq!(format!("{}", empty), "Empty tree");

        let tree = tree_over(&[(1, 5), (10, 15)]);
        assert!(format!("{}", tree).contains('{'));
    }

    fn random_intervals(rng: &mut StdRng, n: usize) -> Vec<Interval<i64, usize>> {
        (0..n)
            .map(|id| {
                let start = rng.gen_range(0..1_000);
                let len = rng.gen_range(0..200);
                Interval::new(start, start + len, id)
            })
            .collect()
    }

    #[test]
    fn containing_matches_a_brute_force_scan() {
        let mut rng = StdRng::seed_from_u64(0x1db7);
        for _ in 0..50 {
            let n = rng.gen_range(0..400);
            let intervals = random_intervals(&mut rng, n);
            let tree = IntervalTree::new(intervals.clone());

            for _ in 0..20 {
                let x = rng.gen_range(-50..1_300);
                let expected: Vec<usize> = intervals
                    .iter()
                    .filter(|interval| interval.contains(x))
                    .map(|interval| *interval.payload())
                    .collect();
                assert_eq!(payloads(tree.containing(x)), expected);
            }
        }
    }

    #[test]
    fn intersecting_matches_a_brute_force_scan() {
        let mut rng = StdRng::seed_from_u64(0xb57);
        for _ in 0..50 {
            let n = rng.gen_range(0..400);
            let intervals = random_intervals(&mut rng, n);
            let tree = IntervalTree::new(intervals.clone());

            for _ in 0..20 {
                let lo = rng.gen_range(-50..1_300);
                let hi = lo + rng.gen_range(0..300);
                let expected: Vec<usize> = intervals
                    .iter()
                    .filter(|interval| interval.start() <= hi && interval.end() >= lo)
                    .map(|interval| *interval.payload())
                    .collect();
                assert_eq!(payloads(tree.intersecting(lo..=hi)), expected);
            }
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn interval_round_trips_through_serde() {
        let interval = Interval::new(2, 9, String::from("payload"));
        let json = serde_json::to_string(&interval).unwrap();
        let back: Interval<i32, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, interval);
    }
}

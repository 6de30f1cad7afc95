use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::interval_tree::{Interval, IntervalId};

/// A node of the centered interval tree.
///
/// A node stores the intervals spanning its median boundary value (its
/// mid-intervals), pre-sorted two ways so that a stabbing query scans exactly
/// the matching prefix and stops. Intervals ending strictly below the median
/// live in the left subtree, intervals starting strictly above it in the
/// right subtree.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Node<K> {
    pub median: K,
    /// Mid-intervals, ascending by (start, end).
    pub by_start: Vec<IntervalId>,
    /// The same mid-intervals, descending by (end, start).
    pub by_end: Vec<IntervalId>,
    pub left: Option<Box<Node<K>>>,
    pub right: Option<Box<Node<K>>>,
}

impl<K> fmt::Display for Node<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mid = self.by_start.len();

        if self.is_leaf() {
            write!(f, " {{ {} ({}) }} ", self.median, mid)
        } else if self.left.is_none() {
            write!(
                f,
                " {{ {} ({}) right:{}}} ",
                self.median,
                mid,
                self.right.as_ref().unwrap()
            )
        } else if self.right.is_none() {
            write!(
                f,
                " {{ {} ({}) left:{}}} ",
                self.median,
                mid,
                self.left.as_ref().unwrap()
            )
        } else {
            write!(
                f,
                " {{ {} ({}) left:{}right:{}}} ",
                self.median,
                mid,
                self.left.as_ref().unwrap(),
                self.right.as_ref().unwrap()
            )
        }
    }
}

impl<K> Node<K> {
    /// Creates a childless node over `mid`, sorting the two query lists.
    fn new<V>(median: K, mid: Vec<IntervalId>, arena: &[Interval<K, V>]) -> Node<K>
    where
        K: Ord,
    {
        let mut by_start = mid.clone();
        let mut by_end = mid;
        by_start.sort_by(|&a, &b| arena[a].cmp_by_start(&arena[b]));
        by_end.sort_by(|&a, &b| arena[a].cmp_by_end(&arena[b]));

        Node {
            median,
            by_start,
            by_end,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Appends to `hits` the id of every interval in this subtree containing `x`.
    ///
    /// Output sensitive: a node scans only as many list entries as it
    /// contributes matches (plus one), and at most one subtree is visited
    /// per level.
    pub fn stab<V>(&self, x: K, arena: &[Interval<K, V>], hits: &mut Vec<IntervalId>)
    where
        K: Ord + Copy,
    {
        assert_eq!(
            self.by_start.len(),
            self.by_end.len(),
            "interval tree: node query lists out of sync"
        );
        match x.cmp(&self.median) {
            Ordering::Greater => {
                // Every mid-interval starts at or before the median, so only
                // ends need checking. Descending by end, the first miss ends
                // the scan.
                for &id in &self.by_end {
                    if arena[id].end() < x {
                        break;
                    }
                    hits.push(id);
                }
                if let Some(ref right) = self.right {
                    right.stab(x, arena, hits);
                }
            }
            Ordering::Less => {
                for &id in &self.by_start {
                    if arena[id].start() > x {
                        break;
                    }
                    hits.push(id);
                }
                if let Some(ref left) = self.left {
                    left.stab(x, arena, hits);
                }
            }
            // The median is spanned by every mid-interval and by nothing in
            // either subtree.
            Ordering::Equal => hits.extend_from_slice(&self.by_start),
        }
    }
}

/// Recursively builds the subtree indexing the intervals at the given arena slots.
///
/// The median is the rank-`n` value of the `2n` sorted boundary values of the
/// `n` intervals, which splits the boundary multiset evenly and keeps the
/// recursion depth logarithmic regardless of interval length skew.
pub(crate) fn build<K, V>(ids: Vec<IntervalId>, arena: &[Interval<K, V>]) -> Option<Box<Node<K>>>
where
    K: Ord + Copy,
{
    if ids.is_empty() {
        return None;
    }

    let n = ids.len();
    let mut bounds = Vec::with_capacity(2 * n);
    for &id in &ids {
        bounds.push(arena[id].start());
        bounds.push(arena[id].end());
    }
    bounds.sort_unstable();
    let median = bounds[n];

    let mut left = Vec::new();
    let mut mid = Vec::new();
    let mut right = Vec::new();
    for &id in &ids {
        if arena[id].end() < median {
            left.push(id);
        } else if arena[id].start() > median {
            right.push(id);
        } else {
            mid.push(id);
        }
    }
    assert_eq!(
        left.len() + mid.len() + right.len(),
        n,
        "interval tree: partition around median lost intervals"
    );

    let mut node = Node::new(median, mid, arena);
    node.left = build(left, arena);
    node.right = build(right, arena);
    Some(Box::new(node))
}

//! Implementation of a static interval index ([`interval_tree::IntervalTree`]) over closed
//! intervals. It combines a centered interval tree, as described in
//! de Berg et al. (2008, Section 10.1: Interval trees, pp. 220–226), with an
//! ordered index over interval boundary points. The tree answers "stabbing queries"
//! (as in "which intervals contain point `x`?") in output-sensitive time; the boundary
//! index, merged with one stabbing query, answers "which intervals intersect the range
//! `[lo, hi]`?" without ever scanning the whole collection.
//!
//! The index is built once from a list of intervals and never mutated afterwards;
//! there is no insertion or deletion. Because every query takes `&self`, a built
//! index can be shared freely between threads.
//!
//! Note that any type satisfying the [`Ord`] and [`Copy`] traits can be used as the
//! boundary type of the stored intervals, and an arbitrary payload can be attached
//! to each of them.

/// A static interval index backed by a centered interval tree and a boundary-point index.
pub mod interval_tree;
mod node;
mod point_index;

pub use crate::interval_tree::{Interval, IntervalTree};

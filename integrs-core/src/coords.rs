//! Position arithmetic on a replicon that may be circular or linear.
//!
//! Every function here is pure: the replicon size and topology are passed in
//! explicitly (most callers go through [`RepliconContext`](crate::models::RepliconContext),
//! which forwards to these functions).

use crate::models::Topology;

/// Distance walked forward from `a` to reach `b`.
///
/// On a circular replicon this is `(b - a) mod size`, always in `[0, size)`.
/// On a linear replicon it is the plain difference `b - a`, which is negative
/// when `b` precedes `a`.
#[inline]
pub fn forward_gap(a: u32, b: u32, size: u32, topology: Topology) -> i64 {
    let gap = b as i64 - a as i64;
    match topology {
        Topology::Circular => gap.rem_euclid(size as i64),
        Topology::Linear => gap,
    }
}

/// `true` iff the forward gap from `a` to `b` is at most `threshold`.
#[inline]
pub fn within_threshold(a: u32, b: u32, size: u32, topology: Topology, threshold: u32) -> bool {
    forward_gap(a, b, size, topology) <= threshold as i64
}

/// Forward gap from `a` to `b`, or `None` when `b` lies behind `a` on a linear
/// replicon.
#[inline]
pub fn oriented_gap(a: u32, b: u32, size: u32, topology: Topology) -> Option<u32> {
    let gap = forward_gap(a, b, size, topology);
    if gap < 0 { None } else { Some(gap as u32) }
}

/// Move a 0-based boundary `by` bases towards the origin.
///
/// Wraps modulo `size` on circular replicons, saturates at 0 on linear ones.
#[inline]
pub fn shift_left(pos: u32, by: u32, size: u32, topology: Topology) -> u32 {
    match topology {
        Topology::Circular => (pos as i64 - by as i64).rem_euclid(size as i64) as u32,
        Topology::Linear => pos.saturating_sub(by),
    }
}

/// Move a 0-based boundary `by` bases away from the origin.
///
/// Wraps modulo `size` on circular replicons, saturates at `size` on linear ones.
#[inline]
pub fn shift_right(pos: u32, by: u32, size: u32, topology: Topology) -> u32 {
    match topology {
        Topology::Circular => ((pos as u64 + by as u64) % size as u64) as u32,
        Topology::Linear => pos.saturating_add(by).min(size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(10, 50, 100, Topology::Circular, 40)]
    #[case(90, 10, 100, Topology::Circular, 20)]
    #[case(42, 42, 100, Topology::Circular, 0)]
    #[case(10, 50, 100, Topology::Linear, 40)]
    #[case(90, 10, 100, Topology::Linear, -80)]
    #[case(5, 5, 7, Topology::Linear, 0)]
    fn test_forward_gap(
        #[case] a: u32,
        #[case] b: u32,
        #[case] size: u32,
        #[case] topology: Topology,
        #[case] expected: i64,
    ) {
        assert_eq!(forward_gap(a, b, size, topology), expected);
    }

    #[rstest]
    fn test_forward_gap_size_not_dividing() {
        // 7 does not divide the raw difference
        assert_eq!(forward_gap(6, 2, 7, Topology::Circular), 3);
        assert_eq!(forward_gap(2, 6, 7, Topology::Circular), 4);
    }

    #[rstest]
    fn test_within_threshold() {
        assert!(within_threshold(990, 10, 1000, Topology::Circular, 20));
        assert!(!within_threshold(990, 10, 1000, Topology::Circular, 19));
        // a preceding position on a linear replicon has a negative gap
        assert!(within_threshold(990, 10, 1000, Topology::Linear, 0));
        assert!(within_threshold(10, 10, 1000, Topology::Linear, 0));
    }

    #[rstest]
    fn test_oriented_gap() {
        assert_eq!(oriented_gap(990, 10, 1000, Topology::Circular), Some(20));
        assert_eq!(oriented_gap(990, 10, 1000, Topology::Linear), None);
        assert_eq!(oriented_gap(10, 990, 1000, Topology::Linear), Some(980));
    }

    #[rstest]
    fn test_shifts() {
        assert_eq!(shift_left(10, 30, 100, Topology::Circular), 80);
        assert_eq!(shift_left(10, 30, 100, Topology::Linear), 0);
        assert_eq!(shift_right(90, 30, 100, Topology::Circular), 20);
        assert_eq!(shift_right(90, 30, 100, Topology::Linear), 100);
        assert_eq!(shift_right(70, 30, 100, Topology::Circular), 0);
    }
}

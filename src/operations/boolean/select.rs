use crate::geometry::curve::Curve;
use crate::math::Point2;

use super::engine::SweepResult;
use super::fill::Fill;
use super::mono::CurveRef;

/// The type of boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    Union,
    Intersection,
    /// Primary minus secondary.
    Difference,
    Xor,
}

/// Decision about whether to keep a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepDecision {
    /// Keep, traversed from enter to leave.
    Keep,
    /// Keep, traversed from leave to enter.
    KeepFlipped,
    Discard,
}

/// Whether a region inside (`true`) or outside each operand belongs to the
/// result.
///
/// | primary | secondary | Union | Intersection | Difference | Xor |
/// |---------|-----------|-------|--------------|------------|-----|
/// | in      | in        | in    | in           | out        | out |
/// | in      | out       | in    | out          | in         | in  |
/// | out     | in        | in    | out          | out        | in  |
/// | out     | out       | out   | out          | out        | out |
#[allow(clippy::match_same_arms)]
#[must_use]
pub fn region_in_result(primary: bool, secondary: bool, op: BooleanOp) -> bool {
    match (primary, secondary, op) {
        (true, true, BooleanOp::Union) => true,
        (true, true, BooleanOp::Intersection) => true,
        (true, true, BooleanOp::Difference) => false,
        (true, true, BooleanOp::Xor) => false,

        (true, false, BooleanOp::Union) => true,
        (true, false, BooleanOp::Intersection) => false,
        (true, false, BooleanOp::Difference) => true,
        (true, false, BooleanOp::Xor) => true,

        (false, true, BooleanOp::Union) => true,
        (false, true, BooleanOp::Intersection) => false,
        (false, true, BooleanOp::Difference) => false,
        (false, true, BooleanOp::Xor) => true,

        (false, false, _) => false,
    }
}

/// Keeps a segment when the result differs on its two sides, oriented so
/// that the result lies to its left.
#[must_use]
pub fn should_keep_segment(fill: &Fill, op: BooleanOp) -> KeepDecision {
    let above = region_in_result(fill.primary_above, fill.secondary_above, op);
    let below = region_in_result(fill.primary_below, fill.secondary_below, op);
    match (above, below) {
        (true, false) => KeepDecision::Keep,
        (false, true) => KeepDecision::KeepFlipped,
        _ => KeepDecision::Discard,
    }
}

/// A piece of a boolean result's boundary, with the result on its left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundarySegment {
    pub curve: Curve,
    pub start: Point2,
    pub end: Point2,
    pub is_primary: bool,
    pub origin: CurveRef,
}

/// Applies [`should_keep_segment`] to every segment of a sweep.
#[must_use]
pub fn select_boundary(result: &SweepResult, op: BooleanOp) -> Vec<BoundarySegment> {
    result
        .segments
        .iter()
        .filter_map(|s| {
            let (curve, start, end) = match should_keep_segment(&s.fill, op) {
                KeepDecision::Keep => (s.curve, s.enter, s.leave),
                KeepDecision::KeepFlipped => (s.curve.reversed(), s.leave, s.enter),
                KeepDecision::Discard => return None,
            };
            Some(BoundarySegment {
                curve,
                start,
                end,
                is_primary: s.is_primary,
                origin: s.origin,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(pa: bool, pb: bool, sa: bool, sb: bool) -> Fill {
        Fill {
            primary_above: pa,
            primary_below: pb,
            secondary_above: sa,
            secondary_below: sb,
        }
    }

    #[test]
    fn union_keeps_outer_edges() {
        // Bottom edge of the primary, outside the secondary.
        let f = fill(true, false, false, false);
        assert_eq!(should_keep_segment(&f, BooleanOp::Union), KeepDecision::Keep);
        // Top edge of the primary, outside the secondary.
        let f = fill(false, true, false, false);
        assert_eq!(should_keep_segment(&f, BooleanOp::Union), KeepDecision::KeepFlipped);
    }

    #[test]
    fn union_discards_inner_edges() {
        let f = fill(true, false, true, true);
        assert_eq!(should_keep_segment(&f, BooleanOp::Union), KeepDecision::Discard);
        assert_eq!(should_keep_segment(&f, BooleanOp::Intersection), KeepDecision::Keep);
    }

    #[test]
    fn difference_flips_secondary_edges() {
        // Bottom edge of the secondary inside the primary.
        let f = fill(true, true, true, false);
        assert_eq!(should_keep_segment(&f, BooleanOp::Difference), KeepDecision::KeepFlipped);
        assert_eq!(should_keep_segment(&f, BooleanOp::Xor), KeepDecision::KeepFlipped);
    }

    #[test]
    fn shared_edge_with_equal_sides_is_dropped() {
        let f = fill(true, true, false, false);
        for op in [BooleanOp::Union, BooleanOp::Intersection, BooleanOp::Difference, BooleanOp::Xor] {
            assert_eq!(should_keep_segment(&f, op), KeepDecision::Discard);
        }
    }

    #[test]
    fn table_matches_set_algebra() {
        for p in [false, true] {
            for s in [false, true] {
                assert_eq!(region_in_result(p, s, BooleanOp::Union), p || s);
                assert_eq!(region_in_result(p, s, BooleanOp::Intersection), p && s);
                assert_eq!(region_in_result(p, s, BooleanOp::Difference), p && !s);
                assert_eq!(region_in_result(p, s, BooleanOp::Xor), p != s);
            }
        }
    }
}

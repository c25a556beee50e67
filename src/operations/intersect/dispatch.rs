use crate::error::{IntersectionError, Result};
use crate::geometry::curve::{Curve, CurveKind};
use crate::math::tolerance::Tolerance;

use super::{arc, bezier, line, point, solve, Intersection};

/// One of the fifteen pairwise resolvers, named by its operand kinds in
/// canonical (simplest first) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolver {
    PointPoint,
    PointLine,
    PointQuadratic,
    PointCubic,
    PointArc,
    LineLine,
    LineQuadratic,
    LineCubic,
    LineArc,
    QuadraticQuadratic,
    QuadraticCubic,
    QuadraticArc,
    CubicCubic,
    CubicArc,
    ArcArc,
}

/// Resolver for a pair of curve kinds and whether the operands must be
/// swapped to match its canonical order.
#[must_use]
pub fn resolver_for(a: CurveKind, b: CurveKind) -> (Resolver, bool) {
    use CurveKind::{Arc, Cubic, LineSegment as Line, Point, Quadratic};
    match (a, b) {
        (Point, Point) => (Resolver::PointPoint, false),
        (Point, Line) => (Resolver::PointLine, false),
        (Point, Quadratic) => (Resolver::PointQuadratic, false),
        (Point, Cubic) => (Resolver::PointCubic, false),
        (Point, Arc) => (Resolver::PointArc, false),
        (Line, Point) => (Resolver::PointLine, true),
        (Line, Line) => (Resolver::LineLine, false),
        (Line, Quadratic) => (Resolver::LineQuadratic, false),
        (Line, Cubic) => (Resolver::LineCubic, false),
        (Line, Arc) => (Resolver::LineArc, false),
        (Quadratic, Point) => (Resolver::PointQuadratic, true),
        (Quadratic, Line) => (Resolver::LineQuadratic, true),
        (Quadratic, Quadratic) => (Resolver::QuadraticQuadratic, false),
        (Quadratic, Cubic) => (Resolver::QuadraticCubic, false),
        (Quadratic, Arc) => (Resolver::QuadraticArc, false),
        (Cubic, Point) => (Resolver::PointCubic, true),
        (Cubic, Line) => (Resolver::LineCubic, true),
        (Cubic, Quadratic) => (Resolver::QuadraticCubic, true),
        (Cubic, Cubic) => (Resolver::CubicCubic, false),
        (Cubic, Arc) => (Resolver::CubicArc, false),
        (Arc, Point) => (Resolver::PointArc, true),
        (Arc, Line) => (Resolver::LineArc, true),
        (Arc, Quadratic) => (Resolver::QuadraticArc, true),
        (Arc, Cubic) => (Resolver::CubicArc, true),
        (Arc, Arc) => (Resolver::ArcArc, false),
    }
}

/// Where a pair of (already reduced) curves is sent for resolution.
///
/// `resolver == None` means the curves cannot intersect. `disjoint` marks
/// curves whose bounding boxes are apart: they have no proper intersection
/// but may still share a trajectory or meet when extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Degeneration {
    pub resolver: Option<Resolver>,
    pub inverse: bool,
    pub disjoint: bool,
}

impl Degeneration {
    /// The empty-result terminal.
    pub const EMPTY: Self = Self {
        resolver: None,
        inverse: false,
        disjoint: true,
    };

    /// Picks the resolver for two reduced curves.
    #[must_use]
    pub fn resolve(a: &Curve, b: &Curve, tol: &Tolerance) -> Self {
        let margin = a.point_tolerance(tol).max(b.point_tolerance(tol));
        if let (Curve::Point(p), Curve::Point(q)) = (a, b) {
            if (p - q).norm() > margin {
                return Self::EMPTY;
            }
        }
        let (resolver, inverse) = resolver_for(a.kind(), b.kind());
        Self {
            resolver: Some(resolver),
            inverse,
            disjoint: !a.bounding_box().overlaps(&b.bounding_box(), margin),
        }
    }
}

impl Resolver {
    /// Same-trajectory test for curves in canonical order.
    ///
    /// Only pairs of one implicit family can share a trajectory.
    #[must_use]
    pub fn same_trajectory(self, a: &Curve, b: &Curve, tol: &Tolerance) -> bool {
        match self {
            Self::PointPoint => point::same_point(a, b, tol),
            Self::LineLine | Self::QuadraticQuadratic | Self::CubicCubic | Self::ArcArc => {
                solve::same_implicit(a, b, tol)
            }
            _ => false,
        }
    }

    /// Proper intersections for curves in canonical order, `param_a` on `a`.
    ///
    /// # Errors
    ///
    /// Returns [`IntersectionError::UnsupportedPair`] if the curve kinds do
    /// not match the resolver, and the elimination errors otherwise.
    pub fn proper(self, a: &Curve, b: &Curve, tol: &Tolerance, extended: bool) -> Result<Vec<Intersection>> {
        let (expected, _) = resolver_for(a.kind(), b.kind());
        if expected != self {
            return Err(IntersectionError::UnsupportedPair(a.kind(), b.kind()).into());
        }
        match self {
            Self::PointPoint => Ok(Vec::new()),
            Self::PointLine | Self::PointQuadratic | Self::PointCubic | Self::PointArc => {
                point::point_on_curve(a, b, tol, extended)
            }
            Self::LineLine => line::line_line(a, b, tol, extended),
            Self::LineQuadratic | Self::LineCubic => line::line_bezier(a, b, tol, extended),
            Self::LineArc => line::line_arc(a, b, tol, extended),
            Self::QuadraticQuadratic => bezier::quadratic_quadratic(a, b, tol, extended),
            Self::QuadraticCubic => bezier::quadratic_cubic(a, b, tol, extended),
            Self::CubicCubic => bezier::cubic_cubic(a, b, tol, extended),
            Self::QuadraticArc | Self::CubicArc => bezier::bezier_arc(a, b, tol, extended),
            Self::ArcArc => arc::arc_arc(a, b, tol, extended),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::curve::QuadraticBezier;
    use crate::math::Point2;

    const KINDS: [CurveKind; 5] = [
        CurveKind::Point,
        CurveKind::LineSegment,
        CurveKind::Quadratic,
        CurveKind::Cubic,
        CurveKind::Arc,
    ];

    #[test]
    fn table_covers_fifteen_resolvers() {
        let mut seen = std::collections::HashSet::new();
        for a in KINDS {
            for b in KINDS {
                let (r, inverse) = resolver_for(a, b);
                assert_eq!(inverse, a > b);
                let (r2, inverse2) = resolver_for(b, a);
                assert_eq!(r, r2);
                assert_eq!(inverse2, b > a);
                seen.insert(r);
            }
        }
        assert_eq!(seen.len(), 15);
    }

    #[test]
    fn distinct_points_are_empty() {
        let tol = Tolerance::default();
        let a = Curve::Point(Point2::new(0.0, 0.0));
        let b = Curve::Point(Point2::new(0.0, 1e-3));
        assert_eq!(Degeneration::resolve(&a, &b, &tol), Degeneration::EMPTY);
        assert_eq!(
            Degeneration::resolve(&a, &a, &tol).resolver,
            Some(Resolver::PointPoint)
        );
    }

    #[test]
    fn boxes_apart_keep_the_resolver() {
        let tol = Tolerance::default();
        let a = Curve::segment(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        let b = Curve::segment(Point2::new(3.0, 0.0), Point2::new(4.0, 0.0));
        let d = Degeneration::resolve(&a, &b, &tol);
        assert_eq!(d.resolver, Some(Resolver::LineLine));
        assert!(d.disjoint);
        assert!(!Degeneration::resolve(&a, &a, &tol).disjoint);
    }

    #[test]
    fn mismatched_kinds_are_a_defect() {
        let tol = Tolerance::default();
        let seg = Curve::segment(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        let quad = Curve::Quadratic(QuadraticBezier::new(
            Point2::new(0.0, 1.0),
            Point2::new(0.5, 0.0),
            Point2::new(1.0, 1.0),
        ));
        assert!(Resolver::LineLine.proper(&seg, &quad, &tol, false).is_err());
        assert!(Resolver::LineQuadratic.proper(&seg, &quad, &tol, false).is_ok());
    }
}

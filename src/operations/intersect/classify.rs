use crate::error::Result;
use crate::geometry::curve::Curve;

use super::{Intersection, Intersector, Overlap};

/// Returns `true` if `t` is an end of the curve's domain.
fn at_end(curve: &Curve, t: f64, eps: f64) -> bool {
    let (t0, t1) = curve.domain();
    (t - t0).abs() <= eps || (t - t1).abs() <= eps
}

impl Intersector {
    fn param_epsilon(&self, curve: &Curve) -> f64 {
        match curve {
            Curve::Arc(_) => self.tolerance().angle_epsilon,
            _ => self.tolerance().time_epsilon,
        }
    }

    fn ends(&self, r: &Intersection) -> (bool, bool) {
        let (a, b) = (self.first(), self.second());
        (
            at_end(a, r.param_a, self.param_epsilon(a)),
            at_end(b, r.param_b, self.param_epsilon(b)),
        )
    }

    fn filtered(&self, keep: impl Fn(&Intersection) -> bool) -> Result<Vec<Intersection>> {
        Ok(self
            .proper_intersection()?
            .iter()
            .copied()
            .filter(keep)
            .collect())
    }

    /// Returns `true` if both curves cover exactly the same piece of one
    /// trajectory (in either direction).
    ///
    /// # Errors
    ///
    /// See [`Intersector::coincide`].
    pub fn equal(&self) -> Result<bool> {
        if !self.on_same_trajectory() {
            return Ok(false);
        }
        let overlaps = self.coincide()?;
        let [Overlap::Segment { range_a, range_b, .. }] = overlaps else {
            return Ok(false);
        };
        let covers = |curve: &Curve, range: (f64, f64)| {
            let eps = self.param_epsilon(curve);
            let (lo, hi) = curve.param_range();
            let (r0, r1) = if range.0 <= range.1 {
                range
            } else {
                (range.1, range.0)
            };
            (r0 - lo).abs() <= eps && (r1 - hi).abs() <= eps
        };
        Ok(covers(self.first(), *range_a) && covers(self.second(), *range_b))
    }

    /// Returns `true` if the curves share no point at all.
    ///
    /// # Errors
    ///
    /// See [`Intersector::proper_intersection`].
    pub fn separate(&self) -> Result<bool> {
        if self.on_same_trajectory() {
            return Ok(self.coincide()?.is_empty());
        }
        Ok(self.proper_intersection()?.is_empty())
    }

    /// Transversal intersections (odd multiplicity).
    ///
    /// # Errors
    ///
    /// See [`Intersector::proper_intersection`].
    pub fn strike(&self) -> Result<Vec<Intersection>> {
        self.filtered(Intersection::is_strike)
    }

    /// Tangential intersections (even multiplicity).
    ///
    /// # Errors
    ///
    /// See [`Intersector::proper_intersection`].
    pub fn contact(&self) -> Result<Vec<Intersection>> {
        self.filtered(Intersection::is_contact)
    }

    /// Transversal intersections strictly inside both curves.
    ///
    /// # Errors
    ///
    /// See [`Intersector::proper_intersection`].
    pub fn cross(&self) -> Result<Vec<Intersection>> {
        self.filtered(|r| r.is_strike() && self.ends(r) == (false, false))
    }

    /// Tangential intersections strictly inside both curves.
    ///
    /// # Errors
    ///
    /// See [`Intersector::proper_intersection`].
    pub fn touch(&self) -> Result<Vec<Intersection>> {
        self.filtered(|r| r.is_contact() && self.ends(r) == (false, false))
    }

    /// Points where an end of the second curve lands inside the first.
    ///
    /// # Errors
    ///
    /// See [`Intersector::proper_intersection`].
    pub fn block(&self) -> Result<Vec<Intersection>> {
        self.filtered(|r| self.ends(r) == (false, true))
    }

    /// Points where an end of the first curve lands inside the second.
    ///
    /// # Errors
    ///
    /// See [`Intersector::proper_intersection`].
    pub fn blocked_by(&self) -> Result<Vec<Intersection>> {
        self.filtered(|r| self.ends(r) == (true, false))
    }

    /// Points where the curves meet end to end.
    ///
    /// # Errors
    ///
    /// See [`Intersector::proper_intersection`].
    pub fn connect(&self) -> Result<Vec<Intersection>> {
        self.filtered(|r| self.ends(r) == (true, true))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::curve::{Arc, CubicBezier, QuadraticBezier};
    use crate::math::tolerance::Tolerance;
    use crate::math::Point2;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn diagonals_cross() {
        let tol = Tolerance::default();
        let ix = Intersector::new(
            Curve::segment(p(0.0, 0.0), p(2.0, 2.0)),
            Curve::segment(p(0.0, 2.0), p(2.0, 0.0)),
            &tol,
        )
        .unwrap();
        let crossings = ix.cross().unwrap();
        assert_eq!(crossings.len(), 1);
        assert_abs_diff_eq!(crossings[0].point.x, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(crossings[0].point.y, 1.0, epsilon = 1e-9);
        assert_eq!(crossings[0].multiplicity, 1);
        assert!(ix.touch().unwrap().is_empty());
        assert!(!ix.separate().unwrap());
    }

    #[test]
    fn tangent_line_touches_circle() {
        let tol = Tolerance::default();
        let circle = Curve::Arc(Arc::full(p(0.0, 0.0), 5.0, 5.0, 0.0).unwrap());
        let line = Curve::segment(p(-10.0, 5.0), p(10.0, 5.0));
        let ix = Intersector::new(circle, line, &tol).unwrap();
        let touches = ix.touch().unwrap();
        assert_eq!(touches.len(), 1);
        assert_abs_diff_eq!(touches[0].point.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(touches[0].point.y, 5.0, epsilon = 1e-9);
        assert_eq!(touches[0].multiplicity, 2);
        assert_eq!(ix.contact().unwrap().len(), 1);
        assert!(ix.strike().unwrap().is_empty());
    }

    #[test]
    fn identical_segments_are_equal() {
        let tol = Tolerance::default();
        let seg = Curve::segment(p(0.0, 0.0), p(1.0, 1.0));
        let ix = Intersector::new(seg, seg, &tol).unwrap();
        assert!(ix.on_same_trajectory());
        assert!(ix.equal().unwrap());
        assert!(ix.proper_intersection().unwrap().is_empty());
        let overlaps = ix.coincide().unwrap();
        assert_eq!(overlaps.len(), 1);
        let Overlap::Segment { curve, .. } = overlaps[0] else {
            panic!("expected a segment overlap");
        };
        assert_eq!(curve, seg);
    }

    #[test]
    fn reversed_segment_is_equal() {
        let tol = Tolerance::default();
        let seg = Curve::segment(p(0.0, 0.0), p(1.0, 1.0));
        let ix = Intersector::new(seg, seg.reversed(), &tol).unwrap();
        assert!(ix.equal().unwrap());
        let half = Curve::segment(p(0.0, 0.0), p(0.5, 0.5));
        let ix = Intersector::new(seg, half, &tol).unwrap();
        assert!(ix.on_same_trajectory());
        assert!(!ix.equal().unwrap());
    }

    #[test]
    fn endpoint_relations() {
        let tol = Tolerance::default();
        let base = Curve::segment(p(0.0, 0.0), p(4.0, 0.0));
        let stem = Curve::segment(p(2.0, 0.0), p(2.0, 3.0));
        let ix = Intersector::new(base, stem, &tol).unwrap();
        assert_eq!(ix.block().unwrap().len(), 1);
        assert!(ix.blocked_by().unwrap().is_empty());
        let ix = Intersector::new(stem, base, &tol).unwrap();
        assert_eq!(ix.blocked_by().unwrap().len(), 1);

        let next = Curve::segment(p(4.0, 0.0), p(4.0, 2.0));
        let ix = Intersector::new(base, next, &tol).unwrap();
        assert_eq!(ix.connect().unwrap().len(), 1);
        assert!(ix.cross().unwrap().is_empty());
    }

    #[test]
    fn parity_partitions_the_records() {
        let tol = Tolerance::default();
        let curves = [
            Curve::segment(p(-1.0, 0.5), p(3.0, 0.5)),
            Curve::segment(p(-1.0, 1.0), p(3.0, 1.0)),
            Curve::Quadratic(QuadraticBezier::new(p(0.0, 0.0), p(1.0, 2.0), p(2.0, 0.0))),
            Curve::Cubic(CubicBezier::new(p(0.0, 1.0), p(0.7, 0.0), p(1.3, 1.0), p(2.0, 0.5))),
            Curve::Arc(Arc::full(p(1.0, 0.5), 0.5, 0.5, 0.0).unwrap()),
        ];
        for a in &curves {
            for b in &curves {
                let ix = Intersector::new(*a, *b, &tol).unwrap();
                let all = ix.proper_intersection().unwrap().len();
                let strikes = ix.strike().unwrap();
                let contacts = ix.contact().unwrap();
                assert_eq!(strikes.len() + contacts.len(), all);
                assert!(strikes.iter().all(|r| r.multiplicity % 2 == 1));
                assert!(contacts.iter().all(|r| r.multiplicity % 2 == 0));
            }
        }
    }

    #[test]
    fn operand_swap_symmetry() {
        let tol = Tolerance::default();
        let quad = Curve::Quadratic(QuadraticBezier::new(p(0.0, 0.0), p(1.0, 2.0), p(2.0, 0.0)));
        let arc = Curve::Arc(Arc::circular(p(1.0, 0.0), 0.9, 0.0, std::f64::consts::PI).unwrap());
        let ab = Intersector::new(quad, arc, &tol).unwrap();
        let ba = Intersector::new(arc, quad, &tol).unwrap();
        let r1 = ab.proper_intersection().unwrap();
        let mut r2: Vec<Intersection> = ba.proper_intersection().unwrap().iter().map(|r| r.swapped()).collect();
        r2.sort_by(|x, y| x.param_a.total_cmp(&y.param_a));
        assert_eq!(r1.len(), 4);
        assert_eq!(r1.len(), r2.len());
        for (x, y) in r1.iter().zip(&r2) {
            assert_abs_diff_eq!((x.point - y.point).norm(), 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(x.param_b, y.param_b, epsilon = 1e-9);
            assert_eq!(x.multiplicity, y.multiplicity);
        }
    }
}

use crate::error::Result;
use crate::geometry::curve::Curve;
use crate::math::tolerance::Tolerance;

use super::solve::half_angle_into_implicit;
use super::Intersection;

/// The first arc in half-angle form is substituted into the second ellipse.
pub(super) fn arc_arc(a: &Curve, b: &Curve, tol: &Tolerance, extended: bool) -> Result<Vec<Intersection>> {
    half_angle_into_implicit(a, b, tol, extended)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, PI};

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::curve::Arc;
    use crate::math::Point2;

    fn circle(x: f64, y: f64, r: f64) -> Curve {
        Curve::Arc(Arc::full(Point2::new(x, y), r, r, 0.0).unwrap())
    }

    #[test]
    fn overlapping_circles_cross_twice() {
        let tol = Tolerance::default();
        let a = circle(0.0, 0.0, 1.0);
        let b = circle(1.0, 0.0, 1.0);
        let mut records = arc_arc(&a, &b, &tol, false).unwrap();
        records.sort_by(|x, y| x.param_a.total_cmp(&y.param_a));
        assert_eq!(records.len(), 2);
        assert_abs_diff_eq!(records[0].param_a, FRAC_PI_3, epsilon = 1e-9);
        assert_abs_diff_eq!(records[1].param_a, 2.0 * PI - FRAC_PI_3, epsilon = 1e-9);
        assert_abs_diff_eq!(records[0].param_b, 2.0 * FRAC_PI_3, epsilon = 1e-9);
        assert!(records.iter().all(Intersection::is_strike));
    }

    #[test]
    fn half_span_keeps_one_crossing() {
        let tol = Tolerance::default();
        let upper = Curve::Arc(Arc::circular(Point2::new(0.0, 0.0), 1.0, 0.0, PI).unwrap());
        let b = circle(1.0, 0.0, 1.0);
        let records = arc_arc(&upper, &b, &tol, false).unwrap();
        assert_eq!(records.len(), 1);
        assert_abs_diff_eq!(records[0].point.y, 3.0_f64.sqrt() / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn ellipse_touching_circle_from_inside() {
        let tol = Tolerance::default();
        let ellipse = Curve::Arc(Arc::full(Point2::new(0.0, 0.0), 2.0, 1.0, 0.0).unwrap());
        let inner = circle(0.0, 0.0, 1.0);
        let records = arc_arc(&ellipse, &inner, &tol, false).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(Intersection::is_contact));
        let mut params: Vec<f64> = records.iter().map(|r| r.param_a).collect();
        params.sort_by(f64::total_cmp);
        assert_abs_diff_eq!(params[0], FRAC_PI_2, epsilon = 1e-6);
        assert_abs_diff_eq!(params[1], 3.0 * FRAC_PI_2, epsilon = 1e-6);
    }
}

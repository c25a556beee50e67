use crate::error::Result;
use crate::geometry::curve::Curve;
use crate::math::tolerance::Tolerance;

use super::Intersection;

/// Two collapsed curves share a trajectory when they are the same point.
pub(super) fn same_point(a: &Curve, b: &Curve, tol: &Tolerance) -> bool {
    match (a, b) {
        (Curve::Point(p), Curve::Point(q)) => {
            (p - q).norm() <= a.point_tolerance(tol).max(b.point_tolerance(tol))
        }
        _ => false,
    }
}

/// Incidence of a point with a curve, one record per parameter.
pub(super) fn point_on_curve(
    point: &Curve,
    curve: &Curve,
    tol: &Tolerance,
    extended: bool,
) -> Result<Vec<Intersection>> {
    let Curve::Point(p) = point else {
        return Ok(Vec::new());
    };
    let params = if extended {
        curve.trajectory_params(p, tol)?
    } else {
        curve.params_of_point(p, tol)?
    };
    Ok(params
        .into_iter()
        .map(|t| Intersection {
            point: *p,
            param_a: 0.0,
            param_b: t,
            multiplicity: 1,
        })
        .collect())
}

use crate::error::Result;
use crate::geometry::curve::Curve;
use crate::math::tolerance::Tolerance;

use super::solve::polynomial_into_implicit;
use super::Intersection;

pub(super) fn line_line(a: &Curve, b: &Curve, tol: &Tolerance, extended: bool) -> Result<Vec<Intersection>> {
    polynomial_into_implicit(a, b, tol, extended)
}

/// The Bézier is substituted into the line's implicit equation.
pub(super) fn line_bezier(line: &Curve, bezier: &Curve, tol: &Tolerance, extended: bool) -> Result<Vec<Intersection>> {
    let records = polynomial_into_implicit(bezier, line, tol, extended)?;
    Ok(records.into_iter().map(Intersection::swapped).collect())
}

/// The segment is substituted into the ellipse equation.
pub(super) fn line_arc(line: &Curve, arc: &Curve, tol: &Tolerance, extended: bool) -> Result<Vec<Intersection>> {
    polynomial_into_implicit(line, arc, tol, extended)
}

use std::f64::consts::{PI, TAU};

use crate::error::{IntersectionError, Result};
use crate::geometry::bbox::BoundingBox;
use crate::geometry::curve::Curve;
use crate::math::angle::from_half_angle;
use crate::math::bivariate::Bivariate;
use crate::math::polynomial::Polynomial;
use crate::math::tolerance::{compare_implicit_coefficients, Tolerance};
use crate::math::{cross, Vector2};

use super::Intersection;

/// Fraction of the coefficient epsilon below which a composed polynomial is
/// treated as identically zero.
const VANISHING_FACTOR: f64 = 1e-3;

/// Offset that moves the common bounding box of two curves to the origin.
fn common_shift(a: &Curve, b: &Curve) -> (Vector2, BoundingBox) {
    let bbox = a.bounding_box().union(&b.bounding_box());
    let shift = -bbox.center().coords;
    let half = BoundingBox {
        min: bbox.min + shift,
        max: bbox.max + shift,
    };
    (shift, half)
}

/// Implicit equation of `curve` after translation, scaled to unit maximum.
fn shifted_implicit(curve: &Curve, shift: &Vector2) -> Option<Bivariate> {
    curve.translated(shift).implicit().map(|f| f.normalized())
}

/// Errors out when a composed polynomial has collapsed to zero.
fn check_vanishing(poly: &Polynomial, implicit: &Bivariate, frame: &BoundingBox, tol: &Tolerance) -> Result<()> {
    let bx = frame.min.x.abs().max(frame.max.x.abs());
    let by = frame.min.y.abs().max(frame.max.y.abs());
    let bound = implicit.magnitude_bound(bx, by).max(1.0);
    if poly.max_abs() <= tol.coefficient_epsilon * VANISHING_FACTOR * bound {
        return Err(IntersectionError::VanishingResultant.into());
    }
    Ok(())
}

/// Returns `true` if two curves of one implicit family share a trajectory.
///
/// Both implicit equations are computed about the pair's common center and
/// compared up to scale.
pub(super) fn same_implicit(a: &Curve, b: &Curve, tol: &Tolerance) -> bool {
    let (shift, _) = common_shift(a, b);
    let (Some(fa), Some(fb)) = (shifted_implicit(a, &shift), shifted_implicit(b, &shift)) else {
        return false;
    };
    if fa.degree() != fb.degree() {
        return false;
    }
    compare_implicit_coefficients(&fa.flattened(), &fb.flattened(), tol.coefficient_epsilon)
}

/// Substitutes the polynomial curve `param` into the implicit equation of
/// `implicit` and converts the real roots into records.
///
/// `param_a` of every record lies on `param`, `param_b` on `implicit`.
pub(super) fn polynomial_into_implicit(
    param: &Curve,
    implicit: &Curve,
    tol: &Tolerance,
    extended: bool,
) -> Result<Vec<Intersection>> {
    let (shift, frame) = common_shift(param, implicit);
    let Some((x, y)) = param.translated(&shift).polynomial() else {
        return Ok(Vec::new());
    };
    let Some(f) = shifted_implicit(implicit, &shift) else {
        return Ok(Vec::new());
    };
    let poly = f.compose(&x, &y);
    check_vanishing(&poly, &f, &frame, tol)?;

    let mut candidates = Vec::new();
    for root in poly.real_roots(tol)? {
        let t = root.value;
        if extended {
            candidates.push((t, root.multiplicity));
        } else if t >= -tol.time_epsilon && t <= 1.0 + tol.time_epsilon {
            candidates.push((t.clamp(0.0, 1.0), root.multiplicity));
        }
    }
    build_records(param, implicit, &candidates, tol, extended)
}

/// Substitutes the half-angle form of the arc `param` into the implicit
/// equation of `implicit`.
///
/// Roots lost at `τ = ∞` show up as a drop in effective degree and are
/// restored at `θ = π`.
pub(super) fn half_angle_into_implicit(
    param: &Curve,
    implicit: &Curve,
    tol: &Tolerance,
    extended: bool,
) -> Result<Vec<Intersection>> {
    let (shift, frame) = common_shift(param, implicit);
    let Curve::Arc(arc) = param.translated(&shift) else {
        return Ok(Vec::new());
    };
    let Some(f) = shifted_implicit(implicit, &shift) else {
        return Ok(Vec::new());
    };
    let (x, y, w) = arc.half_angle_polynomials();
    let poly = f.compose_homogeneous(&x, &y, &w);
    check_vanishing(&poly, &f, &frame, tol)?;

    let nominal = 2 * f.degree();
    let deficit = nominal.saturating_sub(poly.effective_degree());
    let mut angles: Vec<(f64, usize)> = poly
        .real_roots_clustered(tol, tol.trigonometric_epsilon)?
        .into_iter()
        .map(|r| (from_half_angle(r.value), r.multiplicity))
        .collect();
    if deficit > 0 {
        angles.push((PI, deficit));
    }
    let angles = merge_at_pi(angles, tol.angle_epsilon);

    let (lo, _) = arc.param_range();
    let mut candidates = Vec::new();
    for (theta, multiplicity) in angles {
        if extended {
            let k = ((lo - tol.angle_epsilon - theta) / TAU).ceil();
            candidates.push((theta + k * TAU, multiplicity));
        } else if let Some(t) = arc.wrap_into_span(theta, tol.angle_epsilon) {
            candidates.push((t, multiplicity));
        }
    }
    build_records(param, implicit, &candidates, tol, extended)
}

/// Folds angles within `eps` of `±π` into a single root at `π`.
fn merge_at_pi(angles: Vec<(f64, usize)>, eps: f64) -> Vec<(f64, usize)> {
    let near_pi = |a: f64| PI - a.abs() <= eps;
    let at_pi: usize = angles.iter().filter(|(a, _)| near_pi(*a)).map(|(_, m)| m).sum();
    let mut out: Vec<(f64, usize)> = angles.into_iter().filter(|(a, _)| !near_pi(*a)).collect();
    if at_pi > 0 {
        out.push((PI, at_pi));
    }
    out
}

/// Turns candidate parameters on `param` into records by locating the
/// matching parameters on `implicit`.
///
/// At the node of a self-intersecting cubic one root stands for several
/// branches; each branch becomes its own record, tangential or not by the
/// angle between the tangents. Roots that split numerically but land on the
/// same point of `implicit` are folded back together.
fn build_records(
    param: &Curve,
    implicit: &Curve,
    candidates: &[(f64, usize)],
    tol: &Tolerance,
    extended: bool,
) -> Result<Vec<Intersection>> {
    let near = param.point_tolerance(tol).max(implicit.point_tolerance(tol));
    let split = tol.time_epsilon.sqrt();
    let mut out: Vec<Intersection> = Vec::new();
    for &(t, multiplicity) in candidates {
        let point = param.point_at(t);
        let params = if extended {
            implicit.trajectory_params(&point, tol)?
        } else {
            implicit.params_of_point(&point, tol)?
        };
        let node = params.len() > 1;
        let d = param.derivatives(t)[0];
        for u in params {
            let multiplicity = if node {
                let e = implicit.derivatives(u)[0];
                let tangent = cross(&d, &e).abs() <= tol.angle_epsilon * d.norm() * e.norm();
                if tangent {
                    2
                } else {
                    1
                }
            } else {
                multiplicity
            };
            let existing = out.iter_mut().find(|r| {
                (r.param_b - u).abs() <= tol.time_epsilon
                    && (r.param_a - t).abs() <= split
                    && (r.point - point).norm() <= near
            });
            match existing {
                Some(r) if node => r.multiplicity = r.multiplicity.max(multiplicity),
                Some(r) => r.multiplicity += multiplicity,
                None => out.push(Intersection {
                    point,
                    param_a: t,
                    param_b: u,
                    multiplicity,
                }),
            }
        }
    }
    Ok(out)
}

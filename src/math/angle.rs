use std::f64::consts::{PI, TAU};

/// Normalizes an angle to `[0, 2π)`.
#[must_use]
pub fn normalize(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Normalizes an angle to `(-π, π]`.
#[must_use]
pub fn normalize_signed(angle: f64) -> f64 {
    let a = normalize(angle);
    if a > PI {
        a - TAU
    } else {
        a
    }
}

/// Maps `angle` onto the equivalent value inside the span between `start` and
/// `end` (either order), widened by `eps`.
///
/// When several equivalents fit (a full-turn span), the one closest to the
/// lower bound is returned. Results are clamped to the span.
#[must_use]
pub fn param_in_span(angle: f64, start: f64, end: f64, eps: f64) -> Option<f64> {
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    let k = ((lo - eps - angle) / TAU).ceil();
    let p = angle + k * TAU;
    if p <= hi + eps {
        Some(p.clamp(lo, hi))
    } else {
        None
    }
}

/// Every equivalent of `angle` inside the span between `start` and `end`.
///
/// A full-turn span yields two values when `angle` sits on its seam.
#[must_use]
pub fn params_in_span(angle: f64, start: f64, end: f64, eps: f64) -> Vec<f64> {
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    let mut out = Vec::new();
    let k = ((lo - eps - angle) / TAU).ceil();
    let mut p = angle + k * TAU;
    while p <= hi + eps {
        let q = p.clamp(lo, hi);
        if out.last().is_none_or(|last: &f64| (q - last).abs() > eps) {
            out.push(q);
        }
        p += TAU;
    }
    out
}

/// Converts a tangent half-angle value `τ = tan(θ/2)` back into `θ ∈ (-π, π)`.
#[must_use]
pub fn from_half_angle(tau: f64) -> f64 {
    2.0 * tau.atan()
}

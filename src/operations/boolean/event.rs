use std::cmp::Ordering;
use std::f64::consts::FRAC_PI_4;

use nalgebra::Rotation2;

use crate::geometry::curve::Curve;
use crate::math::tolerance::Tolerance;
use crate::math::{compare_points, Point2, Vector2};

use super::mono::MonoId;
use super::status::StatusId;

slotmap::new_key_type! {
    /// Unique identifier for an event in the sweep arena.
    pub struct EventId;
}

/// The enter or leave event of a monotone segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepEvent {
    pub mono: MonoId,
    pub is_enter: bool,
    /// The opposite event of the same segment.
    pub other: EventId,
    /// Status node of the segment; set on the leave event while the segment
    /// is active.
    pub status: Option<StatusId>,
    /// Creation order, kept across updates.
    pub seq: u64,
}

/// Local shape of a curve leaving a point towards increasing x: the first
/// three derivatives of `y` with respect to `x`.
///
/// A vertical tangent has no finite slope. Such keys are computed in a
/// frame turned by π/4 (against the tangent's sign) and ranked above (or,
/// pointing down, below) every finite slope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeKey {
    vertical: i8,
    d: [f64; 3],
}

impl SlopeKey {
    /// Key of `curve` at parameter `t`, in its direction of travel.
    #[must_use]
    pub fn at(curve: &Curve, t: f64, tol: &Tolerance) -> Self {
        let (t0, t1) = curve.domain();
        let s = if t1 >= t0 { 1.0 } else { -1.0 };
        let [d1, d2, d3] = curve.derivatives(t);
        let mut d = [d1 * s, d2, d3 * s];
        // Cusp: the tangent comes from the next derivative.
        if d[0].norm() <= tol.epsilon {
            d = [d[1], d[2], Vector2::zeros()];
        }
        Self::from_derivatives(d, tol)
    }

    fn from_derivatives(mut d: [Vector2; 3], tol: &Tolerance) -> Self {
        let len = d[0].norm();
        let vertical: i8 = if d[0].x.abs() <= tol.angle_epsilon * len {
            if d[0].y > 0.0 {
                1
            } else {
                -1
            }
        } else {
            0
        };
        if vertical != 0 {
            let r = Rotation2::new(-f64::from(vertical) * FRAC_PI_4);
            d = d.map(|v| r * v);
        }
        let (x1, y1) = (d[0].x, d[0].y);
        let (x2, y2) = (d[1].x, d[1].y);
        let (x3, y3) = (d[2].x, d[2].y);
        let c2 = x1 * y2 - y1 * x2;
        Self {
            vertical,
            d: [
                y1 / x1,
                c2 / x1.powi(3),
                (x1 * (x1 * y3 - y1 * x3) - 3.0 * x2 * c2) / x1.powi(5),
            ],
        }
    }

    /// Ranks keys from the lowest to the highest outgoing branch.
    ///
    /// Derivatives closer than `eps` (relative to their size) tie and defer
    /// to the next one.
    #[must_use]
    pub fn compare(&self, other: &Self, eps: f64) -> Ordering {
        self.vertical.cmp(&other.vertical).then_with(|| {
            for (a, b) in self.d.iter().zip(&other.d) {
                if (a - b).abs() > eps * a.abs().max(b.abs()).max(1.0) {
                    return a.total_cmp(b);
                }
            }
            Ordering::Equal
        })
    }
}

/// Position of an event in the queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventKey {
    pub point: Point2,
    pub is_enter: bool,
    pub slope: SlopeKey,
    pub seq: u64,
}

impl EventKey {
    /// x then y; leave before enter; lower slope first; older first.
    #[must_use]
    pub fn compare(&self, other: &Self, point_eps: f64, slope_eps: f64) -> Ordering {
        compare_points(&self.point, &other.point, point_eps)
            .then_with(|| self.is_enter.cmp(&other.is_enter))
            .then_with(|| self.slope.compare(&other.slope, slope_eps))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

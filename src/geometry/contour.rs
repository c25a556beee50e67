use crate::error::{GeometryError, Result};
use crate::math::tolerance::Tolerance;
use crate::math::Point2;

use super::bbox::BoundingBox;
use super::curve::{Arc, Curve, Ray};

/// A closed figure made of curve primitives joined end to start.
///
/// The last curve connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    curves: Vec<Curve>,
}

impl Contour {
    /// Creates a contour from curves that join end to start and close up.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NotClosed`] with the index of the first curve
    /// whose end does not meet the next start, and the validation errors of
    /// [`Curve::validate`].
    pub fn new(curves: Vec<Curve>, tol: &Tolerance) -> Result<Self> {
        for curve in &curves {
            curve.validate()?;
        }
        let n = curves.len();
        for (i, curve) in curves.iter().enumerate() {
            let next = &curves[(i + 1) % n];
            let gap = (curve.end() - next.start()).norm();
            if gap > tol.epsilon.max(curve.point_tolerance(tol)) {
                return Err(GeometryError::NotClosed { index: i }.into());
            }
        }
        Ok(Self { curves })
    }

    /// A closed polygon through `points`.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate is not finite.
    pub fn polygon(points: &[Point2]) -> Result<Self> {
        let n = points.len();
        let curves = (0..n)
            .map(|i| Curve::segment(points[i], points[(i + 1) % n]))
            .collect();
        Self::new(curves, &Tolerance::default())
    }

    /// The axis-aligned rectangle between `min` and `max`, counter-clockwise.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate is not finite.
    pub fn rectangle(min: Point2, max: Point2) -> Result<Self> {
        Self::polygon(&[
            min,
            Point2::new(max.x, min.y),
            max,
            Point2::new(min.x, max.y),
        ])
    }

    /// A counter-clockwise circle made of one full-turn arc.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is negative or a value is not finite.
    pub fn circle(center: Point2, radius: f64) -> Result<Self> {
        let arc = Arc::circular(center, radius, 0.0, std::f64::consts::TAU)?;
        Ok(Self {
            curves: vec![Curve::Arc(arc)],
        })
    }

    #[must_use]
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Bounding box of all curves. `None` for an empty contour.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.curves
            .iter()
            .map(Curve::bounding_box)
            .reduce(|a, b| a.union(&b))
    }

    /// The same contour traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            curves: self.curves.iter().rev().map(Curve::reversed).collect(),
        }
    }

    /// Winding number of the contour around `p`, counter-clockwise positive.
    ///
    /// Counted by brute force along a horizontal ray. Meaningless for points
    /// on the boundary.
    #[must_use]
    pub fn winding_number(&self, p: &Point2, tol: &Tolerance) -> i32 {
        let ray = Ray::horizontal(*p);
        self.curves.iter().map(|c| ray.crossings(c, tol)).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::QuadraticBezier;

    #[test]
    fn open_chain_is_rejected() {
        let curves = vec![
            Curve::segment(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)),
            Curve::segment(Point2::new(1.0, 0.0), Point2::new(1.0, 1.0)),
        ];
        let err = Contour::new(curves, &Tolerance::default());
        assert!(matches!(
            err,
            Err(crate::ArcweaveError::Geometry(GeometryError::NotClosed { index: 1 }))
        ));
    }

    #[test]
    fn rectangle_winding() {
        let tol = Tolerance::default();
        let rect = Contour::rectangle(Point2::new(0.0, 0.0), Point2::new(4.0, 4.0)).unwrap();
        assert_eq!(rect.len(), 4);
        assert_eq!(rect.winding_number(&Point2::new(2.0, 2.0), &tol), 1);
        assert_eq!(rect.winding_number(&Point2::new(5.0, 2.0), &tol), 0);
        assert_eq!(rect.reversed().winding_number(&Point2::new(2.0, 2.0), &tol), -1);
    }

    #[test]
    fn ray_through_vertex_counts_once() {
        let tol = Tolerance::default();
        let diamond = Contour::polygon(&[
            Point2::new(0.0, -1.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(-1.0, 0.0),
        ])
        .unwrap();
        assert_eq!(diamond.winding_number(&Point2::new(0.0, 0.0), &tol), 1);
        assert_eq!(diamond.winding_number(&Point2::new(-2.0, 0.0), &tol), 0);
    }

    #[test]
    fn circle_winding() {
        let tol = Tolerance::default();
        let circle = Contour::circle(Point2::new(1.0, 1.0), 2.0).unwrap();
        assert_eq!(circle.winding_number(&Point2::new(1.5, 1.0), &tol), 1);
        assert_eq!(circle.winding_number(&Point2::new(1.0, 3.5), &tol), 0);
        let bbox = circle.bounding_box().unwrap();
        assert!((bbox.max.x - 3.0).abs() < 1e-9);
    }

    #[test]
    fn curved_contour_winding() {
        let tol = Tolerance::default();
        let contour = Contour::new(
            vec![
                Curve::Quadratic(QuadraticBezier::new(
                    Point2::new(0.0, 0.0),
                    Point2::new(2.0, -2.0),
                    Point2::new(4.0, 0.0),
                )),
                Curve::Quadratic(QuadraticBezier::new(
                    Point2::new(4.0, 0.0),
                    Point2::new(2.0, 2.0),
                    Point2::new(0.0, 0.0),
                )),
            ],
            &tol,
        )
        .unwrap();
        assert_eq!(contour.winding_number(&Point2::new(2.0, 0.5), &tol), 1);
        assert_eq!(contour.winding_number(&Point2::new(2.0, 1.5), &tol), 0);
    }
}

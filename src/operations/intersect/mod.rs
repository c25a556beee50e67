mod arc;
mod bezier;
mod classify;
mod coincide;
mod dispatch;
mod line;
mod point;
mod solve;

use std::cell::OnceCell;

pub use coincide::{classify_intervals, IntervalRelation, Overlap};
pub use dispatch::{resolver_for, Degeneration, Resolver};

use crate::error::Result;
use crate::geometry::curve::{Curve, CurveKind, Reduction};
use crate::math::tolerance::Tolerance;
use crate::math::Point2;

/// One intersection of two curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Intersection coordinates.
    pub point: Point2,
    /// Parameter on the first curve.
    pub param_a: f64,
    /// Parameter on the second curve.
    pub param_b: f64,
    /// Algebraic multiplicity; odd for crossings, even for tangencies.
    pub multiplicity: usize,
}

impl Intersection {
    /// Returns `true` for odd multiplicity (transversal crossing).
    #[must_use]
    pub fn is_strike(&self) -> bool {
        self.multiplicity % 2 == 1
    }

    /// Returns `true` for even multiplicity (tangential contact).
    #[must_use]
    pub fn is_contact(&self) -> bool {
        self.multiplicity % 2 == 0
    }

    /// The same intersection seen from the other curve.
    #[must_use]
    pub fn swapped(self) -> Self {
        Self {
            param_a: self.param_b,
            param_b: self.param_a,
            ..self
        }
    }
}

/// Intersection queries between two curves.
///
/// Results are computed on first access and kept for later calls.
#[derive(Debug)]
pub struct Intersector {
    a: Curve,
    b: Curve,
    reduced_a: Reduction,
    reduced_b: Reduction,
    degeneration: Degeneration,
    tol: Tolerance,
    same_trajectory: OnceCell<bool>,
    proper: OnceCell<Vec<Intersection>>,
    extended: OnceCell<Vec<Intersection>>,
    overlaps: OnceCell<Vec<Overlap>>,
}

impl Intersector {
    /// Prepares the intersection of `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns an error if either curve has non-finite coordinates or an
    /// invalid arc span.
    pub fn new(a: Curve, b: Curve, tol: &Tolerance) -> Result<Self> {
        a.validate()?;
        b.validate()?;
        let reduced_a = a.reduce(tol);
        let reduced_b = b.reduce(tol);
        let degeneration = Degeneration::resolve(&reduced_a.curve, &reduced_b.curve, tol);
        Ok(Self {
            a,
            b,
            reduced_a,
            reduced_b,
            degeneration,
            tol: *tol,
            same_trajectory: OnceCell::new(),
            proper: OnceCell::new(),
            extended: OnceCell::new(),
            overlaps: OnceCell::new(),
        })
    }

    /// The first curve as given.
    #[must_use]
    pub fn first(&self) -> &Curve {
        &self.a
    }

    /// The second curve as given.
    #[must_use]
    pub fn second(&self) -> &Curve {
        &self.b
    }

    /// The resolver chosen after degeneracy reduction.
    #[must_use]
    pub fn degeneration(&self) -> Degeneration {
        self.degeneration
    }

    #[must_use]
    pub fn tolerance(&self) -> &Tolerance {
        &self.tol
    }

    /// Reduced curves in the order the resolver expects.
    fn canonical(&self) -> (&Curve, &Curve) {
        if self.degeneration.inverse {
            (&self.reduced_b.curve, &self.reduced_a.curve)
        } else {
            (&self.reduced_a.curve, &self.reduced_b.curve)
        }
    }

    /// Returns `true` if both curves lie on the same underlying trajectory.
    #[must_use]
    pub fn on_same_trajectory(&self) -> bool {
        *self.same_trajectory.get_or_init(|| {
            let Some(resolver) = self.degeneration.resolver else {
                return false;
            };
            let (first, second) = self.canonical();
            resolver.same_trajectory(first, second, &self.tol)
        })
    }

    /// Intersections within both curves' domains, ordered by `param_a`.
    ///
    /// Empty for curves on the same trajectory; see [`Intersector::coincide`].
    ///
    /// # Errors
    ///
    /// Returns an error if the elimination polynomial vanishes identically
    /// or its roots cannot be computed.
    pub fn proper_intersection(&self) -> Result<&[Intersection]> {
        if let Some(records) = self.proper.get() {
            return Ok(records);
        }
        let records = self.compute(false)?;
        Ok(self.proper.get_or_init(|| records))
    }

    /// Intersections of the unbounded trajectories.
    ///
    /// # Errors
    ///
    /// See [`Intersector::proper_intersection`].
    pub fn extended_intersection(&self) -> Result<&[Intersection]> {
        if let Some(records) = self.extended.get() {
            return Ok(records);
        }
        let records = self.compute(true)?;
        Ok(self.extended.get_or_init(|| records))
    }

    fn compute(&self, extended: bool) -> Result<Vec<Intersection>> {
        let Some(resolver) = self.degeneration.resolver else {
            return Ok(Vec::new());
        };
        if (self.degeneration.disjoint && !extended) || self.on_same_trajectory() {
            return Ok(Vec::new());
        }
        let (first, second) = self.canonical();
        let mut records = resolver.proper(first, second, &self.tol, extended)?;
        if self.degeneration.inverse {
            records = records.into_iter().map(Intersection::swapped).collect();
        }
        let mut records = self.restore_params(records, extended)?;
        records.sort_by(|x, y| {
            x.param_a
                .total_cmp(&y.param_a)
                .then(x.param_b.total_cmp(&y.param_b))
        });
        Ok(records)
    }

    /// Overlapping pieces and shared points of curves on the same trajectory.
    ///
    /// # Errors
    ///
    /// Returns an error if a shared end point cannot be projected back onto
    /// one of the curves.
    pub fn coincide(&self) -> Result<&[Overlap]> {
        if let Some(overlaps) = self.overlaps.get() {
            return Ok(overlaps);
        }
        let overlaps = if self.on_same_trajectory() {
            let (first, second) = self.canonical();
            let mut overlaps = coincide::overlaps(first, second, &self.tol)?;
            if self.degeneration.inverse {
                overlaps = overlaps.into_iter().map(Overlap::swapped).collect();
            }
            self.restore_overlaps(overlaps)?
        } else {
            Vec::new()
        };
        Ok(self.overlaps.get_or_init(|| overlaps))
    }

    /// Maps parameters computed on reduced curves back onto the originals.
    fn restore_params(&self, records: Vec<Intersection>, extended: bool) -> Result<Vec<Intersection>> {
        if !self.reduced_a.reparametrized && !self.reduced_b.reparametrized {
            return Ok(records);
        }
        let mut out = Vec::with_capacity(records.len());
        for rec in records {
            let params_a = self.restore(true, rec.param_a, &rec.point, extended)?;
            let params_b = self.restore(false, rec.param_b, &rec.point, extended)?;
            for &param_a in &params_a {
                for &param_b in &params_b {
                    out.push(Intersection {
                        param_a,
                        param_b,
                        ..rec
                    });
                }
            }
        }
        Ok(out)
    }

    fn restore(&self, first: bool, t: f64, point: &Point2, extended: bool) -> Result<Vec<f64>> {
        let (original, reduction) = if first {
            (&self.a, &self.reduced_a)
        } else {
            (&self.b, &self.reduced_b)
        };
        if !reduction.reparametrized {
            return Ok(vec![t]);
        }
        if reduction.curve.kind() == CurveKind::Point {
            return Ok(vec![original.domain().0]);
        }
        if extended {
            original.trajectory_params(point, &self.tol)
        } else {
            original.params_of_point(point, &self.tol)
        }
    }

    fn restore_overlaps(&self, overlaps: Vec<Overlap>) -> Result<Vec<Overlap>> {
        if !self.reduced_a.reparametrized && !self.reduced_b.reparametrized {
            return Ok(overlaps);
        }
        let first = |t: f64, p: &Point2| -> Result<f64> {
            Ok(self.restore(true, t, p, false)?.first().copied().unwrap_or(t))
        };
        let second = |t: f64, p: &Point2| -> Result<f64> {
            Ok(self.restore(false, t, p, false)?.first().copied().unwrap_or(t))
        };
        overlaps
            .into_iter()
            .map(|o| {
                Ok(match o {
                    Overlap::Point {
                        point,
                        param_a,
                        param_b,
                    } => Overlap::Point {
                        point,
                        param_a: first(param_a, &point)?,
                        param_b: second(param_b, &point)?,
                    },
                    Overlap::Segment {
                        curve,
                        range_a,
                        range_b,
                    } => {
                        let (s, e) = (curve.start(), curve.end());
                        Overlap::Segment {
                            curve,
                            range_a: (first(range_a.0, &s)?, first(range_a.1, &e)?),
                            range_b: (second(range_b.0, &s)?, second(range_b.1, &e)?),
                        }
                    }
                })
            })
            .collect()
    }
}

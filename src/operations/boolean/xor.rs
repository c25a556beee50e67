use crate::error::Result;
use crate::geometry::contour::Contour;
use crate::math::tolerance::Tolerance;

use super::engine::{boolean_execute, Sweep};
use super::fill::FillRule;
use super::select::{BooleanOp, BoundarySegment};

/// Computes the region covered by exactly one of the two sets of contours.
pub struct Xor {
    sweep: Sweep,
}

impl Xor {
    /// Creates a new `Xor` operation.
    #[must_use]
    pub fn new(primary: Vec<Contour>, secondary: Vec<Contour>) -> Self {
        Self {
            sweep: Sweep::new(primary, secondary),
        }
    }

    #[must_use]
    pub fn with_fill_rules(self, primary: FillRule, secondary: FillRule) -> Self {
        Self {
            sweep: self.sweep.with_fill_rules(primary, secondary),
        }
    }

    #[must_use]
    pub fn with_tolerance(self, tolerance: Tolerance) -> Self {
        Self {
            sweep: self.sweep.with_tolerance(tolerance),
        }
    }

    /// Executes the symmetric difference.
    ///
    /// # Errors
    ///
    /// Returns an error if the sweep fails.
    pub fn execute(&self) -> Result<Vec<BoundarySegment>> {
        boolean_execute(&self.sweep, BooleanOp::Xor)
    }
}

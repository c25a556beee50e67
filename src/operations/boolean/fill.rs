use std::ops::{Add, AddAssign};

use crate::math::tolerance::Tolerance;

use super::mono::MonoSegment;

/// Rule turning a winding number into inside/outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillRule {
    /// Inside wherever the winding number is not zero.
    #[default]
    NonZero,
    /// Inside wherever the winding number is odd.
    EvenOdd,
}

impl FillRule {
    #[must_use]
    pub fn is_filled(self, winding: i32) -> bool {
        match self {
            Self::NonZero => winding != 0,
            Self::EvenOdd => winding % 2 != 0,
        }
    }
}

/// Winding numbers of a region (or winding contributions of a segment)
/// with respect to each operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Windings {
    pub primary: i32,
    pub secondary: i32,
}

impl Windings {
    #[must_use]
    pub fn new(primary: i32, secondary: i32) -> Self {
        Self { primary, secondary }
    }
}

impl Add for Windings {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            primary: self.primary + rhs.primary,
            secondary: self.secondary + rhs.secondary,
        }
    }
}

impl AddAssign for Windings {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Inside/outside flags of both operands on each side of a segment.
///
/// "Above" is the region to the left of the segment when it is traversed
/// from its enter to its leave point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fill {
    pub primary_above: bool,
    pub primary_below: bool,
    pub secondary_above: bool,
    pub secondary_below: bool,
}

impl Fill {
    /// Applies the per-operand fill rules to the windings on both sides.
    #[must_use]
    pub fn from_windings(above: Windings, below: Windings, primary: FillRule, secondary: FillRule) -> Self {
        Self {
            primary_above: primary.is_filled(above.primary),
            primary_below: primary.is_filled(below.primary),
            secondary_above: secondary.is_filled(above.secondary),
            secondary_below: secondary.is_filled(below.secondary),
        }
    }
}

/// The active segments just left of a sweep position.
///
/// Vertical segments lie on a single sweep line and never see the status
/// list from the left, so their windings are read from here.
#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    x: f64,
    members: Vec<MonoSegment>,
}

impl Snapshot {
    pub(crate) fn new(x: f64, members: Vec<MonoSegment>) -> Self {
        Self { x, members }
    }

    pub(crate) fn x(&self) -> f64 {
        self.x
    }

    /// Sum of the windings of the members passing above height `y` at the
    /// snapshot position.
    pub(crate) fn windings_above(&self, y: f64, tol: &Tolerance) -> Windings {
        self.members
            .iter()
            .filter(|m| m.y_at(self.x, tol) > y)
            .fold(Windings::default(), |acc, m| acc + m.windings())
    }
}

pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;

pub use error::{ArcweaveError, Result};
pub use geometry::contour::Contour;
pub use geometry::curve::{Arc, CubicBezier, Curve, CurveKind, LineSegment, QuadraticBezier};
pub use math::tolerance::Tolerance;
pub use operations::boolean::{
    BooleanOp, BoundarySegment, Fill, FillRule, Intersect, Subtract, Sweep, SweepResult,
    SweepSegment, Union, Windings, Xor,
};
pub use operations::intersect::{Intersection, Intersector, Overlap};

pub mod bbox;
pub mod contour;
pub mod curve;

pub use bbox::BoundingBox;
pub use contour::Contour;
pub use curve::{Arc, CubicBezier, Curve, CurveKind, Line, LineSegment, QuadraticBezier, Ray};

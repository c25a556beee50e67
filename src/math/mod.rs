pub mod angle;
pub mod bezout;
pub mod bivariate;
pub mod polynomial;
pub mod tolerance;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-9;

/// 2D cross product (z component of the 3D cross product).
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Lexicographic comparison of points (x first, then y) with tolerance.
#[must_use]
pub fn compare_points(a: &Point2, b: &Point2, eps: f64) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    if (a.x - b.x).abs() > eps {
        return if a.x < b.x {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    if (a.y - b.y).abs() > eps {
        return if a.y < b.y {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    Ordering::Equal
}

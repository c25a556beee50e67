use thiserror::Error;

use crate::geometry::curve::CurveKind;

/// Top-level error type for the arcweave kernel.
#[derive(Debug, Error)]
pub enum ArcweaveError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Intersection(#[from] IntersectionError),

    #[error(transparent)]
    Sweep(#[from] SweepError),
}

/// Errors caused by invalid curve input.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("non-finite coordinate in {0}")]
    InvalidCoordinate(&'static str),

    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("monotone piece from ({x0}, {y0}) to ({x1}, {y1}) is too tiny")]
    TooTiny { x0: f64, y0: f64, x1: f64, y1: f64 },

    #[error("contour is not closed at curve {index}")]
    NotClosed { index: usize },
}

/// Errors raised while eliminating or solving intersection polynomials.
#[derive(Debug, Error)]
pub enum IntersectionError {
    #[error("resultant vanishes identically for curves not on the same trajectory")]
    VanishingResultant,

    #[error("no resolver for {0:?} and {1:?}")]
    UnsupportedPair(CurveKind, CurveKind),

    #[error("root finding failed: {0}")]
    RootFinding(String),
}

/// Broken invariants inside the sweep-line engine.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("sweep event not found")]
    MissingEvent,

    #[error("monotone segment not found")]
    MissingSegment,

    #[error("leave event has no status node")]
    MissingStatus,

    #[error("segment left the sweep without fill flags")]
    UnfilledSegment,

    #[error("sweep invariant violated: {0}")]
    InvariantViolation(String),
}

/// Convenience type alias for results using [`ArcweaveError`].
pub type Result<T> = std::result::Result<T, ArcweaveError>;

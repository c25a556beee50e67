#![allow(clippy::unwrap_used)]

use approx::assert_abs_diff_eq;
use arcweave::math::{Point2, Vector2};
use arcweave::{
    BoundarySegment, Contour, CubicBezier, Curve, FillRule, Intersect, QuadraticBezier, Subtract,
    Sweep, SweepResult, Tolerance, Union,
};
use tracing_subscriber::EnvFilter;

/// Distance of the sample points from a segment.
const DELTA: f64 = 1e-4;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("arcweave=info"))
        .with_test_writer()
        .try_init();
}

fn p(x: f64, y: f64) -> Point2 {
    Point2::new(x, y)
}

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Contour {
    Contour::rectangle(p(x0, y0), p(x1, y1)).unwrap()
}

fn inside(operand: &[Contour], q: &Point2, rule: FillRule) -> bool {
    let tol = Tolerance::default();
    let winding = operand.iter().map(|c| c.winding_number(q, &tol)).sum::<i32>();
    match rule {
        FillRule::NonZero => winding != 0,
        FillRule::EvenOdd => winding % 2 != 0,
    }
}

fn assert_fills_match(primary: &[Contour], secondary: &[Contour], result: &SweepResult) {
    assert_fills_match_under(primary, secondary, result, (FillRule::NonZero, FillRule::NonZero));
}

/// Compares every fill flag with brute-force winding numbers just above and
/// below the middle of each segment. Vertical segments are tested on their
/// left and right.
fn assert_fills_match_under(
    primary: &[Contour],
    secondary: &[Contour],
    result: &SweepResult,
    (primary_rule, secondary_rule): (FillRule, FillRule),
) {
    assert!(!result.segments.is_empty());
    for s in &result.segments {
        let (t0, t1) = s.curve.domain();
        let mid = s.curve.point_at(0.5 * (t0 + t1));
        let normal = if (s.leave.x - s.enter.x).abs() < 1e-9 {
            Vector2::new(-1.0, 0.0)
        } else {
            Vector2::new(0.0, 1.0)
        };
        let (above, below) = (mid + normal * DELTA, mid - normal * DELTA);
        assert_eq!(s.fill.primary_above, inside(primary, &above, primary_rule), "{s:?}");
        assert_eq!(s.fill.primary_below, inside(primary, &below, primary_rule), "{s:?}");
        assert_eq!(s.fill.secondary_above, inside(secondary, &above, secondary_rule), "{s:?}");
        assert_eq!(s.fill.secondary_below, inside(secondary, &below, secondary_rule), "{s:?}");
    }
}

/// Five-pointed star drawn as one self-intersecting polygon.
fn pentagram(radius: f64) -> Contour {
    let points: Vec<Point2> = (0..5_i32)
        .map(|k| {
            let angle = std::f64::consts::FRAC_PI_2 + f64::from(k) * 4.0 * std::f64::consts::PI / 5.0;
            p(radius * angle.cos(), radius * angle.sin())
        })
        .collect();
    Contour::polygon(&points).unwrap()
}

fn area(boundary: &[BoundarySegment]) -> f64 {
    boundary
        .iter()
        .map(|s| 0.5 * (s.start.x * s.end.y - s.end.x * s.start.y))
        .sum()
}

#[test]
fn squares_union() {
    init_tracing();
    let boundary = Union::new(vec![square(0.0, 0.0, 4.0, 4.0)], vec![square(2.0, 2.0, 6.0, 6.0)])
        .execute()
        .unwrap();
    assert_eq!(boundary.len(), 8);
    assert_abs_diff_eq!(area(&boundary), 28.0, epsilon = 1e-9);
}

#[test]
fn squares_intersection_and_difference() {
    init_tracing();
    let a = vec![square(0.0, 0.0, 4.0, 4.0)];
    let b = vec![square(2.0, 2.0, 6.0, 6.0)];
    let common = Intersect::new(a.clone(), b.clone()).execute().unwrap();
    assert_eq!(common.len(), 4);
    assert_abs_diff_eq!(area(&common), 4.0, epsilon = 1e-9);
    let rest = Subtract::new(b, a).execute().unwrap();
    assert_eq!(rest.len(), 6);
    assert_abs_diff_eq!(area(&rest), 12.0, epsilon = 1e-9);
}

#[test]
fn disjoint_circle_and_square_fills() {
    init_tracing();
    let primary = vec![Contour::circle(p(0.0, 0.0), 1.0).unwrap()];
    let secondary = vec![square(3.0, -1.0, 5.0, 1.0)];
    let result = Sweep::new(primary.clone(), secondary.clone()).execute().unwrap();
    assert_eq!(result.resolved_intersections, 0);
    assert_eq!(result.segments.len(), 6);
    assert_fills_match(&primary, &secondary, &result);
}

#[test]
fn overlapping_circle_and_square_fills() {
    init_tracing();
    let primary = vec![Contour::circle(p(0.0, 0.0), 2.0).unwrap()];
    let secondary = vec![square(1.0, -1.0, 3.0, 1.0)];
    let result = Sweep::new(primary.clone(), secondary.clone()).execute().unwrap();
    assert!(result.resolved_intersections > 0);
    assert_fills_match(&primary, &secondary, &result);
}

#[test]
fn cubic_lens_against_square() {
    init_tracing();
    let tol = Tolerance::default();
    let lens = Contour::new(
        vec![
            Curve::Cubic(CubicBezier::new(p(0.0, 0.0), p(1.0, 3.0), p(3.0, 3.0), p(4.0, 0.0))),
            Curve::segment(p(4.0, 0.0), p(0.0, 0.0)),
        ],
        &tol,
    )
    .unwrap();
    let primary = vec![lens];
    let secondary = vec![square(1.0, -1.0, 3.0, 1.0)];
    let result = Sweep::new(primary.clone(), secondary.clone()).execute().unwrap();
    assert!(result.resolved_intersections > 0);
    assert_fills_match(&primary, &secondary, &result);
}

#[test]
fn identical_squares_merge_every_edge() {
    init_tracing();
    let a = vec![square(0.0, 0.0, 2.0, 2.0)];
    let result = Sweep::new(a.clone(), a.clone()).execute().unwrap();
    assert_eq!(result.segments.len(), 4);
    assert_fills_match(&a, &a, &result);
    assert_eq!(Union::new(a.clone(), a.clone()).execute().unwrap().len(), 4);
    assert!(Subtract::new(a.clone(), a).execute().unwrap().is_empty());
}

#[test]
fn converging_circles_fills() {
    init_tracing();
    let primary = vec![Contour::circle(p(0.0, 0.0), 2.0).unwrap()];
    let secondary = vec![Contour::circle(p(1.5, 0.5), 1.5).unwrap()];
    let result = Sweep::new(primary.clone(), secondary.clone()).execute().unwrap();
    assert!(result.resolved_intersections > 0);
    assert_fills_match(&primary, &secondary, &result);
}

#[test]
fn bezier_operands_fills() {
    init_tracing();
    let tol = Tolerance::default();
    let dome = Contour::new(
        vec![
            Curve::Quadratic(QuadraticBezier::new(p(0.0, 0.0), p(2.0, 4.0), p(4.0, 0.0))),
            Curve::segment(p(4.0, 0.0), p(0.0, 0.0)),
        ],
        &tol,
    )
    .unwrap();
    let wave = Contour::new(
        vec![
            Curve::Cubic(CubicBezier::new(p(1.0, -1.0), p(2.0, 4.0), p(3.0, -2.0), p(5.0, 1.5))),
            Curve::segment(p(5.0, 1.5), p(5.0, -1.0)),
            Curve::segment(p(5.0, -1.0), p(1.0, -1.0)),
        ],
        &tol,
    )
    .unwrap();
    let (primary, secondary) = (vec![dome], vec![wave]);
    for rules in [
        (FillRule::NonZero, FillRule::NonZero),
        (FillRule::EvenOdd, FillRule::EvenOdd),
    ] {
        let result = Sweep::new(primary.clone(), secondary.clone())
            .with_fill_rules(rules.0, rules.1)
            .execute()
            .unwrap();
        assert!(result.resolved_intersections > 0);
        assert_fills_match_under(&primary, &secondary, &result, rules);
    }
}

#[test]
fn self_intersecting_star_fills() {
    init_tracing();
    let primary = vec![pentagram(2.0)];
    let secondary = vec![Contour::circle(p(0.1, 0.05), 1.0).unwrap()];
    for rules in [
        (FillRule::NonZero, FillRule::NonZero),
        (FillRule::EvenOdd, FillRule::NonZero),
        (FillRule::EvenOdd, FillRule::EvenOdd),
    ] {
        let result = Sweep::new(primary.clone(), secondary.clone())
            .with_fill_rules(rules.0, rules.1)
            .execute()
            .unwrap();
        assert!(result.resolved_intersections >= 5);
        assert_fills_match_under(&primary, &secondary, &result, rules);
    }
}

#[test]
fn star_centre_depends_on_the_fill_rule() {
    init_tracing();
    let star = vec![pentagram(2.0)];
    let nonzero = Sweep::new(star.clone(), Vec::new()).execute().unwrap();
    let evenodd = Sweep::new(star.clone(), Vec::new())
        .with_fill_rules(FillRule::EvenOdd, FillRule::NonZero)
        .execute()
        .unwrap();
    // Edges of the inner pentagon lie between the points and the centre.
    let inner = |s: &&arcweave::SweepSegment| {
        let (t0, t1) = s.curve.domain();
        s.curve.point_at(0.5 * (t0 + t1)).coords.norm() < 0.7
    };
    assert_eq!(nonzero.segments.iter().filter(inner).count(), 5);
    assert!(nonzero
        .segments
        .iter()
        .filter(inner)
        .all(|s| s.fill.primary_above && s.fill.primary_below));
    assert!(evenodd
        .segments
        .iter()
        .filter(inner)
        .all(|s| s.fill.primary_above != s.fill.primary_below));
    assert_fills_match_under(&star, &[], &evenodd, (FillRule::EvenOdd, FillRule::NonZero));
}

use std::ops::{Add, Mul, Neg, Sub};

use nalgebra::{Complex, DMatrix};

use tracing::debug;

use crate::error::{IntersectionError, Result};

use super::tolerance::Tolerance;

/// Coefficients below this fraction of the largest one are treated as zero
/// when determining the effective degree.
const DEGREE_CUTOFF: f64 = 1e-12;

/// Newton polishing iterations applied to every eigenvalue root.
const POLISH_ITERATIONS: usize = 8;

/// Iteration cap for the Schur decomposition of the companion matrix.
const SCHUR_MAX_ITERATIONS: usize = 10_000;

/// Relative deflation threshold of the Schur decomposition.
const SCHUR_EPSILON: f64 = 1e-14;

/// Iteration cap for the simultaneous Aberth iteration.
const ABERTH_MAX_ITERATIONS: usize = 500;

/// A polynomial in one variable with coefficients in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

/// A real root with its algebraic multiplicity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    /// Root location.
    pub value: f64,
    /// Number of clustered roots at this location.
    pub multiplicity: usize,
}

impl Polynomial {
    /// Creates a polynomial from ascending coefficients.
    #[must_use]
    pub fn new(coeffs: Vec<f64>) -> Self {
        if coeffs.is_empty() {
            return Self::zero();
        }
        Self { coeffs }
    }

    /// The zero polynomial.
    #[must_use]
    pub fn zero() -> Self {
        Self { coeffs: vec![0.0] }
    }

    /// A constant polynomial.
    #[must_use]
    pub fn constant(c: f64) -> Self {
        Self { coeffs: vec![c] }
    }

    /// `c0 + c1 t`.
    #[must_use]
    pub fn linear(c0: f64, c1: f64) -> Self {
        Self {
            coeffs: vec![c0, c1],
        }
    }

    /// Ascending coefficients.
    #[must_use]
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// Coefficient of `t^i`, zero past the stored length.
    #[must_use]
    pub fn coeff(&self, i: usize) -> f64 {
        self.coeffs.get(i).copied().unwrap_or(0.0)
    }

    /// Index of the highest exactly non-zero coefficient.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coeffs.iter().rposition(|c| *c != 0.0).unwrap_or(0)
    }

    /// Index of the highest coefficient that is not negligible relative to
    /// the largest one.
    #[must_use]
    pub fn effective_degree(&self) -> usize {
        let max = self.max_abs();
        if max == 0.0 {
            return 0;
        }
        self.coeffs
            .iter()
            .rposition(|c| c.abs() > max * DEGREE_CUTOFF)
            .unwrap_or(0)
    }

    /// Largest coefficient magnitude.
    #[must_use]
    pub fn max_abs(&self) -> f64 {
        self.coeffs.iter().fold(0.0_f64, |m, c| m.max(c.abs()))
    }

    /// Returns `true` if every coefficient is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| *c == 0.0)
    }

    /// Evaluates with Horner's scheme.
    #[must_use]
    pub fn eval(&self, t: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * t + c)
    }

    /// First derivative.
    #[must_use]
    pub fn derivative(&self) -> Self {
        if self.coeffs.len() <= 1 {
            return Self::zero();
        }
        #[allow(clippy::cast_precision_loss)]
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| c * i as f64)
            .collect();
        Self { coeffs }
    }

    /// Multiplies every coefficient by `s`.
    #[must_use]
    pub fn scale(&self, s: f64) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|c| c * s).collect(),
        }
    }

    /// `self^n`.
    #[must_use]
    pub fn pow(&self, n: usize) -> Self {
        let mut out = Self::constant(1.0);
        for _ in 0..n {
            out = &out * self;
        }
        out
    }

    /// Composition `self(inner(t))`.
    #[must_use]
    pub fn compose(&self, inner: &Polynomial) -> Self {
        self.coeffs
            .iter()
            .rev()
            .fold(Self::zero(), |acc, c| &(&acc * inner) + &Self::constant(*c))
    }

    /// Builds from arithmetic output, dropping exactly zero leading terms.
    fn stripped(mut coeffs: Vec<f64>) -> Self {
        while coeffs.len() > 1 && coeffs.last() == Some(&0.0) {
            coeffs.pop();
        }
        Self::new(coeffs)
    }

    /// Drops trailing coefficients that are negligible relative to the
    /// largest one.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        let d = self.effective_degree();
        Self {
            coeffs: self.coeffs[..=d].to_vec(),
        }
    }

    /// Real roots clustered by `time_epsilon`, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`IntersectionError::RootFinding`] if the companion matrix
    /// eigenvalues cannot be computed.
    pub fn real_roots(&self, tol: &Tolerance) -> Result<Vec<Root>> {
        self.real_roots_clustered(tol, tol.time_epsilon)
    }

    /// Real roots clustered within `cluster_eps`, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`IntersectionError::RootFinding`] if the companion matrix
    /// eigenvalues cannot be computed.
    pub fn real_roots_clustered(&self, tol: &Tolerance, cluster_eps: f64) -> Result<Vec<Root>> {
        let raw = self.raw_real_roots(tol)?;
        Ok(cluster(raw, cluster_eps))
    }

    /// Unclustered real roots (repeated for multiple roots), ascending.
    fn raw_real_roots(&self, tol: &Tolerance) -> Result<Vec<f64>> {
        let max = self.max_abs();
        if max == 0.0 {
            return Ok(Vec::new());
        }
        let p = self.trimmed().scale(1.0 / max);

        // Exact zero roots.
        let zeros = p.coeffs.iter().take_while(|c| **c == 0.0).count();
        let mut roots = vec![0.0; zeros];
        let reduced = Self {
            coeffs: p.coeffs[zeros..].to_vec(),
        };

        match reduced.coeffs.len() {
            0 | 1 => {}
            2 => roots.push(-reduced.coeffs[0] / reduced.coeffs[1]),
            3 => roots.extend(quadratic_roots(&reduced.coeffs, tol)),
            _ => roots.extend(reduced.eigen_roots(tol)?),
        }

        roots.sort_by(f64::total_cmp);
        Ok(roots)
    }

    fn eigen_roots(&self, tol: &Tolerance) -> Result<Vec<f64>> {
        let n = self.coeffs.len() - 1;
        let lead = self.coeffs[n];
        let companion = DMatrix::<f64>::from_fn(n, n, |i, j| {
            if j == n - 1 {
                -self.coeffs[i] / lead
            } else if i == j + 1 {
                1.0
            } else {
                0.0
            }
        });
        // Francis steps can stall on symmetric root patterns such as two
        // double roots at `±r`.
        let eigenvalues = match companion.try_schur(SCHUR_EPSILON, SCHUR_MAX_ITERATIONS) {
            Some(schur) => schur.complex_eigenvalues().iter().copied().collect(),
            None => {
                debug!(degree = n, "companion Schur stalled, using Aberth iteration");
                self.aberth()?
            }
        };

        let derivative = self.derivative();
        let roots = eigenvalues
            .iter()
            .filter(|z| z.im.abs() <= tol.complex_epsilon * z.re.abs().max(1.0))
            .map(|z| self.polish(&derivative, z.re))
            .collect();
        Ok(roots)
    }

    /// All complex roots by simultaneous Aberth-Ehrlich iteration.
    #[allow(clippy::cast_precision_loss)]
    fn aberth(&self) -> Result<Vec<Complex<f64>>> {
        let n = self.coeffs.len() - 1;
        let lead = self.coeffs[n];
        let radius = 1.0
            + self.coeffs[..n]
                .iter()
                .fold(0.0_f64, |m, c| m.max((c / lead).abs()));
        let mut z: Vec<Complex<f64>> = (0..n)
            .map(|k| {
                let angle = std::f64::consts::TAU * k as f64 / n as f64 + 0.4;
                Complex::new(0.5 * radius * angle.cos(), 0.5 * radius * angle.sin())
            })
            .collect();
        let derivative = self.derivative();
        for _ in 0..ABERTH_MAX_ITERATIONS {
            let mut largest_step = 0.0_f64;
            for k in 0..n {
                let value = self.eval_complex(z[k]);
                if value.norm() == 0.0 {
                    continue;
                }
                let ratio = value / derivative.eval_complex(z[k]);
                let repulsion = (0..n)
                    .filter(|j| *j != k)
                    .fold(Complex::new(0.0, 0.0), |acc, j| acc + (z[k] - z[j]).inv());
                let step = ratio / (Complex::new(1.0, 0.0) - ratio * repulsion);
                if !step.re.is_finite() || !step.im.is_finite() {
                    continue;
                }
                z[k] -= step;
                largest_step = largest_step.max(step.norm() / (1.0 + z[k].norm()));
            }
            if largest_step <= f64::EPSILON {
                break;
            }
        }
        if z.iter().any(|r| !r.re.is_finite() || !r.im.is_finite()) {
            return Err(
                IntersectionError::RootFinding(format!("polynomial of degree {n}")).into(),
            );
        }
        Ok(z)
    }

    fn eval_complex(&self, z: Complex<f64>) -> Complex<f64> {
        self.coeffs
            .iter()
            .rev()
            .fold(Complex::new(0.0, 0.0), |acc, c| acc * z + *c)
    }

    /// Newton refinement that only accepts steps reducing the residual.
    fn polish(&self, derivative: &Polynomial, mut x: f64) -> f64 {
        let mut fx = self.eval(x).abs();
        for _ in 0..POLISH_ITERATIONS {
            let d = derivative.eval(x);
            if d == 0.0 || fx == 0.0 {
                break;
            }
            let next = x - self.eval(x) / d;
            let fn_ = self.eval(next).abs();
            if !next.is_finite() || fn_ >= fx {
                break;
            }
            x = next;
            fx = fn_;
        }
        x
    }
}

/// Closed-form roots of `c0 + c1 t + c2 t²` (with `c2 != 0`), double roots
/// repeated.
fn quadratic_roots(c: &[f64], tol: &Tolerance) -> Vec<f64> {
    let (a, b, cc) = (c[2], c[1], c[0]);
    let disc = b * b - 4.0 * a * cc;
    let scale = b * b + (4.0 * a * cc).abs();
    let vertex = -b / (2.0 * a);
    if disc.abs() <= scale * DEGREE_CUTOFF {
        return vec![vertex, vertex];
    }
    if disc < 0.0 {
        let im = (-disc).sqrt() / (2.0 * a.abs());
        if im <= tol.complex_epsilon * vertex.abs().max(1.0) {
            return vec![vertex, vertex];
        }
        return Vec::new();
    }
    let sq = disc.sqrt();
    let q = -0.5 * (b + b.signum() * sq);
    let (r1, r2) = if q == 0.0 {
        (vertex - sq / (2.0 * a), vertex + sq / (2.0 * a))
    } else {
        (q / a, cc / q)
    };
    vec![r1, r2]
}

/// Groups sorted roots whose consecutive distance is within `eps`.
#[allow(clippy::cast_precision_loss)]
fn cluster(sorted: Vec<f64>, eps: f64) -> Vec<Root> {
    let mut groups: Vec<Vec<f64>> = Vec::new();
    for r in sorted {
        let joins = groups
            .last()
            .and_then(|g| g.last())
            .is_some_and(|last| r - last <= eps);
        if joins {
            if let Some(group) = groups.last_mut() {
                group.push(r);
            }
        } else {
            groups.push(vec![r]);
        }
    }
    groups
        .into_iter()
        .map(|g| Root {
            value: g.iter().sum::<f64>() / g.len() as f64,
            multiplicity: g.len(),
        })
        .collect()
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        Polynomial::stripped((0..n).map(|i| self.coeff(i) + rhs.coeff(i)).collect())
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        Polynomial::stripped((0..n).map(|i| self.coeff(i) - rhs.coeff(i)).collect())
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        let mut coeffs = vec![0.0; self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Polynomial::stripped(coeffs)
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        self.scale(-1.0)
    }
}

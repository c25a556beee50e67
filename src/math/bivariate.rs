use std::ops::{Add, Mul, Sub};

use super::polynomial::Polynomial;

/// A polynomial `Σ c[i][j] x^i y^j` of bounded total degree.
///
/// Coefficients are stored densely in a `(degree + 1)²` grid; entries with
/// `i + j > degree` stay zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Bivariate {
    degree: usize,
    coeffs: Vec<Vec<f64>>,
}

impl Bivariate {
    /// The zero polynomial with room for total degree `degree`.
    #[must_use]
    pub fn zero(degree: usize) -> Self {
        Self {
            degree,
            coeffs: vec![vec![0.0; degree + 1]; degree + 1],
        }
    }

    /// A constant polynomial.
    #[must_use]
    pub fn constant(c: f64) -> Self {
        Self {
            degree: 0,
            coeffs: vec![vec![c]],
        }
    }

    /// `c + a x + b y`.
    #[must_use]
    pub fn linear(c: f64, a: f64, b: f64) -> Self {
        let mut p = Self::zero(1);
        p.coeffs[0][0] = c;
        p.coeffs[1][0] = a;
        p.coeffs[0][1] = b;
        p
    }

    /// Builds from `(i, j, c)` terms.
    #[must_use]
    pub fn from_terms(degree: usize, terms: &[(usize, usize, f64)]) -> Self {
        let mut p = Self::zero(degree);
        for &(i, j, c) in terms {
            if i + j <= degree {
                p.coeffs[i][j] += c;
            }
        }
        p
    }

    /// Declared total degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Coefficient of `x^i y^j`.
    #[must_use]
    pub fn coeff(&self, i: usize, j: usize) -> f64 {
        self.coeffs
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .unwrap_or(0.0)
    }

    /// Coefficients flattened in a fixed order, used for scale-invariant
    /// comparison of implicit equations of the same degree.
    #[must_use]
    pub fn flattened(&self) -> Vec<f64> {
        let mut out = Vec::new();
        for total in (0..=self.degree).rev() {
            for i in (0..=total).rev() {
                out.push(self.coeffs[i][total - i]);
            }
        }
        out
    }

    /// Largest coefficient magnitude.
    #[must_use]
    pub fn max_abs(&self) -> f64 {
        self.coeffs
            .iter()
            .flatten()
            .fold(0.0_f64, |m, c| m.max(c.abs()))
    }

    /// Divides by the largest coefficient magnitude (no-op for zero).
    #[must_use]
    pub fn normalized(&self) -> Self {
        let max = self.max_abs();
        if max == 0.0 {
            return self.clone();
        }
        self.scale(1.0 / max)
    }

    /// Multiplies every coefficient by `s`.
    #[must_use]
    pub fn scale(&self, s: f64) -> Self {
        Self {
            degree: self.degree,
            coeffs: self
                .coeffs
                .iter()
                .map(|row| row.iter().map(|c| c * s).collect())
                .collect(),
        }
    }

    /// Evaluates at `(x, y)`.
    #[must_use]
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        self.coeffs
            .iter()
            .rev()
            .fold(0.0, |acc, row| {
                acc * x + row.iter().rev().fold(0.0, |a, c| a * y + c)
            })
    }

    /// Upper bound of `|self|` over `|x| ≤ bx, |y| ≤ by`.
    #[must_use]
    pub fn magnitude_bound(&self, bx: f64, by: f64) -> f64 {
        let abs = Self {
            degree: self.degree,
            coeffs: self
                .coeffs
                .iter()
                .map(|row| row.iter().map(|c| c.abs()).collect())
                .collect(),
        };
        abs.eval(bx.abs(), by.abs())
    }

    /// Substitutes a parametric curve `(x(t), y(t))`.
    #[must_use]
    pub fn compose(&self, x: &Polynomial, y: &Polynomial) -> Polynomial {
        let x_pows: Vec<Polynomial> = (0..=self.degree).map(|i| x.pow(i)).collect();
        let y_pows: Vec<Polynomial> = (0..=self.degree).map(|j| y.pow(j)).collect();
        let mut out = Polynomial::zero();
        for (i, row) in self.coeffs.iter().enumerate() {
            for (j, c) in row.iter().enumerate() {
                if *c != 0.0 {
                    out = &out + &(&x_pows[i] * &y_pows[j]).scale(*c);
                }
            }
        }
        out
    }

    /// Substitutes a rational curve `(X(t)/W(t), Y(t)/W(t))` and clears the
    /// denominator: `Σ c_ij X^i Y^j W^(d - i - j)`.
    #[must_use]
    pub fn compose_homogeneous(&self, x: &Polynomial, y: &Polynomial, w: &Polynomial) -> Polynomial {
        let d = self.degree;
        let x_pows: Vec<Polynomial> = (0..=d).map(|i| x.pow(i)).collect();
        let y_pows: Vec<Polynomial> = (0..=d).map(|j| y.pow(j)).collect();
        let w_pows: Vec<Polynomial> = (0..=d).map(|k| w.pow(k)).collect();
        let mut out = Polynomial::zero();
        for (i, row) in self.coeffs.iter().enumerate() {
            for (j, c) in row.iter().enumerate() {
                if *c != 0.0 && i + j <= d {
                    let term = &(&x_pows[i] * &y_pows[j]) * &w_pows[d - i - j];
                    out = &out + &term.scale(*c);
                }
            }
        }
        out
    }

    /// Rewrites the polynomial for the coordinate shift `x → x + dx`, `y → y + dy`.
    #[must_use]
    pub fn shifted(&self, dx: f64, dy: f64) -> Self {
        let x = Self::linear(dx, 1.0, 0.0);
        let y = Self::linear(dy, 0.0, 1.0);
        let x_pows: Vec<Self> = (0..=self.degree).map(|i| x.pow(i)).collect();
        let y_pows: Vec<Self> = (0..=self.degree).map(|j| y.pow(j)).collect();
        let mut out = Self::zero(self.degree);
        for (i, row) in self.coeffs.iter().enumerate() {
            for (j, c) in row.iter().enumerate() {
                if *c != 0.0 {
                    out = &out + &(&x_pows[i] * &y_pows[j]).scale(*c);
                }
            }
        }
        out.with_degree(self.degree)
    }

    fn pow(&self, n: usize) -> Self {
        let mut out = Self::constant(1.0);
        for _ in 0..n {
            out = &out * self;
        }
        out
    }

    /// Re-declares the total degree, dropping terms beyond it.
    fn with_degree(&self, degree: usize) -> Self {
        let mut out = Self::zero(degree);
        for (i, row) in self.coeffs.iter().enumerate() {
            for (j, c) in row.iter().enumerate() {
                if i + j <= degree {
                    out.coeffs[i][j] = *c;
                }
            }
        }
        out
    }
}

impl Add for &Bivariate {
    type Output = Bivariate;

    fn add(self, rhs: &Bivariate) -> Bivariate {
        let mut out = Bivariate::zero(self.degree.max(rhs.degree));
        for p in [self, rhs] {
            for (i, row) in p.coeffs.iter().enumerate() {
                for (j, c) in row.iter().enumerate() {
                    out.coeffs[i][j] += c;
                }
            }
        }
        out
    }
}

impl Sub for &Bivariate {
    type Output = Bivariate;

    fn sub(self, rhs: &Bivariate) -> Bivariate {
        self + &rhs.scale(-1.0)
    }
}

impl Mul for &Bivariate {
    type Output = Bivariate;

    fn mul(self, rhs: &Bivariate) -> Bivariate {
        let mut out = Bivariate::zero(self.degree + rhs.degree);
        for (i1, row1) in self.coeffs.iter().enumerate() {
            for (j1, a) in row1.iter().enumerate() {
                if *a == 0.0 {
                    continue;
                }
                for (i2, row2) in rhs.coeffs.iter().enumerate() {
                    for (j2, b) in row2.iter().enumerate() {
                        out.coeffs[i1 + i2][j1 + j2] += a * b;
                    }
                }
            }
        }
        out
    }
}

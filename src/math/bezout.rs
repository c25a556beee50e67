use super::bivariate::Bivariate;
use super::polynomial::Polynomial;

/// Implicit equation `F(x, y) = 0` of the parametric curve `(x(t), y(t))`
/// of degree `n`.
///
/// `F` is the determinant of the `n × n` Bézout matrix of
/// `x(t) - x` and `y(t) - y`; it vanishes exactly on the image of the curve
/// (and its trajectory beyond the parameter domain).
#[must_use]
pub fn implicitize(x: &Polynomial, y: &Polynomial, n: usize) -> Bivariate {
    if n == 0 {
        return Bivariate::zero(0);
    }
    let f = |k: usize| -> Bivariate {
        if k == 0 {
            Bivariate::linear(x.coeff(0), -1.0, 0.0)
        } else if k <= n {
            Bivariate::constant(x.coeff(k))
        } else {
            Bivariate::constant(0.0)
        }
    };
    let g = |k: usize| -> Bivariate {
        if k == 0 {
            Bivariate::linear(y.coeff(0), 0.0, -1.0)
        } else if k <= n {
            Bivariate::constant(y.coeff(k))
        } else {
            Bivariate::constant(0.0)
        }
    };

    let matrix: Vec<Vec<Bivariate>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    (0..=i.min(j)).fold(Bivariate::zero(1), |acc, k| {
                        let m = i + j + 1 - k;
                        let term = &(&f(m) * &g(k)) - &(&f(k) * &g(m));
                        &acc + &term
                    })
                })
                .collect()
        })
        .collect();

    determinant(&matrix)
}

/// Determinant of a small square matrix of bivariate polynomials by
/// cofactor expansion along the first row.
#[must_use]
pub fn determinant(m: &[Vec<Bivariate>]) -> Bivariate {
    match m.len() {
        0 => Bivariate::constant(1.0),
        1 => m[0][0].clone(),
        2 => &(&m[0][0] * &m[1][1]) - &(&m[0][1] * &m[1][0]),
        n => {
            let mut out = Bivariate::zero(0);
            for col in 0..n {
                let minor: Vec<Vec<Bivariate>> = m[1..]
                    .iter()
                    .map(|row| {
                        row.iter()
                            .enumerate()
                            .filter(|(j, _)| *j != col)
                            .map(|(_, c)| c.clone())
                            .collect()
                    })
                    .collect();
                let term = &m[0][col] * &determinant(&minor);
                out = if col % 2 == 0 {
                    &out + &term
                } else {
                    &out - &term
                };
            }
            out
        }
    }
}

//! Small dense complex linear algebra used by the recursion.
//!
//! Every matrix handled here is at most 6×6, so a pure-Rust LU with partial
//! pivoting is all that is needed.

use crate::error::{MlsError, Result};
use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// Dense complex matrix. State vectors are stored as `n × m` matrices with
/// one column per transmission channel.
pub type CMatrix = Array2<Complex64>;

/// Imaginary unit.
pub const J: Complex64 = Complex64::new(0.0, 1.0);

/// Principal square root with a `-0.0` imaginary part treated as `+0.0`.
///
/// Negative real arguments therefore always map onto the positive imaginary
/// axis, whichever way the zero imaginary part was signed by the arithmetic
/// that produced it.
pub fn branch_sqrt(z: Complex64) -> Complex64 {
    if z.im == 0.0 {
        Complex64::new(z.re, 0.0).sqrt()
    } else {
        z.sqrt()
    }
}

/// Square root of a real argument, complex when the argument is negative.
pub fn real_sqrt(x: f64) -> Complex64 {
    branch_sqrt(Complex64::new(x, 0.0))
}

/// Identity matrix of size `n`.
pub fn eye(n: usize) -> CMatrix {
    Array2::eye(n)
}

pub fn is_finite(m: &CMatrix) -> bool {
    m.iter().all(|z| z.re.is_finite() && z.im.is_finite())
}

/// LU factorisation with partial pivoting.
///
/// `lu` stores the unit lower factor below the diagonal and the upper factor
/// on and above it; row `i` of `PA` is row `permutation[i]` of `A`.
#[derive(Debug, Clone)]
pub struct LuFactorization {
    lu: CMatrix,
    permutation: Vec<usize>,
}

impl LuFactorization {
    /// Factorise a square matrix. `context` names the caller in error reports.
    pub fn new(a: &CMatrix, context: &str) -> Result<Self> {
        let n = a.nrows();
        if n != a.ncols() {
            return Err(MlsError::numerical(format!(
                "{context}: cannot factorise a {}x{} matrix",
                n,
                a.ncols()
            )));
        }

        let mut lu = a.clone();
        let mut permutation: Vec<usize> = (0..n).collect();

        for k in 0..n {
            let mut max_val = lu[[k, k]].norm();
            let mut max_row = k;
            for i in (k + 1)..n {
                let val = lu[[i, k]].norm();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val == 0.0 || !max_val.is_finite() {
                return Err(MlsError::numerical(format!("{context}: singular matrix")));
            }

            if max_row != k {
                for j in 0..n {
                    lu.swap([k, j], [max_row, j]);
                }
                permutation.swap(k, max_row);
            }

            let pivot_inv = lu[[k, k]].inv();
            for i in (k + 1)..n {
                let mult = lu[[i, k]] * pivot_inv;
                lu[[i, k]] = mult;
                for j in (k + 1)..n {
                    let update = mult * lu[[k, j]];
                    lu[[i, j]] -= update;
                }
            }
        }

        Ok(Self { lu, permutation })
    }

    fn solve_vector(&self, b: &Array1<Complex64>) -> Array1<Complex64> {
        let n = self.permutation.len();
        let mut x: Array1<Complex64> = self.permutation.iter().map(|&p| b[p]).collect();

        // Ly = Pb
        for i in 0..n {
            for j in 0..i {
                let l_ij = self.lu[[i, j]];
                x[i] = x[i] - l_ij * x[j];
            }
        }
        // Ux = y
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                let u_ij = self.lu[[i, j]];
                x[i] = x[i] - u_ij * x[j];
            }
            x[i] /= self.lu[[i, i]];
        }
        x
    }

    /// Solve `A X = B` column by column.
    pub fn solve(&self, b: &CMatrix) -> CMatrix {
        let mut x = CMatrix::zeros(b.raw_dim());
        for (col, mut out) in b.columns().into_iter().zip(x.columns_mut()) {
            out.assign(&self.solve_vector(&col.to_owned()));
        }
        x
    }
}

/// Inverse of a square matrix.
pub fn inverse(a: &CMatrix, context: &str) -> Result<CMatrix> {
    let lu = LuFactorization::new(a, context)?;
    Ok(lu.solve(&eye(a.nrows())))
}

/// Solve `A X = B`.
pub fn solve(a: &CMatrix, b: &CMatrix, context: &str) -> Result<CMatrix> {
    let lu = LuFactorization::new(a, context)?;
    Ok(lu.solve(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_branch_sqrt_negative_zero_imaginary() {
        let z = branch_sqrt(c(-4.0, -0.0));
        assert!((z - c(0.0, 2.0)).norm() < 1e-15, "sqrt(-4 - 0j) = {z}");
        let w = branch_sqrt(c(-4.0, -1e-20));
        assert!(w.im < 0.0, "a genuinely negative imaginary part keeps its branch");
    }

    #[test]
    fn test_inverse_complex() {
        let a = array![
            [c(4.0, 1.0), c(1.0, 0.0), c(0.0, 2.0)],
            [c(1.0, 0.0), c(3.0, -1.0), c(1.0, 1.0)],
            [c(0.0, 0.0), c(2.0, 0.5), c(1.0, 0.0)],
        ];
        let inv = inverse(&a, "test").expect("matrix is regular");
        let prod = a.dot(&inv);
        let err = (&prod - &eye(3)).iter().map(|z| z.norm()).fold(0.0, f64::max);
        assert!(err < 1e-12, "A·A⁻¹ differs from I by {err}");
    }

    #[test]
    fn test_pivoting_needed() {
        // Zero leading entry forces a row swap.
        let a = array![
            [c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0)],
            [c(1.0, 0.0), c(0.0, 0.0), c(3.0, 0.0)],
            [c(4.0, 0.0), c(-3.0, 0.0), c(8.0, 0.0)],
        ];
        let b = array![[c(1.0, 0.0)], [c(2.0, 0.0)], [c(3.0, 0.0)]];
        let x = solve(&a, &b, "test").expect("matrix is regular");
        let err = (&a.dot(&x) - &b).iter().map(|z| z.norm()).fold(0.0, f64::max);
        assert!(err < 1e-12, "residual {err}");
    }

    #[test]
    fn test_singular_matrix_is_reported() {
        let a = array![[c(1.0, 0.0), c(2.0, 0.0)], [c(0.0, 0.0), c(0.0, 0.0)]];
        let err = inverse(&a, "rank deficient").unwrap_err();
        assert!(err.is_numerical());
        assert!(err.to_string().contains("rank deficient"));
    }
}

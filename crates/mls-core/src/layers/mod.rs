//! Layer transfer operators.
//!
//! Each operator maps the state `Ω⁻` found on the backing side of a layer to
//! the state `Ω⁺` on its incidence side, together with the operator `Ξ`
//! relating the wave amplitudes at both faces (used to rebuild the
//! transmission coefficient).

pub mod elastic;
pub mod fluid;
pub mod layer;
pub mod pem;
pub mod screen;

pub use layer::{Layer, StochasticTarget};

use crate::error::{MlsError, Result};
use crate::linalg::{inverse, is_finite, CMatrix};
use crate::media::Medium;
use ndarray::s;
use num_complex::Complex64;
use std::cmp::Ordering;

/// Output of a layer transfer operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Propagation {
    /// State on the incidence side of the layer.
    pub state: CMatrix,
    /// Amplitude back-propagation operator.
    pub xi: CMatrix,
}

/// Apply the transfer operator matching the variant of `medium`.
///
/// The medium must have been updated for `omega` beforehand.
pub fn transfer(
    omega_minus: &CMatrix,
    omega: f64,
    k_x: f64,
    medium: &Medium,
    thickness: f64,
) -> Result<Propagation> {
    let expected = medium.class().state_size();
    if omega_minus.nrows() != expected {
        return Err(MlsError::numerical(format!(
            "{} layer: expected a state with {} rows, got {}",
            medium.medium_type(),
            expected,
            omega_minus.nrows()
        )));
    }

    let propagation = match medium {
        Medium::Fluid(_) | Medium::EquivalentFluid(_) => {
            let (rho, c) = medium.fluid_properties()?.ok_or_else(|| {
                MlsError::numerical(format!("{} has no fluid properties", medium.name()))
            })?;
            fluid::transfer(omega_minus, omega, k_x, rho, c, thickness)
        }
        Medium::Elastic(m) => elastic::transfer(omega_minus, omega, k_x, m, thickness),
        Medium::PoroElastic(m) => pem::transfer(omega_minus, omega, k_x, m.state()?, thickness),
        Medium::Screen(m) => screen::transfer(omega_minus, omega, k_x, m.state()?, thickness),
    }?;
    if !(is_finite(&propagation.state) && is_finite(&propagation.xi)) {
        return Err(MlsError::numerical(format!(
            "{} layer: non-finite state",
            medium.medium_type()
        )));
    }
    Ok(propagation)
}

/// Indices of `values` sorted by ascending real part. Ties keep their
/// original relative order.
pub(crate) fn ascending_real_order(values: &[Complex64]) -> Vec<usize> {
    let mut index: Vec<usize> = (0..values.len()).collect();
    index.sort_by(|&a, &b| {
        values[a]
            .re
            .partial_cmp(&values[b].re)
            .unwrap_or(Ordering::Equal)
    });
    index
}

/// Reorder the columns of `phi` (and the matching eigenvalues) by `order`.
pub(crate) fn reorder(
    phi: &CMatrix,
    lambdas: &[Complex64],
    order: &[usize],
) -> (CMatrix, Vec<Complex64>) {
    let mut sorted = CMatrix::zeros(phi.raw_dim());
    for (dst, &src) in order.iter().enumerate() {
        sorted.column_mut(dst).assign(&phi.column(src));
    }
    let lambdas = order.iter().map(|&i| lambdas[i]).collect();
    (sorted, lambdas)
}

/// Stable propagation through a solid or poro-elastic layer.
///
/// `phi` holds the eigenvectors sorted by decreasing real part of their
/// eigenvalue `lambdas`. The first `anchored` branches grow towards the
/// incidence side and are carried explicitly; the others are expressed
/// relative to the eigenvalue at index `anchored` so no exponential exceeds
/// one in modulus.
pub(crate) fn recursive_propagation(
    phi: &CMatrix,
    lambdas: &[Complex64],
    omega_minus: &CMatrix,
    thickness: f64,
    anchored: usize,
    context: &str,
) -> Result<Propagation> {
    let n = phi.nrows();
    if omega_minus.ncols() != anchored + 1 {
        return Err(MlsError::numerical(format!(
            "{context}: expected a state with {} columns, got {}",
            anchored + 1,
            omega_minus.ncols()
        )));
    }
    let phi_inv = inverse(phi, context)?;
    let lambda_ref = lambdas[anchored];

    let mut decay = CMatrix::zeros((n, n));
    for i in anchored..n {
        decay[[i, i]] = ((lambdas[i] - lambda_ref) * thickness).exp();
    }
    let alpha_prime = phi.dot(&decay).dot(&phi_inv);

    let mut xi_prime = CMatrix::zeros((anchored + 1, anchored + 1));
    xi_prime
        .slice_mut(s![..anchored, ..])
        .assign(&phi_inv.slice(s![..anchored, ..]).dot(omega_minus));
    xi_prime[[anchored, anchored]] = Complex64::new(1.0, 0.0);

    let mut growth = CMatrix::zeros((anchored + 1, anchored + 1));
    for i in 0..anchored {
        growth[[i, i]] = ((lambda_ref - lambdas[i]) * thickness).exp();
    }
    growth[[anchored, anchored]] = Complex64::new(1.0, 0.0);
    let xi_prime_lambda = inverse(&xi_prime, context)?.dot(&growth);

    let mut state = alpha_prime.dot(omega_minus).dot(&xi_prime_lambda);
    for i in 0..anchored {
        let mut column = state.column_mut(i);
        column += &phi.column(i);
    }

    let scale = (-lambda_ref * thickness).exp();
    let xi = xi_prime_lambda.mapv(|z| z * scale);

    Ok(Propagation { state, xi })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascending_order_keeps_ties_stable() {
        let values = [
            Complex64::new(0.0, 1.0),
            Complex64::new(-0.0, -1.0),
            Complex64::new(-2.0, 0.0),
            Complex64::new(3.0, 0.0),
        ];
        assert_eq!(ascending_real_order(&values), vec![2, 0, 1, 3]);
    }

    #[test]
    fn test_reorder_columns() {
        let phi = ndarray::array![
            [Complex64::new(1.0, 0.0), Complex64::new(2.0, 0.0)],
            [Complex64::new(3.0, 0.0), Complex64::new(4.0, 0.0)],
        ];
        let lambdas = [Complex64::new(1.0, 0.0), Complex64::new(2.0, 0.0)];
        let (sorted, l) = reorder(&phi, &lambdas, &[1, 0]);
        assert_eq!(sorted[[0, 0]], Complex64::new(2.0, 0.0));
        assert_eq!(sorted[[1, 1]], Complex64::new(3.0, 0.0));
        assert_eq!(l, vec![Complex64::new(2.0, 0.0), Complex64::new(1.0, 0.0)]);
    }
}

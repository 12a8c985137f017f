use super::Propagation;
use crate::error::{MlsError, Result};
use crate::linalg::{branch_sqrt, CMatrix};
use ndarray::array;
use num_complex::Complex64;

/// Relative size below which the projection on one wave is considered to
/// have cancelled out.
const PROJECTION_TOLERANCE: f64 = 1e-12;

/// Propagate a fluid state `(u_z, p)` across a fluid layer.
///
/// `rho` and `c` are the effective density and speed of sound, complex for
/// an equivalent fluid. The growing branch is weighted by `exp(-2λd)` so
/// thick or lossy layers never overflow.
pub fn transfer(
    omega_minus: &CMatrix,
    omega: f64,
    k_x: f64,
    rho: Complex64,
    c: Complex64,
    thickness: f64,
) -> Result<Propagation> {
    let delta = omega / c;
    let lambda = -branch_sqrt(k_x * k_x - delta * delta);
    if lambda.norm() == 0.0 {
        return Err(MlsError::numerical("fluid layer: grazing wave, λ = 0"));
    }
    let rho_omega = rho * omega * omega;

    // Eigenvectors and their closed-form inverse.
    let phi = array![
        [-lambda / rho_omega, lambda / rho_omega],
        [Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)],
    ];
    let f = rho_omega / (2.0 * lambda);
    let psi = array![
        [-f, f * lambda / rho_omega],
        [f, f * lambda / rho_omega],
    ];

    let u_z = omega_minus[[0, 0]];
    let p = omega_minus[[1, 0]];
    let decaying = psi[[0, 0]] * u_z + psi[[0, 1]] * p;
    let growing = psi[[1, 0]] * u_z + psi[[1, 1]] * p;
    let scale = (psi[[0, 0]] * u_z).norm() + (psi[[0, 1]] * p).norm();
    if decaying.norm() > PROJECTION_TOLERANCE * scale {
        let weight = (-2.0 * lambda * thickness).exp() * growing / decaying;
        let state = array![
            [phi[[0, 0]] + weight * phi[[0, 1]]],
            [phi[[1, 0]] + weight * phi[[1, 1]]],
        ];
        let xi = array![[(-lambda * thickness).exp() / decaying]];
        return Ok(Propagation { state, xi });
    }

    // Pure outgoing wave, as behind a layer of the transmission fluid
    // itself: it crosses the layer unchanged up to its phase.
    let scale = (psi[[1, 0]] * u_z).norm() + (psi[[1, 1]] * p).norm();
    if growing.norm() <= PROJECTION_TOLERANCE * scale {
        return Err(MlsError::numerical("fluid layer: empty state"));
    }
    let state = array![[phi[[0, 1]]], [phi[[1, 1]]]];
    let xi = array![[(lambda * thickness).exp() / growing]];

    Ok(Propagation { state, xi })
}

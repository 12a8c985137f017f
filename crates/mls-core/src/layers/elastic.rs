use super::{ascending_real_order, recursive_propagation, reorder, Propagation};
use crate::error::Result;
use crate::linalg::{branch_sqrt, CMatrix, J};
use crate::media::Elastic;
use ndarray::array;
use num_complex::Complex64;

/// Propagate an elastic state `(σ_xz, u_z, σ_zz, u_x)` across a solid layer.
pub fn transfer(
    omega_minus: &CMatrix,
    omega: f64,
    k_x: f64,
    medium: &Elastic,
    thickness: f64,
) -> Result<Propagation> {
    let (lambda, mu) = medium.lame();
    let p_mod = lambda + 2.0 * mu;
    let delta_p = omega * branch_sqrt(medium.rho / p_mod);
    let delta_s = omega * branch_sqrt(medium.rho / mu);

    let k_x2 = k_x * k_x;
    let beta_p = branch_sqrt(delta_p * delta_p - k_x2);
    let beta_s = branch_sqrt(delta_s * delta_s - k_x2);

    let alpha_p = -J * lambda * delta_p * delta_p - 2.0 * J * mu * beta_p * beta_p;
    let alpha_s = 2.0 * J * mu * beta_s * k_x;
    let kx = Complex64::from(k_x);
    let shear_stress = J * mu * (beta_s * beta_s - k_x2);

    // Columns: +p, -p, +s, -s.
    let phi_0 = array![
        [
            -2.0 * J * mu * beta_p * k_x,
            2.0 * J * mu * beta_p * k_x,
            shear_stress,
            shear_stress
        ],
        [beta_p, -beta_p, kx, kx],
        [alpha_p, alpha_p, -alpha_s, alpha_s],
        [kx, kx, -beta_s, beta_s],
    ];
    let lambdas = [J * beta_p, -J * beta_p, J * beta_s, -J * beta_s];

    // Read the ascending order from the end: largest real part first.
    let ascending = ascending_real_order(&lambdas);
    let order: Vec<usize> = (0..4).map(|i| ascending[3 - i]).collect();
    let (phi, lambdas) = reorder(&phi_0, &lambdas, &order);

    recursive_propagation(&phi, &lambdas, omega_minus, thickness, 1, "elastic layer")
}

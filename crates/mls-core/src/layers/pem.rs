use super::{ascending_real_order, recursive_propagation, reorder, Propagation};
use crate::error::Result;
use crate::linalg::{branch_sqrt, CMatrix, J};
use crate::media::BiotState;
use ndarray::array;
use num_complex::Complex64;

/// Propagate a poro-elastic state `(σ̂_xz, u^s_z, u^t_z, σ̂_zz, p, u^s_x)`
/// across a Biot layer.
///
/// Two compressional waves and one shear wave give six branches; the two
/// growing ones are carried explicitly by the recursion.
pub fn transfer(
    omega_minus: &CMatrix,
    _omega: f64,
    k_x: f64,
    state: &BiotState,
    thickness: f64,
) -> Result<Propagation> {
    let k_x2 = k_x * k_x;
    let [delta_1, delta_2, delta_3] = state.delta;
    let [mu_1, mu_2, mu_3] = state.mu;
    let n = state.n;

    let beta_1 = branch_sqrt(delta_1 * delta_1 - k_x2);
    let beta_2 = branch_sqrt(delta_2 * delta_2 - k_x2);
    let beta_3 = branch_sqrt(delta_3 * delta_3 - k_x2);

    let alpha_1 = -J * state.a_hat * delta_1 * delta_1 - 2.0 * J * n * beta_1 * beta_1;
    let alpha_2 = -J * state.a_hat * delta_2 * delta_2 - 2.0 * J * n * beta_2 * beta_2;
    let alpha_3 = 2.0 * J * n * beta_3 * k_x;

    let kx = Complex64::from(k_x);
    let zero = Complex64::new(0.0, 0.0);
    let shear_stress = J * n * (beta_3 * beta_3 - k_x2);
    let pressure_1 = J * delta_1 * delta_1 * state.k_eq * mu_1;
    let pressure_2 = J * delta_2 * delta_2 * state.k_eq * mu_2;

    // Columns: ±wave 1, ±wave 2, ±shear.
    let phi_0 = array![
        [
            -2.0 * J * n * beta_1 * k_x,
            2.0 * J * n * beta_1 * k_x,
            -2.0 * J * n * beta_2 * k_x,
            2.0 * J * n * beta_2 * k_x,
            shear_stress,
            shear_stress
        ],
        [beta_1, -beta_1, beta_2, -beta_2, kx, kx],
        [
            mu_1 * beta_1,
            -mu_1 * beta_1,
            mu_2 * beta_2,
            -mu_2 * beta_2,
            mu_3 * k_x,
            mu_3 * k_x
        ],
        [alpha_1, alpha_1, alpha_2, alpha_2, -alpha_3, alpha_3],
        [pressure_1, pressure_1, pressure_2, pressure_2, zero, zero],
        [kx, kx, kx, kx, -beta_3, beta_3],
    ];
    let lambdas = [
        J * beta_1,
        -J * beta_1,
        J * beta_2,
        -J * beta_2,
        J * beta_3,
        -J * beta_3,
    ];

    // Reverse sort: ascending order of real parts, reversed.
    let mut order = ascending_real_order(&lambdas);
    order.reverse();
    let (phi, lambdas) = reorder(&phi_0, &lambdas, &order);

    recursive_propagation(&phi, &lambdas, omega_minus, thickness, 2, "poro-elastic layer")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::PoroElastic;
    use std::f64::consts::PI;

    fn foam() -> PoroElastic {
        PoroElastic::new(0.98, 3750.0, 1.17, 742e-6, 110e-6, 22.1, 0.39, 70e3, 0.265)
    }

    fn rigid_wall_state() -> CMatrix {
        let mut omega_minus = CMatrix::zeros((6, 3));
        omega_minus[[1, 1]] = Complex64::new(1.0, 0.0);
        omega_minus[[4, 0]] = Complex64::new(1.0, 0.0);
        omega_minus[[5, 2]] = Complex64::new(1.0, 0.0);
        omega_minus
    }

    #[test]
    fn test_growing_branches_are_anchored() {
        let mut m = foam();
        let omega = 2.0 * PI * 800.0;
        m.update(omega);
        let k_x = omega / 343.0 * (45.0f64).to_radians().sin();
        let out = transfer(&rigid_wall_state(), omega, k_x, m.state().unwrap(), 5e-2).unwrap();
        assert_eq!(out.state.dim(), (6, 3));
        assert_eq!(out.xi.dim(), (3, 3));
        // Lossy frame: every back-propagated amplitude decays.
        for z in out.xi.iter() {
            assert!(z.re.is_finite() && z.im.is_finite());
        }
        assert!(out.xi[[2, 2]].norm() < 1.0, "xi = {}", out.xi);
    }

    #[test]
    fn test_normal_incidence_is_reported_singular() {
        let mut m = foam();
        let omega = 2.0 * PI * 500.0;
        m.update(omega);
        let err = transfer(&rigid_wall_state(), omega, 0.0, m.state().unwrap(), 2e-2).unwrap_err();
        assert!(err.is_numerical());
    }
}

use super::Propagation;
use crate::error::Result;
use crate::linalg::{eye, CMatrix};
use crate::media::BiotState;

/// First-order propagation through an acoustically thin screen:
/// `Ω⁺ = (I − d·α) Ω⁻`.
///
/// Only the entries of the state matrix `α` that survive the thin-layer
/// approximation are kept.
pub fn transfer(
    omega_minus: &CMatrix,
    omega: f64,
    k_x: f64,
    state: &BiotState,
    thickness: f64,
) -> Result<Propagation> {
    let w2 = omega * omega;
    let mut alpha = CMatrix::zeros((6, 6));
    alpha[[0, 5]] = -(state.a_hat * state.a_hat - state.p_hat * state.p_hat) / state.p_hat
        * (k_x * k_x)
        - state.rho_til * w2;
    alpha[[2, 4]] = -1.0 / state.k_eq + k_x * k_x / (state.rho_eq * w2);
    alpha[[3, 1]] = -state.rho_s * w2;
    alpha[[3, 2]] = -state.rho_eq * state.gamma_til * w2;
    alpha[[4, 1]] = state.rho_eq * state.gamma_til * w2;
    alpha[[4, 2]] = state.rho_eq * w2;

    let t = eye(6) - alpha.mapv(|z| z * thickness);

    Ok(Propagation {
        state: t.dot(omega_minus),
        xi: eye(3),
    })
}

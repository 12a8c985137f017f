//! Interfaces between two bulk media of different classes.
//!
//! Each function is named `left_right`: it takes a state expressed in the
//! right-hand medium (towards the backing) and returns it expressed in the
//! left-hand medium, together with the operator `τ` relating the wave
//! amplitudes on both sides.

use super::InterfaceTransfer;
use crate::error::{MlsError, Result};
use crate::linalg::{solve, CMatrix};
use ndarray::{array, s};
use num_complex::Complex64;

fn one() -> Complex64 {
    Complex64::new(1.0, 0.0)
}

fn zero() -> Complex64 {
    Complex64::new(0.0, 0.0)
}

/// Elastic state (4×2) to fluid state (2×1). Shear stress vanishes at the
/// wetted face.
pub fn fluid_elastic(o: &CMatrix) -> Result<InterfaceTransfer> {
    if o[[0, 1]].norm() == 0.0 {
        return Err(MlsError::numerical("fluid/elastic interface: singular shear row"));
    }
    let tau = -o[[0, 0]] / o[[0, 1]];
    Ok(InterfaceTransfer {
        state: array![
            [o[[1, 1]] * tau + o[[1, 0]]],
            [-o[[2, 1]] * tau - o[[2, 0]]],
        ],
        tau: array![[one()], [tau]],
    })
}

/// Fluid state (2×1) to elastic state (4×2): `σ_zz = -p`, `u_z` continuous,
/// free tangential displacement.
pub fn elastic_fluid(o: &CMatrix) -> Result<InterfaceTransfer> {
    let mut state = CMatrix::zeros((4, 2));
    state[[1, 0]] = o[[0, 0]];
    state[[2, 0]] = -o[[1, 0]];
    state[[3, 1]] = one();
    Ok(InterfaceTransfer {
        state,
        tau: array![[one(), zero()]],
    })
}

/// Poro-elastic state (6×3) to fluid state (2×1). Both frame stresses
/// vanish at the open face.
pub fn fluid_pem(o: &CMatrix) -> Result<InterfaceTransfer> {
    let a = array![
        [-o[[0, 1]], -o[[0, 2]]],
        [-o[[3, 1]], -o[[3, 2]]],
    ];
    let rhs = array![[o[[0, 0]]], [o[[3, 0]]]];
    let t = solve(&a, &rhs, "fluid/poro-elastic interface")?;

    let u = o[[2, 0]] + o[[2, 1]] * t[[0, 0]] + o[[2, 2]] * t[[1, 0]];
    let p = o[[4, 0]] + o[[4, 1]] * t[[0, 0]] + o[[4, 2]] * t[[1, 0]];
    Ok(InterfaceTransfer {
        state: array![[u], [p]],
        tau: array![[one()], [t[[0, 0]]], [t[[1, 0]]]],
    })
}

/// Fluid state (2×1) to poro-elastic state (6×3): total displacement and
/// pore pressure continuous, frame displacements free.
pub fn pem_fluid(o: &CMatrix) -> Result<InterfaceTransfer> {
    let mut state = CMatrix::zeros((6, 3));
    state[[1, 1]] = one();
    state[[2, 0]] = o[[0, 0]];
    state[[4, 0]] = o[[1, 0]];
    state[[5, 2]] = one();
    Ok(InterfaceTransfer {
        state,
        tau: array![[one(), zero(), zero()]],
    })
}

/// Elastic state (4×2) to poro-elastic state (6×3) for a bonded face: the
/// frame follows the solid, no flow through the face.
pub fn pem_elastic(o: &CMatrix) -> Result<InterfaceTransfer> {
    let mut state = CMatrix::zeros((6, 3));
    for c in 0..2 {
        state[[0, c]] = o[[0, c]];
        state[[1, c]] = o[[1, c]];
        state[[2, c]] = o[[1, c]];
        state[[3, c]] = o[[2, c]];
        state[[5, c]] = o[[3, c]];
    }
    state[[3, 2]] = one();
    state[[4, 2]] = one();

    let mut tau = CMatrix::zeros((2, 3));
    tau[[0, 0]] = one();
    tau[[1, 1]] = one();
    Ok(InterfaceTransfer { state, tau })
}

/// Poro-elastic state (6×3) to elastic state (4×2). The third channel is
/// eliminated by imposing `u^s_z = u^t_z`.
pub fn elastic_pem(o: &CMatrix) -> Result<InterfaceTransfer> {
    // D⁺ picks u^s_z - u^t_z.
    let constraint = |c: usize| o[[1, c]] - o[[2, c]];
    let a = constraint(2);
    if a.norm() == 0.0 {
        return Err(MlsError::numerical(
            "elastic/poro-elastic interface: singular flow constraint",
        ));
    }
    let tau_row = [-constraint(0) / a, -constraint(1) / a];

    let mut reduced = o.slice(s![.., ..2]).to_owned();
    for (c, t) in tau_row.iter().enumerate() {
        for r in 0..6 {
            reduced[[r, c]] += o[[r, 2]] * t;
        }
    }

    // D⁻ maps (σ̂_xz, u^s_z, σ̂_zz - p, u^s_x) onto the solid.
    let mut d_minus = CMatrix::zeros((4, 6));
    d_minus[[0, 0]] = one();
    d_minus[[1, 1]] = one();
    d_minus[[2, 3]] = one();
    d_minus[[2, 4]] = -one();
    d_minus[[3, 5]] = one();

    let mut tau = CMatrix::zeros((3, 2));
    tau[[0, 0]] = one();
    tau[[1, 1]] = one();
    tau[[2, 0]] = tau_row[0];
    tau[[2, 1]] = tau_row[1];

    Ok(InterfaceTransfer {
        state: d_minus.dot(&reduced),
        tau,
    })
}

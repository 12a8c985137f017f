//! Terminal interfaces bonding a solid or poro-elastic layer to a rigid
//! wall. The incoming state is the rigid-wall fluid state `(u_z, p)`.

use super::InterfaceTransfer;
use crate::error::Result;
use crate::linalg::CMatrix;
use num_complex::Complex64;

pub fn elastic_rigid(o: &CMatrix) -> Result<InterfaceTransfer> {
    let mut state = CMatrix::zeros((4, 2));
    state[[1, 0]] = o[[0, 0]];
    state[[2, 0]] = -o[[1, 0]];
    state[[3, 1]] = Complex64::new(1.0, 0.0);
    Ok(InterfaceTransfer {
        state,
        tau: CMatrix::zeros((1, 2)),
    })
}

/// Frame clamped to the wall: `u^s_z` and `u^s_x` vanish, the two added
/// channels carry the free frame stresses.
pub fn pem_rigid(o: &CMatrix) -> Result<InterfaceTransfer> {
    let mut state = CMatrix::zeros((6, 3));
    state[[2, 0]] = o[[0, 0]];
    state[[4, 0]] = o[[1, 0]];
    state[[0, 1]] = Complex64::new(1.0, 0.0);
    state[[3, 2]] = Complex64::new(1.0, 0.0);
    Ok(InterfaceTransfer {
        state,
        tau: CMatrix::zeros((1, 3)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_pem_rigid_clamps_frame() {
        let wall = array![[Complex64::new(0.0, 0.0)], [Complex64::new(1.0, 0.0)]];
        let out = pem_rigid(&wall).unwrap();
        // No frame displacement in any channel.
        for c in 0..3 {
            assert_eq!(out.state[[1, c]], Complex64::new(0.0, 0.0));
            assert_eq!(out.state[[5, c]], Complex64::new(0.0, 0.0));
        }
        assert_eq!(out.state[[4, 0]], Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_elastic_rigid_shapes() {
        let wall = array![[Complex64::new(0.0, 0.0)], [Complex64::new(1.0, 0.0)]];
        let out = elastic_rigid(&wall).unwrap();
        assert_eq!(out.state.dim(), (4, 2));
        assert_eq!(out.state[[2, 0]], Complex64::new(-1.0, 0.0));
    }
}

//! Interface operators converting a state between adjacent media.

pub mod bulk;
pub mod rigid;

use crate::error::Result;
use crate::linalg::{eye, CMatrix};
use crate::media::MediumClass;

/// Converted state and its amplitude transfer operator `τ`.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceTransfer {
    pub state: CMatrix,
    pub tau: CMatrix,
}

impl InterfaceTransfer {
    /// Pass-through between two media of the same class.
    pub fn identity(state: &CMatrix) -> Self {
        Self {
            state: state.clone(),
            tau: eye(state.nrows() / 2),
        }
    }
}

pub type InterfaceFn = fn(&CMatrix) -> Result<InterfaceTransfer>;

/// Interface converting a state expressed in `right` into `left`, or `None`
/// when both share a class.
pub fn generic_interface(left: MediumClass, right: MediumClass) -> Option<InterfaceFn> {
    use MediumClass::*;
    match (left, right) {
        (Fluid, Elastic) => Some(bulk::fluid_elastic),
        (Fluid, PoroElastic) => Some(bulk::fluid_pem),
        (Elastic, Fluid) => Some(bulk::elastic_fluid),
        (Elastic, PoroElastic) => Some(bulk::elastic_pem),
        (PoroElastic, Fluid) => Some(bulk::pem_fluid),
        (PoroElastic, Elastic) => Some(bulk::pem_elastic),
        (Fluid, Fluid) | (Elastic, Elastic) | (PoroElastic, PoroElastic) => None,
    }
}

/// Terminal interface bonding a layer of class `class` to a rigid wall.
pub fn rigid_interface(class: MediumClass) -> Option<InterfaceFn> {
    match class {
        MediumClass::Fluid => None,
        MediumClass::Elastic => Some(rigid::elastic_rigid),
        MediumClass::PoroElastic => Some(rigid::pem_rigid),
    }
}

/// Apply `interface` if present, the identity otherwise.
pub fn apply(interface: Option<InterfaceFn>, state: &CMatrix) -> Result<InterfaceTransfer> {
    match interface {
        Some(f) => f(state),
        None => Ok(InterfaceTransfer::identity(state)),
    }
}

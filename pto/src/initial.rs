use nalgebra::Vector3;
use rotations::{axis_angle::AxisAngle, RotationTrait};
use serde::{Deserialize, Serialize};

/// Initial displacement of a PTO at the start of a simulation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialDisplacement {
    /// Linear displacement of the mounting location from the initial body
    /// rotation, plus any additional displacement.
    pub init_lin_disp: Vector3<f64>,
}

impl InitialDisplacement {
    /// Displacement of `loc` when the body rotates by `rotation` about the line
    /// through `rotation_point`, plus `additional`.
    pub fn from_body_rotation(
        loc: &Vector3<f64>,
        rotation_point: &Vector3<f64>,
        rotation: &AxisAngle,
        additional: &Vector3<f64>,
    ) -> Self {
        let rel_coord = loc - rotation_point;
        let new_coord = rotation.rotate(&rel_coord) + rotation_point;
        Self {
            init_lin_disp: (new_coord - loc) + additional,
        }
    }
}

pub mod axis_angle;
pub mod rotation_matrix;

use nalgebra::Vector3;

pub mod prelude {
    pub use crate::axis_angle::*;
    pub use crate::rotation_matrix::*;
    pub use crate::RotationTrait;
}

/// Trait defining rotation and transformation operations.
///
/// All rotations in this crate use the column vector convention: a rotation
/// acts on a point as `R * p`.
pub trait RotationTrait {
    /// Rotates a vector by the rotation.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be rotated.
    ///
    /// # Returns
    ///
    /// The rotated vector.
    fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64>;

    /// Transforms a vector by the rotation, i.e. re-expresses `v` in the
    /// rotated frame. This is the inverse of `rotate`.
    ///
    /// # Arguments
    ///
    /// * `v` - The vector to be transformed.
    ///
    /// # Returns
    ///
    /// The transformed vector.
    fn transform(&self, v: &Vector3<f64>) -> Vector3<f64>;

    fn inv(&self) -> Self;

    fn identity() -> Self;
}

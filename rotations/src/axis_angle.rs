use crate::{rotation_matrix::RotationMatrix, RotationTrait};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Copy, Clone, PartialEq)]
pub enum AxisAngleErrors {
    #[error("magnitude of the axis is too small, should be normalizable to a magnitude of 1.0")]
    ZeroMagnitudeAxis,
}

/// A rotation of `angle` radians about the unit vector `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisAngle {
    pub angle: f64,
    pub axis: Vector3<f64>,
}

impl AxisAngle {
    pub const IDENTITY: Self = Self {
        angle: 0.0,
        axis: Vector3::new(1.0, 0.0, 0.0),
    };

    /// Creates a new `AxisAngle`, normalizing `axis`.
    pub fn new(angle: f64, axis: Vector3<f64>) -> Result<Self, AxisAngleErrors> {
        let norm = axis.norm();
        if !norm.is_finite() || norm < 1e-12 {
            return Err(AxisAngleErrors::ZeroMagnitudeAxis);
        }
        Ok(Self {
            angle,
            axis: axis / norm,
        })
    }

    /// The column convention rotation matrix, `rotate(p) == matrix() * p`.
    pub fn matrix(&self) -> Matrix3<f64> {
        rodrigues_row_matrix(&self.axis, self.angle).transpose()
    }
}

/// Rodrigues' rotation matrix in row vector form.
///
/// A row vector `p` rotates as `p * R`, so `result_j = sum_i p_i * R[i,j]`.
/// The column form used everywhere else in this crate is the transpose.
/// `axis` is not normalized here.
pub fn rodrigues_row_matrix(axis: &Vector3<f64>, angle: f64) -> Matrix3<f64> {
    let (ax, ay, az) = (axis[0], axis[1], axis[2]);
    let (s, c) = angle.sin_cos();
    let v = 1.0 - c;

    Matrix3::new(
        ax * ax * v + c,
        ay * ax * v + az * s,
        az * ax * v - ay * s,
        ax * ay * v - az * s,
        ay * ay * v + c,
        az * ay * v + ax * s,
        ax * az * v + ay * s,
        ay * az * v - ax * s,
        az * az * v + c,
    )
}

/// Rotates `point` by `angle` radians about the line through the origin along `axis`.
///
/// `axis` must already be a unit vector. A non-unit axis gives a transform that
/// is not rigid.
pub fn rotate_about_axis(point: &Vector3<f64>, axis: &Vector3<f64>, angle: f64) -> Vector3<f64> {
    rodrigues_row_matrix(axis, angle).transpose() * point
}

impl RotationTrait for AxisAngle {
    fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        rotate_about_axis(v, &self.axis, self.angle)
    }

    fn transform(&self, v: &Vector3<f64>) -> Vector3<f64> {
        rotate_about_axis(v, &self.axis, -self.angle)
    }

    fn inv(&self) -> Self {
        Self {
            angle: -self.angle,
            axis: self.axis,
        }
    }

    fn identity() -> Self {
        Self::IDENTITY
    }
}

impl From<&AxisAngle> for RotationMatrix {
    fn from(axis_angle: &AxisAngle) -> Self {
        RotationMatrix::from(axis_angle.matrix())
    }
}

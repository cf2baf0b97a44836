use crate::RotationTrait;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::ops::Mul;
use thiserror::Error;

/// A struct representing a 3x3 rotation matrix.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationMatrix(pub Matrix3<f64>);

/// Errors that can occur when creating a `RotationMatrix`.
#[derive(Debug, Error, Copy, Clone, PartialEq)]
pub enum RotationMatrixErrors {
    #[error("column {0} of the rotation matrix has zero magnitude")]
    ZeroMagnitudeColumn(usize),
}

impl RotationMatrix {
    /// Builds the matrix whose columns are the basis vectors of a local frame
    /// expressed in the parent frame. The result maps local to parent.
    ///
    /// The columns are used as given, no normalization is applied.
    pub fn from_columns(x: &Vector3<f64>, y: &Vector3<f64>, z: &Vector3<f64>) -> Self {
        Self(Matrix3::from_columns(&[*x, *y, *z]))
    }

    /// Like `from_columns` but normalizes each column first.
    pub fn try_from_columns(
        x: &Vector3<f64>,
        y: &Vector3<f64>,
        z: &Vector3<f64>,
    ) -> Result<Self, RotationMatrixErrors> {
        fn normalize(
            v: &Vector3<f64>,
            column: usize,
        ) -> Result<Vector3<f64>, RotationMatrixErrors> {
            let mag_squared = v.norm_squared();
            if mag_squared < f64::EPSILON {
                return Err(RotationMatrixErrors::ZeroMagnitudeColumn(column));
            }
            if (mag_squared - 1.0).abs() >= f64::EPSILON {
                return Ok(v / mag_squared.sqrt());
            }
            Ok(*v)
        }

        Ok(Self::from_columns(
            &normalize(x, 0)?,
            &normalize(y, 1)?,
            &normalize(z, 2)?,
        ))
    }

    pub fn get_value(&self) -> Matrix3<f64> {
        self.0
    }

    pub fn column(&self, i: usize) -> Vector3<f64> {
        self.0.column(i).into_owned()
    }

    /// True if `R^T R` is the identity within `tol` element-wise.
    pub fn is_orthonormal(&self, tol: f64) -> bool {
        let product = self.0.transpose() * self.0;
        (product - Matrix3::identity()).iter().all(|e| e.abs() <= tol)
    }
}

impl From<Matrix3<f64>> for RotationMatrix {
    fn from(value: Matrix3<f64>) -> Self {
        Self(value)
    }
}

impl RotationTrait for RotationMatrix {
    /// Rotates a vector by the rotation matrix.
    fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.0 * v
    }

    /// Transforms a vector by the transpose of the rotation matrix.
    fn transform(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.0.transpose() * v
    }

    fn inv(&self) -> Self {
        RotationMatrix::from(self.0.transpose())
    }

    fn identity() -> Self {
        Self(Matrix3::identity())
    }
}

impl Mul<RotationMatrix> for RotationMatrix {
    type Output = RotationMatrix;

    fn mul(self, rhs: RotationMatrix) -> RotationMatrix {
        RotationMatrix::from(self.0 * rhs.0)
    }
}

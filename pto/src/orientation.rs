use nalgebra::Vector3;
use rotations::rotation_matrix::RotationMatrix;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tolerance::Tolerances;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum OrientationErrors {
    #[error("orientation.{0} has zero magnitude")]
    ZeroMagnitude(char),
    #[error("orientation vectors must be orthogonal, |y . z| = {dot}")]
    NotOrthogonal { dot: f64 },
    #[error("orientation vectors must be orthogonal, y and z are parallel")]
    Parallel,
}

/// Local frame of a PTO. `z` is the PTO axis and `y` the secondary reference
/// axis, both user supplied. `x` and the rotation matrix are derived by `set`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub z: Vector3<f64>,
    pub y: Vector3<f64>,
    pub x: Option<Vector3<f64>>,
    /// Columns are [x, y, z], maps local to global.
    pub rotation_matrix: Option<RotationMatrix>,
}

impl Default for Orientation {
    fn default() -> Self {
        Self {
            z: Vector3::z(),
            y: Vector3::y(),
            x: None,
            rotation_matrix: None,
        }
    }
}

impl Orientation {
    pub fn new(z: Vector3<f64>, y: Vector3<f64>) -> Self {
        Self {
            z,
            y,
            ..Default::default()
        }
    }

    /// Normalizes `y` and `z` and derives `x = y × z` and the rotation matrix.
    ///
    /// Nothing is modified on error.
    pub fn set(&mut self, tol: &Tolerances) -> Result<(), OrientationErrors> {
        if self.is_set() {
            return Ok(());
        }

        let z = normalize(&self.z, 'z', tol)?;
        let y = normalize(&self.y, 'y', tol)?;

        let dot = y.dot(&z);
        if !tol.is_orthogonal(dot) {
            return Err(OrientationErrors::NotOrthogonal { dot: dot.abs() });
        }

        let cross = y.cross(&z);
        let norm = cross.norm();
        if tol.is_degenerate(norm) {
            return Err(OrientationErrors::Parallel);
        }
        let x = cross / norm;

        self.z = z;
        self.y = y;
        self.x = Some(x);
        self.rotation_matrix = Some(RotationMatrix::from_columns(&x, &y, &z));
        Ok(())
    }

    /// True if the derived frame was built from the current `y` and `z`.
    pub fn is_set(&self) -> bool {
        match &self.rotation_matrix {
            Some(r) => r.column(1) == self.y && r.column(2) == self.z,
            None => false,
        }
    }
}

fn normalize(
    v: &Vector3<f64>,
    axis: char,
    tol: &Tolerances,
) -> Result<Vector3<f64>, OrientationErrors> {
    let norm = v.norm();
    if tol.is_degenerate(norm) {
        return Err(OrientationErrors::ZeroMagnitude(axis));
    }
    Ok(v / norm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Matrix3;
    use rand::{rngs::SmallRng, Rng, SeedableRng};
    use rotations::RotationTrait;

    const TOL: f64 = 1e-12;

    fn random_unit(rng: &mut SmallRng) -> Vector3<f64> {
        loop {
            let v = Vector3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );
            if v.norm() > 0.1 {
                return v.normalize();
            }
        }
    }

    #[test]
    fn test_default_frame_is_identity() {
        let mut orientation = Orientation::default();
        orientation.set(&Tolerances::default()).unwrap();
        assert_eq!(orientation.x, Some(Vector3::x()));
        assert_eq!(orientation.rotation_matrix, Some(RotationMatrix::identity()));
    }

    #[test]
    fn test_random_orthogonal_frames_are_right_handed() {
        let mut rng = SmallRng::seed_from_u64(42);
        let tol = Tolerances::default();
        for _ in 0..200 {
            let z = random_unit(&mut rng);
            let y = random_unit(&mut rng);
            // remove the z component so y is orthogonal to z
            let y = (y - z * y.dot(&z)).normalize();
            let mut orientation = Orientation::new(z * 3.0, y * 0.5);
            orientation.set(&tol).unwrap();

            let x = orientation.x.unwrap();
            let (y, z) = (orientation.y, orientation.z);
            assert_abs_diff_eq!(x.norm(), 1.0, epsilon = TOL);
            assert_abs_diff_eq!(y.norm(), 1.0, epsilon = TOL);
            assert_abs_diff_eq!(z.norm(), 1.0, epsilon = TOL);
            assert_abs_diff_eq!(x.dot(&y), 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(x.dot(&z), 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(x.cross(&y), z, epsilon = 1e-9);

            let r = orientation.rotation_matrix.unwrap();
            assert_eq!(r.column(0), x);
            assert_eq!(r.column(1), y);
            assert_eq!(r.column(2), z);
            assert!(r.is_orthonormal(1e-9));
            assert_abs_diff_eq!(r.0.transpose(), r.0.try_inverse().unwrap(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rotation_matrix_maps_local_to_global() {
        let mut orientation = Orientation::new(Vector3::x(), Vector3::z());
        orientation.set(&Tolerances::default()).unwrap();
        let r = orientation.rotation_matrix.unwrap();
        // local z is global x, local y is global z, so local x is global y
        assert_eq!(orientation.x, Some(Vector3::y()));
        assert_eq!(r.rotate(&Vector3::z()), Vector3::x());
        assert_eq!(r.0, Matrix3::new(0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn test_slightly_skewed_vectors_within_tolerance() {
        let mut orientation = Orientation::new(Vector3::z(), Vector3::new(0.0, 1.0, 0.0009));
        assert!(orientation.set(&Tolerances::default()).is_ok());
        assert!(orientation.is_set());
    }

    #[test]
    fn test_not_orthogonal_leaves_state_untouched() {
        let tol = Tolerances::default();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let z = random_unit(&mut rng) * 2.0;
            let y = random_unit(&mut rng) * 4.0;
            if y.normalize().dot(&z.normalize()).abs() <= 1e-3 {
                continue;
            }
            let mut orientation = Orientation::new(z, y);
            let before = orientation;
            let result = orientation.set(&tol);
            assert!(matches!(result, Err(OrientationErrors::NotOrthogonal { .. })));
            assert_eq!(orientation, before);
        }
    }

    #[test]
    fn test_parallel_vectors_are_rejected() {
        let mut orientation = Orientation::new(Vector3::z(), Vector3::new(0.0, 0.0, -2.0));
        assert_eq!(
            orientation.set(&Tolerances::default()),
            Err(OrientationErrors::NotOrthogonal { dot: 1.0 })
        );

        // a loose orthogonality bound still cannot complete the basis
        let loose = Tolerances::new(2.0, 1e-12);
        assert_eq!(orientation.set(&loose), Err(OrientationErrors::Parallel));
        assert!(orientation.x.is_none());
    }

    #[test]
    fn test_zero_vectors_are_rejected() {
        let mut orientation = Orientation::new(Vector3::zeros(), Vector3::y());
        assert_eq!(
            orientation.set(&Tolerances::default()),
            Err(OrientationErrors::ZeroMagnitude('z'))
        );
        let mut orientation = Orientation::new(Vector3::z(), Vector3::zeros());
        assert_eq!(
            orientation.set(&Tolerances::default()),
            Err(OrientationErrors::ZeroMagnitude('y'))
        );
    }

    #[test]
    fn test_set_twice_is_bit_identical() {
        let tol = Tolerances::default();
        let mut orientation =
            Orientation::new(Vector3::new(1.0, 1.0, 0.3), Vector3::new(1.0, -1.0, 0.0));
        orientation.set(&tol).unwrap();
        let first = orientation;
        orientation.set(&tol).unwrap();
        assert_eq!(orientation, first);
    }

    #[test]
    fn test_set_after_change_recomputes() {
        let tol = Tolerances::default();
        let mut orientation = Orientation::default();
        orientation.set(&tol).unwrap();
        orientation.y = Vector3::x();
        orientation.set(&tol).unwrap();
        assert_eq!(orientation.x, Some(Vector3::new(0.0, -1.0, 0.0)));
        assert_eq!(orientation.rotation_matrix.unwrap().column(1), Vector3::x());
    }

    #[test]
    fn test_changed_axes_are_not_set() {
        let tol = Tolerances::default();
        let mut orientation = Orientation::default();
        orientation.set(&tol).unwrap();
        assert!(orientation.is_set());

        orientation.y = Vector3::new(0.0, 1.0, 1.0);
        assert!(!orientation.is_set());
        assert!(orientation.set(&tol).is_err());
        assert!(!orientation.is_set());
        assert_eq!(orientation.rotation_matrix.unwrap().column(1), Vector3::y());
    }
}

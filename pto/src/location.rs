use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder a host writes before the user has supplied a location.
pub const UNSPECIFIED_SENTINEL: Vector3<f64> = Vector3::new(999.0, 999.0, 999.0);
/// Placeholder left behind by the first, silent validation pass.
pub const PENDING_SENTINEL: Vector3<f64> = Vector3::new(888.0, 888.0, 888.0);

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum LocationErrors {
    #[error("mounting location was never specified")]
    Missing,
}

/// Mounting location of a PTO in the global frame, meters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MountingLocation {
    #[default]
    Unspecified,
    /// Seen once by a silent validation pass, defaults on the next one.
    Pending,
    Specified(Vector3<f64>),
}

/// Which validation pass the host is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPhase {
    /// Two step protocol. The first call defers silently, the second
    /// defaults to the origin and warns.
    Warn,
    /// Single pass hosts: default to the origin and warn right away.
    SinglePass,
    /// Fail if the location was never specified.
    Error,
}

/// What a validation pass did to the location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationOutcome {
    Unchanged,
    Deferred,
    /// Replaced with the origin. The caller should warn.
    Defaulted,
}

impl MountingLocation {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::Specified(Vector3::new(x, y, z))
    }

    pub fn is_specified(&self) -> bool {
        matches!(self, MountingLocation::Specified(_))
    }

    /// The location as a vector. Unresolved states return their sentinel.
    pub fn vector(&self) -> Vector3<f64> {
        match self {
            MountingLocation::Unspecified => UNSPECIFIED_SENTINEL,
            MountingLocation::Pending => PENDING_SENTINEL,
            MountingLocation::Specified(v) => *v,
        }
    }

    /// The location if it has been resolved.
    pub fn get(&self) -> Option<&Vector3<f64>> {
        match self {
            MountingLocation::Specified(v) => Some(v),
            _ => None,
        }
    }

    pub fn validate(&mut self, phase: ValidationPhase) -> Result<LocationOutcome, LocationErrors> {
        let outcome = match (phase, *self) {
            (_, MountingLocation::Specified(_)) => LocationOutcome::Unchanged,
            (ValidationPhase::Warn, MountingLocation::Unspecified) => {
                *self = MountingLocation::Pending;
                LocationOutcome::Deferred
            }
            (ValidationPhase::Warn, MountingLocation::Pending)
            | (ValidationPhase::SinglePass, _) => {
                *self = MountingLocation::Specified(Vector3::zeros());
                LocationOutcome::Defaulted
            }
            (ValidationPhase::Error, MountingLocation::Unspecified) => {
                return Err(LocationErrors::Missing);
            }
            // only the original placeholder is an error here
            (ValidationPhase::Error, MountingLocation::Pending) => LocationOutcome::Unchanged,
        };
        Ok(outcome)
    }
}

impl From<Vector3<f64>> for MountingLocation {
    fn from(v: Vector3<f64>) -> Self {
        if v == UNSPECIFIED_SENTINEL {
            MountingLocation::Unspecified
        } else if v == PENDING_SENTINEL {
            MountingLocation::Pending
        } else {
            MountingLocation::Specified(v)
        }
    }
}

impl From<[f64; 3]> for MountingLocation {
    fn from(v: [f64; 3]) -> Self {
        MountingLocation::from(Vector3::from(v))
    }
}

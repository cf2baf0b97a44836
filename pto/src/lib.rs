pub mod config;
pub mod initial;
pub mod location;
pub mod orientation;

use initial::InitialDisplacement;
use location::{LocationErrors, LocationOutcome, MountingLocation, ValidationPhase};
use nalgebra::Vector3;
use orientation::{Orientation, OrientationErrors};
use rotations::axis_angle::{AxisAngle, AxisAngleErrors};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tolerance::Tolerances;
use tracing::{debug, warn};

pub const UNNAMED: &str = "NOT DEFINED";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PtoErrors {
    #[error("pto '{0}': a mounting location must be specified in meters as [x, y, z]")]
    MissingLocation(String),
    #[error("pto '{name}': {source}")]
    Orientation {
        name: String,
        source: OrientationErrors,
    },
    #[error("pto '{0}': pretension requires a non-zero stiffness k")]
    PretensionWithZeroStiffness(String),
    #[error("pto '{0}': equilibrium position from pretension is not finite")]
    NonFiniteEquilibrium(String),
    #[error("{0}")]
    AxisAngle(#[from] AxisAngleErrors),
}

/// Linear spring damper parameters of a PTO.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PtoParameters {
    /// Stiffness, N/m or Nm/rad.
    pub k: f64,
    /// Damping, Ns/m or Nms/rad.
    pub c: f64,
    /// Offset at which the PTO force is zero.
    pub equilibrium_position: f64,
    /// Force or torque wanted at zero displacement.
    pub pretension: f64,
}

impl PtoParameters {
    pub fn new(k: f64, c: f64) -> Self {
        Self {
            k,
            c,
            ..Default::default()
        }
    }

    pub fn with_pretension(mut self, pretension: f64) -> Self {
        self.pretension = pretension;
        self
    }

    pub fn with_equilibrium_position(mut self, equilibrium_position: f64) -> Self {
        self.equilibrium_position = equilibrium_position;
        self
    }
}

/// A power take-off between two bodies, or a body and ground.
///
/// The host fills in the parameters, location and orientation, then runs
/// `validate_location`, `set_orientation`, `resolve_pretension` and optionally
/// `compute_initial_displacement` in that order before handing the PTO to the
/// simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pto {
    pub name: String,
    pub parameters: PtoParameters,
    pub loc: MountingLocation,
    pub orientation: Orientation,
    pub initial: InitialDisplacement,
    /// Index assigned by the model that owns this PTO.
    pub pto_num: Option<usize>,
    #[serde(skip, default)]
    tolerances: Tolerances,
}

impl Default for Pto {
    fn default() -> Self {
        Self::new(UNNAMED)
    }
}

impl Pto {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parameters: PtoParameters::default(),
            loc: MountingLocation::default(),
            orientation: Orientation::default(),
            initial: InitialDisplacement::default(),
            pto_num: None,
            tolerances: Tolerances::default(),
        }
    }

    pub fn with_parameters(mut self, parameters: PtoParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_location(mut self, loc: Vector3<f64>) -> Self {
        self.loc = MountingLocation::from(loc);
        self
    }

    pub fn with_orientation(mut self, z: Vector3<f64>, y: Vector3<f64>) -> Self {
        self.orientation = Orientation::new(z, y);
        self
    }

    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    pub fn validate_location(
        &mut self,
        phase: ValidationPhase,
    ) -> Result<LocationOutcome, PtoErrors> {
        let outcome = self.loc.validate(phase).map_err(|e| match e {
            LocationErrors::Missing => PtoErrors::MissingLocation(self.name.clone()),
        })?;
        if outcome == LocationOutcome::Defaulted {
            warn!(
                pto = %self.name,
                "location not specified for pto '{}', set to [0, 0, 0]",
                self.name
            );
        }
        Ok(outcome)
    }

    pub fn set_orientation(&mut self) -> Result<(), PtoErrors> {
        self.orientation
            .set(&self.tolerances)
            .map_err(|source| PtoErrors::Orientation {
                name: self.name.clone(),
                source,
            })?;
        debug!(pto = %self.name, x = ?self.orientation.x, "orientation set");
        Ok(())
    }

    /// Shifts the equilibrium position so the PTO produces its pretension at
    /// zero displacement. A non-zero equilibrium position set by the user wins.
    pub fn resolve_pretension(&mut self) -> Result<(), PtoErrors> {
        let p = &mut self.parameters;
        if p.equilibrium_position != 0.0 || p.pretension == 0.0 {
            return Ok(());
        }
        if p.k == 0.0 {
            return Err(PtoErrors::PretensionWithZeroStiffness(self.name.clone()));
        }
        let equilibrium_position = -p.pretension / p.k;
        if !equilibrium_position.is_finite() {
            return Err(PtoErrors::NonFiniteEquilibrium(self.name.clone()));
        }
        p.equilibrium_position = equilibrium_position;
        debug!(pto = %self.name, equilibrium_position, "equilibrium position from pretension");
        Ok(())
    }

    /// Sets the initial linear displacement from a rigid rotation of the body
    /// about the line through `rotation_point`, plus `additional`.
    pub fn compute_initial_displacement(
        &mut self,
        rotation_point: &Vector3<f64>,
        rotation: &AxisAngle,
        additional: &Vector3<f64>,
    ) -> Result<&Vector3<f64>, PtoErrors> {
        let loc = self
            .loc
            .get()
            .ok_or_else(|| PtoErrors::MissingLocation(self.name.clone()))?;
        self.initial =
            InitialDisplacement::from_body_rotation(loc, rotation_point, rotation, additional);
        Ok(&self.initial.init_lin_disp)
    }

    /// Validates and derives everything a fully specified PTO needs.
    pub fn setup(&mut self) -> Result<(), PtoErrors> {
        self.validate_location(ValidationPhase::Error)?;
        // a location left pending by a silent pass is still unresolved
        if !self.loc.is_specified() {
            return Err(PtoErrors::MissingLocation(self.name.clone()));
        }
        self.set_orientation()?;
        self.resolve_pretension()
    }

    /// True once the location is resolved and the local frame is derived.
    pub fn is_ready(&self) -> bool {
        self.loc.is_specified() && self.orientation.is_set()
    }

    pub fn describe(&self) -> String {
        format!(
            concat!(
                "\t***** PTO Name: {} *****\n",
                "\tPTO Stiffness           (N/m;Nm/rad) = {:<12.2}\n",
                "\tPTO Damping           (Ns/m;Nsm/rad) = {:<12.2}\n",
            ),
            self.name, self.parameters.k, self.parameters.c
        )
    }
}

impl fmt::Display for Pto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

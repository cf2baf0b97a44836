//! Loading PTOs from a RON model file.
use crate::{location::ValidationPhase, Pto, PtoErrors, PtoParameters};
use nalgebra::Vector3;
use rotations::axis_angle::AxisAngle;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigErrors {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("{0}")]
    Pto(#[from] PtoErrors),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationInput {
    pub z: [f64; 3],
    pub y: [f64; 3],
}

impl Default for OrientationInput {
    fn default() -> Self {
        Self {
            z: [0.0, 0.0, 1.0],
            y: [0.0, 1.0, 0.0],
        }
    }
}

/// Initial rigid rotation of the body the PTO is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialInput {
    pub rotation_point: [f64; 3],
    /// Normalized before use.
    pub rotation_axis: [f64; 3],
    /// Radians.
    pub rotation_angle: f64,
    #[serde(default)]
    pub additional_displacement: [f64; 3],
}

/// User supplied description of one PTO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PtoInput {
    pub name: String,
    #[serde(default)]
    pub k: f64,
    #[serde(default)]
    pub c: f64,
    #[serde(default)]
    pub pretension: f64,
    #[serde(default)]
    pub equilibrium_position: Option<f64>,
    #[serde(default)]
    pub loc: Option<[f64; 3]>,
    #[serde(default)]
    pub orientation: OrientationInput,
    #[serde(default)]
    pub initial: Option<InitialInput>,
}

impl PtoInput {
    /// Builds the PTO and runs the full setup sequence on it.
    ///
    /// A missing location goes through both silent and warning passes, so it
    /// ends up at the origin with a warning rather than as an error.
    pub fn into_pto(self, pto_num: usize) -> Result<Pto, PtoErrors> {
        let parameters = PtoParameters::new(self.k, self.c)
            .with_pretension(self.pretension)
            .with_equilibrium_position(self.equilibrium_position.unwrap_or(0.0));

        let mut pto = Pto::new(&self.name)
            .with_parameters(parameters)
            .with_orientation(Vector3::from(self.orientation.z), Vector3::from(self.orientation.y));
        if let Some(loc) = self.loc {
            pto.loc = loc.into();
        }
        pto.pto_num = Some(pto_num);

        pto.validate_location(ValidationPhase::Warn)?;
        pto.validate_location(ValidationPhase::Warn)?;
        pto.validate_location(ValidationPhase::Error)?;
        pto.set_orientation()?;
        pto.resolve_pretension()?;

        if let Some(initial) = self.initial {
            let rotation =
                AxisAngle::new(initial.rotation_angle, Vector3::from(initial.rotation_axis))?;
            pto.compute_initial_displacement(
                &Vector3::from(initial.rotation_point),
                &rotation,
                &Vector3::from(initial.additional_displacement),
            )?;
        }
        Ok(pto)
    }
}

/// Parses a list of PTOs and configures each one, numbering them from 1.
pub fn parse_ptos(s: &str) -> Result<Vec<Pto>, ConfigErrors> {
    let inputs: Vec<PtoInput> = ron::from_str(s)?;
    let mut ptos = Vec::with_capacity(inputs.len());
    for (i, input) in inputs.into_iter().enumerate() {
        ptos.push(input.into_pto(i + 1)?);
    }
    Ok(ptos)
}

pub fn load_ptos<P: AsRef<Path>>(path: P) -> Result<Vec<Pto>, ConfigErrors> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let ptos = parse_ptos(&content)?;
    info!(
        "configured {} pto(s) from {}",
        ptos.len(),
        path.as_ref().display()
    );
    Ok(ptos)
}

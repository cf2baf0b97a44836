use clap::{Parser, Subcommand};
use colored::Colorize;
use nalgebra::Vector3;
use pto::{config::load_ptos, Pto};
use rotations::axis_angle::AxisAngle;
use rotations::RotationTrait;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load a RON file of PTOs, run their setup and print the result
    Check { path: PathBuf },
    /// Rotate a point about an axis through an origin
    Rotate {
        #[arg(long, num_args = 3, allow_negative_numbers = true, required = true)]
        point: Vec<f64>,
        #[arg(long, num_args = 3, allow_negative_numbers = true, required = true)]
        axis: Vec<f64>,
        /// Radians
        #[arg(long, allow_negative_numbers = true)]
        angle: f64,
        #[arg(
            long,
            num_args = 3,
            allow_negative_numbers = true,
            default_values_t = [0.0, 0.0, 0.0]
        )]
        origin: Vec<f64>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Check { path } => check(&path),
        Commands::Rotate {
            point,
            axis,
            angle,
            origin,
        } => rotate(&point, &axis, angle, &origin),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("ERROR: {}", e).red());
            ExitCode::FAILURE
        }
    }
}

fn check(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let ptos = load_ptos(path)?;
    for pto in &ptos {
        print_pto(pto);
    }
    println!("{}", format!("{} pto(s) ready", ptos.len()).green());
    Ok(())
}

fn print_pto(pto: &Pto) {
    print!("{}", pto);
    println!("\tloc = {:?}", pto.loc.vector().as_slice());
    println!("\tequilibrium position = {}", pto.parameters.equilibrium_position);
    println!("\tinitial displacement = {:?}", pto.initial.init_lin_disp.as_slice());
    if let Some(r) = &pto.orientation.rotation_matrix {
        print!("\trotation matrix ={}", r.0);
    }
}

fn rotate(
    point: &[f64],
    axis: &[f64],
    angle: f64,
    origin: &[f64],
) -> Result<(), Box<dyn std::error::Error>> {
    let point = Vector3::from_column_slice(point);
    let origin = Vector3::from_column_slice(origin);
    let rotation = AxisAngle::new(angle, Vector3::from_column_slice(axis))?;
    let result = rotation.rotate(&(point - origin)) + origin;
    println!("{:?}", result.as_slice());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rotate() {
        let cli = Cli::try_parse_from([
            "pto", "rotate", "--point", "1", "0", "0", "--axis", "0", "0", "-1", "--angle", "-1.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Rotate {
                point,
                axis,
                angle,
                origin,
            } => {
                assert_eq!(point, vec![1.0, 0.0, 0.0]);
                assert_eq!(axis, vec![0.0, 0.0, -1.0]);
                assert_eq!(angle, -1.5);
                assert_eq!(origin, vec![0.0, 0.0, 0.0]);
            }
            _ => panic!("expected rotate"),
        }
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["pto", "check", "model.ron"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Check { ref path } if path == &PathBuf::from("model.ron")
        ));
    }

    #[test]
    fn test_rotate_needs_three_values() {
        let args = [
            "pto", "rotate", "--point", "1", "0", "--axis", "0", "0", "1", "--angle", "1",
        ];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_rotate_zero_axis_fails() {
        assert!(rotate(&[1.0, 0.0, 0.0], &[0.0, 0.0, 0.0], 1.0, &[0.0, 0.0, 0.0]).is_err());
    }
}

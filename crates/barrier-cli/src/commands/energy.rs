use crate::cli::EnergyArgs;
use crate::config::{FileConfig, surface_params};
use crate::error::{CliError, Result};
use barriermd::core::forcefield::external::ExternalPotential;
use barriermd::core::forcefield::surface::TwoBarrierSurface;
use nalgebra::{Point3, Vector3};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointEvaluation {
    pub position: Point3<f64>,
    pub energy: f64,
    pub force: Vector3<f64>,
}

pub fn run(args: EnergyArgs) -> Result<()> {
    let file_config = FileConfig::load_optional(args.config.as_deref())?;
    let surface = TwoBarrierSurface::new(surface_params(&file_config, args.surface.as_deref())?);

    let evaluation = evaluate(&surface, Point3::new(args.x, args.y, args.z))?;
    info!(
        "Evaluated surface at ({}, {}, {}).",
        args.x, args.y, args.z
    );

    println!("{}", format_evaluation(&evaluation));
    Ok(())
}

pub fn evaluate(surface: &TwoBarrierSurface, position: Point3<f64>) -> Result<PointEvaluation> {
    if !position.iter().all(|c| c.is_finite()) {
        return Err(CliError::Argument(format!(
            "coordinates must be finite, got ({}, {}, {})",
            position.x, position.y, position.z
        )));
    }
    let (energy, force) = surface.energy_and_force(&position);
    debug!("E = {}, F = {:?}", energy, force);
    Ok(PointEvaluation {
        position,
        energy,
        force,
    })
}

fn format_evaluation(evaluation: &PointEvaluation) -> String {
    let p = &evaluation.position;
    let f = &evaluation.force;
    format!(
        "position  ({:.4}, {:.4}, {:.4}) nm\nenergy    {:.6} kJ/mol\nforce     ({:.6}, {:.6}, {:.6}) kJ/(mol nm)",
        p.x, p.y, p.z, evaluation.energy, f.x, f.y, f.z
    )
}

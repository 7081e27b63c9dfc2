use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use crate::utils::parser::{self, ParseError};
use barriermd::core::forcefield::params::{BarrierParams, SurfaceParams};
use barriermd::core::io::grid::GridSpec;
use barriermd::engine::config as core_config;
use barriermd::engine::error::EngineError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub fn build_config(args: &RunArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = FileConfig::load_optional(args.config.as_deref())?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let system_file = file_config.system.take().unwrap_or_default();
    let integrator_file = file_config.integrator.take().unwrap_or_default();
    let run_file = file_config.run.take().unwrap_or_default();
    let initial_file = file_config.initial.take().unwrap_or_default();
    let output_file = file_config.output.take().unwrap_or_default();

    let core_config = core_config::SimulationConfigBuilder::new()
        .num_particles(
            args.num_particles
                .or(system_file.num_particles)
                .unwrap_or(defaults.num_particles),
        )
        .mass(args.mass.or(system_file.mass).unwrap_or(defaults.mass))
        .temperature(
            args.temperature
                .or(integrator_file.temperature)
                .unwrap_or(defaults.temperature),
        )
        .friction(
            args.friction
                .or(integrator_file.friction)
                .unwrap_or(defaults.friction),
        )
        .timestep(
            args.timestep
                .or(integrator_file.timestep)
                .unwrap_or(defaults.timestep),
        )
        .seed(args.seed.or(integrator_file.seed))
        .num_steps(args.steps.or(run_file.num_steps).unwrap_or(defaults.num_steps))
        .report_interval(
            args.report_interval
                .or(run_file.report_interval)
                .unwrap_or(defaults.report_interval),
        )
        .x_range(initial_file.x_range.unwrap_or(defaults.x_range))
        .y_range(initial_file.y_range.unwrap_or(defaults.y_range))
        .initial_z(initial_file.z.unwrap_or(defaults.initial_z))
        .surface(file_config.surface.unwrap_or_default())
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let output_dir = args
        .output
        .clone()
        .or(output_file.directory)
        .unwrap_or(defaults.output_dir);

    let write_grid = !args.no_grid && output_file.write_grid.unwrap_or(defaults.write_grid);
    let grid = if write_grid {
        let spec = output_file.grid.unwrap_or_default();
        spec.validate()?;
        Some(spec)
    } else {
        None
    };

    debug!("Resolved simulation configuration: {:?}", core_config);

    Ok(AppConfig {
        output_dir,
        grid,
        core_config,
    })
}

/// Surface coefficients from an optional file, validated.
/// Surface coefficients for the single-point commands.
///
/// A standalone surface file replaces the `[surface]` section of the configuration.
pub fn surface_params(
    file_config: &FileConfig,
    surface_file: Option<&Path>,
) -> Result<SurfaceParams> {
    if let Some(path) = surface_file {
        info!("Loading surface parameters from {:?}", path);
        return SurfaceParams::load(path).map_err(|e| CliError::Engine(EngineError::from(e)));
    }
    let params = file_config.surface.unwrap_or_default();
    params
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;
    Ok(params)
}

/// Grid settings from `[output.grid]`, or the default grid.
pub fn grid_spec(file_config: &FileConfig) -> GridSpec {
    file_config
        .output
        .as_ref()
        .and_then(|output| output.grid)
        .unwrap_or_default()
}

fn set_error(e: ParseError) -> CliError {
    CliError::Config(e.to_string())
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let (key, value_str) = parser::parse_assignment(kv_pair).map_err(set_error)?;
        let float = || parser::parse_value::<f64>(key, value_str, "float").map_err(set_error);
        let integer = || parser::parse_value::<u64>(key, value_str, "integer").map_err(set_error);
        let range = || parser::parse_range(key, value_str).map_err(set_error);

        match key {
            "system.num-particles" => {
                config.system.get_or_insert_with(Default::default).num_particles = Some(
                    parser::parse_value(key, value_str, "integer").map_err(set_error)?,
                );
            }
            "system.mass" => {
                config.system.get_or_insert_with(Default::default).mass = Some(float()?);
            }
            "integrator.temperature" => {
                config
                    .integrator
                    .get_or_insert_with(Default::default)
                    .temperature = Some(float()?);
            }
            "integrator.friction" => {
                config.integrator.get_or_insert_with(Default::default).friction = Some(float()?);
            }
            "integrator.timestep" => {
                config.integrator.get_or_insert_with(Default::default).timestep = Some(float()?);
            }
            "integrator.seed" => {
                config.integrator.get_or_insert_with(Default::default).seed = Some(integer()?);
            }
            "run.num-steps" => {
                config.run.get_or_insert_with(Default::default).num_steps = Some(integer()?);
            }
            "run.report-interval" => {
                config.run.get_or_insert_with(Default::default).report_interval =
                    Some(integer()?);
            }
            "initial.x-range" => {
                config.initial.get_or_insert_with(Default::default).x_range = Some(range()?);
            }
            "initial.y-range" => {
                config.initial.get_or_insert_with(Default::default).y_range = Some(range()?);
            }
            "initial.z" => {
                config.initial.get_or_insert_with(Default::default).z = Some(float()?);
            }
            "surface.well-depth" => {
                config.surface.get_or_insert_with(Default::default).well_depth = float()?;
            }
            "surface.well-width" => {
                config.surface.get_or_insert_with(Default::default).well_width = float()?;
            }
            "surface.confinement" => {
                config.surface.get_or_insert_with(Default::default).confinement = float()?;
            }
            "output.directory" => {
                config.output.get_or_insert_with(Default::default).directory =
                    Some(PathBuf::from(value_str));
            }
            "output.write-grid" => {
                config.output.get_or_insert_with(Default::default).write_grid = Some(
                    parser::parse_value(key, value_str, "boolean").map_err(set_error)?,
                );
            }
            "output.grid.resolution" => {
                config
                    .output
                    .get_or_insert_with(Default::default)
                    .grid
                    .get_or_insert_with(Default::default)
                    .resolution = parser::parse_value(key, value_str, "integer").map_err(set_error)?;
            }
            _ => {
                if let Some(field) = key.strip_prefix("surface.left-barrier.") {
                    let surface = config.surface.get_or_insert_with(Default::default);
                    set_barrier_field(&mut surface.left_barrier, key, field, float()?)?;
                } else if let Some(field) = key.strip_prefix("surface.right-barrier.") {
                    let surface = config.surface.get_or_insert_with(Default::default);
                    set_barrier_field(&mut surface.right_barrier, key, field, float()?)?;
                } else if let Some(field) = key.strip_prefix("output.grid.") {
                    let grid = config
                        .output
                        .get_or_insert_with(Default::default)
                        .grid
                        .get_or_insert_with(Default::default);
                    set_grid_bound(grid, key, field, float()?)?;
                } else {
                    return Err(unsupported_key(key));
                }
            }
        }
    }
    Ok(config)
}

fn set_barrier_field(
    barrier: &mut BarrierParams,
    key: &str,
    field: &str,
    value: f64,
) -> Result<()> {
    match field {
        "height" => barrier.height = value,
        "center" => barrier.center = value,
        "sharpness" => barrier.sharpness = value,
        _ => return Err(unsupported_key(key)),
    }
    Ok(())
}

fn set_grid_bound(grid: &mut GridSpec, key: &str, field: &str, value: f64) -> Result<()> {
    match field {
        "x-min" => grid.x_min = value,
        "x-max" => grid.x_max = value,
        "y-min" => grid.y_min = value,
        "y-max" => grid.y_max = value,
        "z" => grid.z = value,
        _ => return Err(unsupported_key(key)),
    }
    Ok(())
}

fn unsupported_key(key: &str) -> CliError {
    CliError::Config(format!(
        "Unsupported configuration key for --set: '{}'",
        key
    ))
}

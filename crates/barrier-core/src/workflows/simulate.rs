use crate::core::analysis::{BasinOccupancy, basin_occupancy, count_barrier_crossings};
use crate::core::forcefield::external::ExternalForce;
use crate::core::forcefield::surface::TwoBarrierSurface;
use crate::core::io::export::{ExportError, write_frames_to_path, write_grid_to_path};
use crate::core::io::grid::{GridSpec, PotentialGrid};
use crate::core::models::system::System;
use crate::core::models::trajectory::Trajectory;
use crate::engine::config::{InitialConfig, SimulationConfig, SystemConfig};
use crate::engine::context::Context;
use crate::engine::error::EngineError;
use crate::engine::integrator::LangevinIntegrator;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::State;
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const FRAMES_FILE: &str = "frames.csv";
pub const GRID_FILE: &str = "potential_grid.csv";

/// Aggregate observations of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Seed actually used, so runs without an explicit seed can be repeated.
    pub seed: u64,
    pub final_temperature: f64,
    /// Potential energy per particle averaged over all recorded frames, in kJ/mol.
    pub mean_potential_energy: f64,
    pub initial_occupancy: BasinOccupancy,
    pub final_occupancy: BasinOccupancy,
    pub barrier_crossings: usize,
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub trajectory: Trajectory,
    pub final_state: State,
    pub summary: RunSummary,
    pub surface: TwoBarrierSurface,
}

/// Runs the full simulation described by `config`.
///
/// Records frame 0 before any step, then one frame after every `report_interval`
/// steps. When `num_steps` is not a multiple of the interval the remaining steps run as
/// a final shorter chunk that is recorded as well.
#[instrument(skip_all, name = "simulation_workflow")]
pub fn run(
    config: &SimulationConfig,
    reporter: &ProgressReporter,
) -> Result<SimulationResult, EngineError> {
    // === Phase 0: Setup ===
    reporter.report(Progress::PhaseStart {
        name: "System Setup",
    });
    config.validate()?;

    let seed = match config.integrator.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::rng().random();
            reporter.report(Progress::Message(format!(
                "No seed configured, drew {}",
                seed
            )));
            seed
        }
    };
    info!("Using random seed {}.", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let surface = TwoBarrierSurface::new(config.surface);
    let system = build_system(&config.system, surface)?;
    let positions = initial_positions(&config.initial, config.system.num_particles, &mut rng);

    let integrator = LangevinIntegrator::new(
        config.integrator.temperature,
        config.integrator.friction,
        config.integrator.timestep,
    )?
    .with_seed(rng.random());

    let mut context = Context::new(system, integrator)?;
    context.set_positions(positions)?;
    context.set_velocities_to_temperature(config.integrator.temperature, rng.random())?;
    info!(
        "Prepared {} particles at {} K (friction {} ps^-1, step {} ps).",
        config.system.num_particles,
        config.integrator.temperature,
        config.integrator.friction,
        config.integrator.timestep
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 1: Dynamics with periodic sampling ===
    let (trajectory, potential_energies) = integrate(&mut context, config, reporter)?;

    // === Phase 2: Summary ===
    let final_state = context.state();
    let summary = summarize(
        seed,
        &surface,
        &trajectory,
        &potential_energies,
        &final_state,
    );
    info!(
        "Run complete: {} frames, {} barrier crossings, final temperature {:.1} K.",
        trajectory.len(),
        summary.barrier_crossings,
        summary.final_temperature
    );

    Ok(SimulationResult {
        trajectory,
        final_state,
        summary,
        surface,
    })
}

/// Files produced by [`write_outputs`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFiles {
    pub frames: PathBuf,
    pub grid: Option<PathBuf>,
}

/// Writes the sampled frames into `directory`, plus the surface sampled on `grid` when given.
///
/// The directory is created if it does not exist.
#[instrument(skip_all, name = "output_writer")]
pub fn write_outputs(
    result: &SimulationResult,
    directory: &Path,
    grid: Option<&GridSpec>,
) -> Result<OutputFiles, EngineError> {
    std::fs::create_dir_all(directory).map_err(|e| ExportError::Io {
        path: directory.to_string_lossy().to_string(),
        source: e,
    })?;

    let frames = directory.join(FRAMES_FILE);
    info!(
        "Writing {} frames to {:?}",
        result.trajectory.len(),
        &frames
    );
    write_frames_to_path(&result.trajectory, &frames)?;

    let grid = match grid {
        Some(spec) => {
            let path = directory.join(GRID_FILE);
            info!(
                "Sampling the surface on a {0}x{0} grid for {1:?}",
                spec.resolution, &path
            );
            let sampled = PotentialGrid::sample(&result.surface, spec)?;
            write_grid_to_path(&sampled, &path)?;
            Some(path)
        }
        None => None,
    };

    Ok(OutputFiles { frames, grid })
}

/// Builds a system of identical particles, all coupled to `surface`.
pub fn build_system(
    config: &SystemConfig,
    surface: TwoBarrierSurface,
) -> Result<System, EngineError> {
    let mut system = System::new();
    let mut force = ExternalForce::new(Arc::new(surface));
    for _ in 0..config.num_particles {
        let id = system.add_particle(config.mass)?;
        force.add_particle(id);
    }
    system.add_force(force)?;
    debug!("Assembled system with {} particles.", system.particle_count());
    Ok(system)
}

/// Draws starting positions uniformly from the configured box.
pub fn initial_positions<R: Rng>(
    config: &InitialConfig,
    count: usize,
    rng: &mut R,
) -> Vec<Point3<f64>> {
    (0..count)
        .map(|_| {
            let x = sample_range(rng, config.x_range);
            let y = sample_range(rng, config.y_range);
            Point3::new(x, y, config.z)
        })
        .collect()
}

#[inline]
fn sample_range<R: Rng>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    lo + (hi - lo) * rng.random::<f64>()
}

fn integrate(
    context: &mut Context,
    config: &SimulationConfig,
    reporter: &ProgressReporter,
) -> Result<(Trajectory, Vec<f64>), EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Langevin Dynamics",
    });

    let num_frames = config.run.num_frames();
    let mut trajectory = Trajectory::with_capacity(num_frames);
    let mut potential_energies = Vec::with_capacity(num_frames);

    trajectory.push(context.state().into());
    potential_energies.push(context.potential_energy());

    reporter.report(Progress::TaskStart {
        total_steps: config.run.num_steps,
    });

    let mut remaining = config.run.num_steps;
    while remaining > 0 {
        let chunk = remaining.min(config.run.report_interval);
        context.step(chunk)?;
        remaining -= chunk;

        let state = context.state();
        let temperature = state.temperature();
        potential_energies.push(state.potential_energy);
        debug!(
            "Frame {} at step {}: T = {:.1} K, U = {:.3} kJ/mol.",
            trajectory.len(),
            state.step,
            temperature,
            state.potential_energy
        );
        reporter.report(Progress::FrameSampled {
            frame: trajectory.len(),
            step: state.step,
            temperature,
        });
        trajectory.push(state.into());

        for _ in 0..chunk {
            reporter.report(Progress::TaskIncrement);
        }
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    Ok((trajectory, potential_energies))
}

fn summarize(
    seed: u64,
    surface: &TwoBarrierSurface,
    trajectory: &Trajectory,
    potential_energies: &[f64],
    final_state: &State,
) -> RunSummary {
    let barriers = surface.barrier_positions();
    let n = final_state.positions.len().max(1) as f64;
    let mean_potential_energy = if potential_energies.is_empty() {
        0.0
    } else {
        potential_energies.iter().sum::<f64>() / potential_energies.len() as f64 / n
    };

    RunSummary {
        seed,
        final_temperature: final_state.temperature(),
        mean_potential_energy,
        initial_occupancy: trajectory
            .first()
            .map(|f| basin_occupancy(f, barriers))
            .unwrap_or_default(),
        final_occupancy: trajectory
            .last()
            .map(|f| basin_occupancy(f, barriers))
            .unwrap_or_default(),
        barrier_crossings: count_barrier_crossings(trajectory, barriers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::SimulationConfigBuilder;
    use std::sync::Mutex;
    use tempfile::tempdir;

    fn small_config(seed: u64) -> SimulationConfig {
        SimulationConfigBuilder::new()
            .num_particles(20)
            .mass(1.0)
            .temperature(750.0)
            .friction(100.0)
            .timestep(0.01)
            .seed(Some(seed))
            .num_steps(250)
            .report_interval(100)
            .x_range((-1.0, 1.0))
            .y_range((-0.5, 0.5))
            .build()
            .unwrap()
    }

    #[test]
    fn initial_positions_stay_inside_the_start_box() {
        let config = InitialConfig {
            x_range: (-1.0, 1.0),
            y_range: (0.2, 0.6),
            z: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let positions = initial_positions(&config, 500, &mut rng);
        assert_eq!(positions.len(), 500);
        assert!(positions.iter().all(|p| (-1.0..=1.0).contains(&p.x)));
        assert!(positions.iter().all(|p| (0.2..=0.6).contains(&p.y)));
        assert!(positions.iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn build_system_couples_every_particle_to_the_surface() {
        let config = SystemConfig {
            num_particles: 7,
            mass: 2.0,
        };
        let system = build_system(&config, TwoBarrierSurface::default()).unwrap();
        assert_eq!(system.particle_count(), 7);
        assert_eq!(system.forces().len(), 1);
        assert_eq!(system.forces()[0].particle_count(), 7);
        assert!(system.masses().iter().all(|&m| m == 2.0));
    }

    #[test]
    fn build_system_rejects_invalid_mass() {
        let config = SystemConfig {
            num_particles: 1,
            mass: -1.0,
        };
        assert!(matches!(
            build_system(&config, TwoBarrierSurface::default()),
            Err(EngineError::Model { .. })
        ));
    }

    #[test]
    fn run_records_initial_frame_and_one_per_chunk() {
        let result = run(&small_config(5), &ProgressReporter::new()).unwrap();
        let steps: Vec<_> = result.trajectory.iter().map(|f| f.step).collect();

        assert_eq!(steps, vec![0, 100, 200, 250]);
        assert_eq!(result.final_state.step, 250);
        assert!((result.final_state.time - 2.5).abs() < 1e-9);
        assert!(result.trajectory.iter().all(|f| f.positions.len() == 20));
        assert_eq!(result.summary.seed, 5);
        assert_eq!(result.summary.initial_occupancy.total(), 20);
        assert_eq!(result.summary.initial_occupancy.central, 20);
    }

    #[test]
    fn run_keeps_particles_near_the_z_plane() {
        let result = run(&small_config(8), &ProgressReporter::new()).unwrap();
        let frame = result.trajectory.last().unwrap();
        // thermal spread of the restraint: sqrt(kT / 2000) ≈ 0.056 nm at 750 K
        assert!(frame.positions.iter().all(|p| p.z.abs() < 0.5));
        assert!(result.summary.mean_potential_energy < 0.0);
        assert!(result.summary.final_temperature > 0.0);
    }

    #[test]
    fn run_is_reproducible_for_a_fixed_seed() {
        let a = run(&small_config(21), &ProgressReporter::new()).unwrap();
        let b = run(&small_config(21), &ProgressReporter::new()).unwrap();
        assert_eq!(a.trajectory, b.trajectory);
        assert_eq!(a.summary, b.summary);
    }

    #[test]
    fn run_without_steps_returns_only_the_initial_frame() {
        let mut config = small_config(2);
        config.run.num_steps = 0;
        let result = run(&config, &ProgressReporter::new()).unwrap();
        assert_eq!(result.trajectory.len(), 1);
        assert_eq!(result.summary.barrier_crossings, 0);
    }

    #[test]
    fn run_reports_phases_frames_and_every_step() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        run(&small_config(4), &reporter).unwrap();
        drop(reporter);
        let events = events.into_inner().unwrap();

        let increments = events
            .iter()
            .filter(|e| matches!(e, Progress::TaskIncrement))
            .count();
        let frames = events
            .iter()
            .filter(|e| matches!(e, Progress::FrameSampled { .. }))
            .count();
        let phases = events
            .iter()
            .filter(|e| matches!(e, Progress::PhaseStart { .. }))
            .count();

        assert_eq!(increments, 250);
        assert_eq!(frames, 3);
        assert_eq!(phases, 2);
        assert_eq!(events.last(), Some(&Progress::PhaseFinish));
    }

    #[test]
    fn run_announces_a_drawn_seed_but_not_a_configured_one() {
        let collect = |config: &SimulationConfig| {
            let events = Mutex::new(Vec::new());
            let reporter = ProgressReporter::with_callback(Box::new(|event| {
                if let Progress::Message(msg) = event {
                    events.lock().unwrap().push(msg);
                }
            }));
            let result = run(config, &reporter).unwrap();
            drop(reporter);
            (result.summary.seed, events.into_inner().unwrap())
        };

        let (_, messages) = collect(&small_config(9));
        assert!(messages.is_empty());

        let mut config = small_config(9);
        config.integrator.seed = None;
        config.run.num_steps = 10;
        let (seed, messages) = collect(&config);
        assert_eq!(messages, vec![format!("No seed configured, drew {}", seed)]);
    }

    #[test]
    fn write_outputs_creates_the_directory_and_both_files() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("a/b");
        let mut config = small_config(6);
        config.run.num_steps = 20;
        config.run.report_interval = 10;
        let result = run(&config, &ProgressReporter::new()).unwrap();
        let spec = GridSpec {
            resolution: 5,
            ..GridSpec::default()
        };

        let files = write_outputs(&result, &output, Some(&spec)).unwrap();

        assert_eq!(files.frames, output.join(FRAMES_FILE));
        assert_eq!(files.grid, Some(output.join(GRID_FILE)));
        let frames = std::fs::read_to_string(&files.frames).unwrap();
        // header plus 3 frames of 20 particles
        assert_eq!(frames.lines().count(), 1 + 3 * 20);
        let grid = std::fs::read_to_string(output.join(GRID_FILE)).unwrap();
        assert_eq!(grid.lines().count(), 1 + 25);
    }

    #[test]
    fn write_outputs_reports_export_failures_as_engine_errors() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-directory");
        std::fs::write(&blocker, "").unwrap();
        let mut config = small_config(6);
        config.run.num_steps = 0;
        let result = run(&config, &ProgressReporter::new()).unwrap();

        assert!(matches!(
            write_outputs(&result, &blocker, None),
            Err(EngineError::Export {
                source: ExportError::Io { .. }
            })
        ));

        let inverted = GridSpec {
            x_min: 1.0,
            x_max: -1.0,
            ..GridSpec::default()
        };
        assert!(matches!(
            write_outputs(&result, dir.path(), Some(&inverted)),
            Err(EngineError::Export {
                source: ExportError::InvalidGrid(_)
            })
        ));
    }

    #[test]
    fn run_rejects_invalid_config() {
        let mut config = small_config(1);
        config.integrator.timestep = 0.0;
        assert!(matches!(
            run(&config, &ProgressReporter::new()),
            Err(EngineError::Config { .. })
        ));
    }
}

use super::error::EngineError;
use super::forces::ForceEvaluator;
use super::integrator::LangevinIntegrator;
use super::state::State;
use crate::core::analysis::{instantaneous_temperature, kinetic_energy};
use crate::core::models::ids::ParticleId;
use crate::core::models::system::System;
use crate::core::units::thermal_energy;
use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use slotmap::SecondaryMap;
use tracing::{debug, instrument, warn};

/// Per-particle arrays in the dense order of the owning context.
#[derive(Debug, Clone)]
pub(crate) struct ParticleBuffers {
    pub(crate) positions: Vec<Point3<f64>>,
    pub(crate) velocities: Vec<Vector3<f64>>,
    pub(crate) forces: Vec<Vector3<f64>>,
    pub(crate) masses: Vec<f64>,
    pub(crate) inverse_masses: Vec<f64>,
    pub(crate) potential_energy: f64,
}

/// A system bound to an integrator, together with the coordinates being propagated.
///
/// Particles are stored densely in the system's iteration order, so index `i` of
/// [`positions`](Self::positions) is the `i`-th particle added to the system.
#[derive(Debug, Clone)]
pub struct Context {
    system: System,
    integrator: LangevinIntegrator,
    evaluator: ForceEvaluator,
    index_of: SecondaryMap<ParticleId, usize>,
    buffers: ParticleBuffers,
    step_count: u64,
    time: f64,
}

fn all_finite<'a>(values: impl IntoIterator<Item = &'a f64>) -> bool {
    values.into_iter().all(|v| v.is_finite())
}

impl Context {
    /// Binds `system` to `integrator`. All particles start at the origin at rest.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Initialization`] if the system has no particles.
    pub fn new(system: System, integrator: LangevinIntegrator) -> Result<Self, EngineError> {
        let n = system.particle_count();
        if n == 0 {
            return Err(EngineError::Initialization(
                "cannot create a context for a system without particles".to_string(),
            ));
        }

        let index_of: SecondaryMap<ParticleId, usize> = system
            .particle_ids()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect();
        let evaluator = ForceEvaluator::from_system(&system, &index_of);
        let masses = system.masses();
        let inverse_masses = masses.iter().map(|&m| 1.0 / m).collect();

        let mut buffers = ParticleBuffers {
            positions: vec![Point3::origin(); n],
            velocities: vec![Vector3::zeros(); n],
            forces: vec![Vector3::zeros(); n],
            masses,
            inverse_masses,
            potential_energy: 0.0,
        };
        buffers.potential_energy = evaluator.evaluate(&buffers.positions, &mut buffers.forces);

        debug!(
            "Created context with {} particles and {} external force(s).",
            n,
            system.forces().len()
        );

        Ok(Self {
            system,
            integrator,
            evaluator,
            index_of,
            buffers,
            step_count: 0,
            time: 0.0,
        })
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn integrator(&self) -> &LangevinIntegrator {
        &self.integrator
    }

    pub fn particle_count(&self) -> usize {
        self.buffers.positions.len()
    }

    fn check_len(&self, actual: usize) -> Result<(), EngineError> {
        let expected = self.particle_count();
        if actual != expected {
            return Err(EngineError::ParticleCountMismatch { expected, actual });
        }
        Ok(())
    }

    /// Replaces all positions (nm) and recomputes forces.
    pub fn set_positions(&mut self, positions: Vec<Point3<f64>>) -> Result<(), EngineError> {
        self.check_len(positions.len())?;
        if !positions.iter().all(|p| all_finite(p.coords.iter())) {
            return Err(EngineError::InvalidParameter {
                parameter: "positions",
                reason: "all coordinates must be finite".to_string(),
            });
        }
        self.buffers.positions = positions;
        self.refresh_forces();
        Ok(())
    }

    /// Replaces all velocities (nm/ps).
    pub fn set_velocities(&mut self, velocities: Vec<Vector3<f64>>) -> Result<(), EngineError> {
        self.check_len(velocities.len())?;
        if !velocities.iter().all(|v| all_finite(v.iter())) {
            return Err(EngineError::InvalidParameter {
                parameter: "velocities",
                reason: "all components must be finite".to_string(),
            });
        }
        self.buffers.velocities = velocities;
        Ok(())
    }

    /// Draws velocities from the Maxwell–Boltzmann distribution at `temperature` (K).
    pub fn set_velocities_to_temperature(
        &mut self,
        temperature: f64,
        seed: u64,
    ) -> Result<(), EngineError> {
        if !(temperature.is_finite() && temperature >= 0.0) {
            return Err(EngineError::InvalidParameter {
                parameter: "temperature",
                reason: format!("must be finite and non-negative, got {}", temperature),
            });
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let kt = thermal_energy(temperature);
        for (velocity, &inv_mass) in self
            .buffers
            .velocities
            .iter_mut()
            .zip(&self.buffers.inverse_masses)
        {
            let sigma = (kt * inv_mass).sqrt();
            *velocity = Vector3::new(
                rng.sample::<f64, _>(StandardNormal),
                rng.sample::<f64, _>(StandardNormal),
                rng.sample::<f64, _>(StandardNormal),
            ) * sigma;
        }
        Ok(())
    }

    fn refresh_forces(&mut self) {
        self.buffers.potential_energy = self
            .evaluator
            .evaluate(&self.buffers.positions, &mut self.buffers.forces);
    }

    /// Advances the simulation by `steps` integration steps.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unstable`] as soon as any coordinate stops being finite;
    /// the context keeps the offending coordinates for inspection.
    #[instrument(level = "debug", skip(self), fields(start = self.step_count))]
    pub fn step(&mut self, steps: u64) -> Result<(), EngineError> {
        for _ in 0..steps {
            self.integrator.step(&mut self.buffers, &self.evaluator);
            self.step_count += 1;
            self.time += self.integrator.step_size();

            let finite = self
                .buffers
                .positions
                .iter()
                .all(|p| all_finite(p.coords.iter()))
                && self.buffers.potential_energy.is_finite();
            if !finite {
                warn!(
                    "Non-finite coordinates after step {}; the time step is likely too large.",
                    self.step_count
                );
                return Err(EngineError::Unstable {
                    step: self.step_count,
                });
            }
        }
        Ok(())
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.buffers.positions
    }

    pub fn velocities(&self) -> &[Vector3<f64>] {
        &self.buffers.velocities
    }

    pub fn forces(&self) -> &[Vector3<f64>] {
        &self.buffers.forces
    }

    pub fn position(&self, id: ParticleId) -> Option<Point3<f64>> {
        self.index_of
            .get(id)
            .map(|&i| self.buffers.positions[i])
    }

    pub fn potential_energy(&self) -> f64 {
        self.buffers.potential_energy
    }

    pub fn kinetic_energy(&self) -> f64 {
        kinetic_energy(&self.buffers.velocities, &self.buffers.masses)
    }

    pub fn temperature(&self) -> f64 {
        instantaneous_temperature(self.kinetic_energy(), self.system.degrees_of_freedom())
    }

    /// Potential energy of arbitrary positions under this context's forces, leaving the
    /// context untouched.
    pub fn evaluate_energy(&self, positions: &[Point3<f64>]) -> Result<f64, EngineError> {
        self.check_len(positions.len())?;
        Ok(self.evaluator.energy(positions))
    }

    /// Simulated time in ps.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn state(&self) -> State {
        State {
            step: self.step_count,
            time: self.time,
            positions: self.buffers.positions.clone(),
            velocities: self.buffers.velocities.clone(),
            forces: self.buffers.forces.clone(),
            potential_energy: self.buffers.potential_energy,
            kinetic_energy: self.kinetic_energy(),
        }
    }
}

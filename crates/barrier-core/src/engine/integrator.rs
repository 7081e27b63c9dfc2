use super::context::ParticleBuffers;
use super::error::EngineError;
use super::forces::ForceEvaluator;
use crate::core::units::thermal_energy;
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Langevin dynamics with the BAOAB splitting.
///
/// One step is a half kick (B), a half drift (A), an exact Ornstein–Uhlenbeck update of
/// the velocities (O), a second half drift, a force evaluation and a final half kick.
/// With zero friction the O stage is the identity and the scheme reduces to velocity
/// Verlet.
#[derive(Debug, Clone)]
pub struct LangevinIntegrator {
    /// K.
    temperature: f64,
    /// ps⁻¹.
    friction: f64,
    /// ps.
    step_size: f64,
    rng: StdRng,
}

fn check_non_negative(parameter: &'static str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidParameter {
            parameter,
            reason: format!("must be finite and non-negative, got {}", value),
        })
    }
}

fn check_positive(parameter: &'static str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidParameter {
            parameter,
            reason: format!("must be finite and positive, got {}", value),
        })
    }
}

impl LangevinIntegrator {
    /// Creates an integrator seeded from the operating system. Use
    /// [`with_seed`](Self::with_seed) for reproducible runs.
    pub fn new(temperature: f64, friction: f64, step_size: f64) -> Result<Self, EngineError> {
        check_non_negative("temperature", temperature)?;
        check_non_negative("friction", friction)?;
        check_positive("step_size", step_size)?;
        Ok(Self {
            temperature,
            friction,
            step_size,
            rng: StdRng::from_os_rng(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_random_seed(seed);
        self
    }

    pub fn set_random_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn set_temperature(&mut self, temperature: f64) -> Result<(), EngineError> {
        check_non_negative("temperature", temperature)?;
        self.temperature = temperature;
        Ok(())
    }

    pub fn set_friction(&mut self, friction: f64) -> Result<(), EngineError> {
        check_non_negative("friction", friction)?;
        self.friction = friction;
        Ok(())
    }

    pub fn set_step_size(&mut self, step_size: f64) -> Result<(), EngineError> {
        check_positive("step_size", step_size)?;
        self.step_size = step_size;
        Ok(())
    }

    /// Advances `buffers` by one step. Forces in `buffers` must be current on entry and
    /// are current again on exit.
    pub(crate) fn step(&mut self, buffers: &mut ParticleBuffers, evaluator: &ForceEvaluator) {
        let half_dt = 0.5 * self.step_size;
        let decay = (-self.friction * self.step_size).exp();
        let noise_scale = ((1.0 - decay * decay) * thermal_energy(self.temperature)).sqrt();

        for i in 0..buffers.positions.len() {
            let inv_mass = buffers.inverse_masses[i];
            let velocity = &mut buffers.velocities[i];

            *velocity += buffers.forces[i] * (half_dt * inv_mass);
            buffers.positions[i] += *velocity * half_dt;

            *velocity *= decay;
            if noise_scale > 0.0 {
                let noise = Vector3::new(
                    self.rng.sample(StandardNormal),
                    self.rng.sample(StandardNormal),
                    self.rng.sample(StandardNormal),
                );
                *velocity += noise * (noise_scale * inv_mass.sqrt());
            }

            buffers.positions[i] += *velocity * half_dt;
        }

        buffers.potential_energy = evaluator.evaluate(&buffers.positions, &mut buffers.forces);

        for i in 0..buffers.velocities.len() {
            buffers.velocities[i] += buffers.forces[i] * (half_dt * buffers.inverse_masses[i]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::external::ExternalForce;
    use crate::core::forcefield::surface::TwoBarrierSurface;
    use crate::core::models::system::System;
    use crate::engine::context::Context;
    use nalgebra::Point3;
    use std::sync::Arc;

    fn surface_system(n: usize, mass: f64) -> System {
        let mut system = System::new();
        let mut force = ExternalForce::new(Arc::new(TwoBarrierSurface::default()));
        for _ in 0..n {
            let id = system.add_particle(mass).unwrap();
            force.add_particle(id);
        }
        system.add_force(force).unwrap();
        system
    }

    fn free_system(n: usize, mass: f64) -> System {
        let mut system = System::new();
        for _ in 0..n {
            system.add_particle(mass).unwrap();
        }
        system
    }

    #[test]
    fn new_rejects_invalid_parameters() {
        assert!(LangevinIntegrator::new(-1.0, 1.0, 0.01).is_err());
        assert!(LangevinIntegrator::new(300.0, -1.0, 0.01).is_err());
        assert!(LangevinIntegrator::new(300.0, 1.0, 0.0).is_err());
        assert!(LangevinIntegrator::new(300.0, 1.0, f64::NAN).is_err());
        assert!(matches!(
            LangevinIntegrator::new(300.0, 1.0, -0.002),
            Err(EngineError::InvalidParameter {
                parameter: "step_size",
                ..
            })
        ));
    }

    #[test]
    fn setters_validate_and_update_parameters() {
        let mut integrator = LangevinIntegrator::new(300.0, 1.0, 0.002).unwrap();
        integrator.set_temperature(750.0).unwrap();
        integrator.set_friction(100.0).unwrap();
        integrator.set_step_size(0.01).unwrap();
        assert_eq!(integrator.temperature(), 750.0);
        assert_eq!(integrator.friction(), 100.0);
        assert_eq!(integrator.step_size(), 0.01);

        assert!(integrator.set_temperature(f64::INFINITY).is_err());
        assert!(integrator.set_step_size(0.0).is_err());
        assert_eq!(integrator.temperature(), 750.0);
    }

    #[test]
    fn zero_friction_conserves_total_energy() {
        let integrator = LangevinIntegrator::new(0.0, 0.0, 0.001).unwrap();
        let mut context = Context::new(surface_system(1, 1.0), integrator).unwrap();
        context
            .set_positions(vec![Point3::new(0.3, 0.2, 0.0)])
            .unwrap();

        let initial = context.state().total_energy();
        let mut max_deviation: f64 = 0.0;
        for _ in 0..200 {
            context.step(10).unwrap();
            let deviation = (context.state().total_energy() - initial).abs();
            max_deviation = max_deviation.max(deviation);
        }
        assert!(max_deviation < 1e-2, "energy drifted by {}", max_deviation);
        assert!(context.positions()[0].z.abs() < 1e-12);
    }

    #[test]
    fn zero_temperature_with_friction_relaxes_into_the_channel() {
        let integrator = LangevinIntegrator::new(0.0, 50.0, 0.005).unwrap();
        let mut context = Context::new(surface_system(1, 1.0), integrator).unwrap();
        context
            .set_positions(vec![Point3::new(0.0, 0.8, 0.05)])
            .unwrap();

        context.step(4000).unwrap();
        let p = context.positions()[0];
        assert!(p.y.abs() < 1e-3, "y did not relax: {}", p.y);
        assert!(p.z.abs() < 1e-6, "z did not relax: {}", p.z);
        assert!(context.kinetic_energy() < 1e-6);
    }

    #[test]
    fn free_particles_thermalize_to_bath_temperature() {
        let target = 300.0;
        let integrator = LangevinIntegrator::new(target, 10.0, 0.002)
            .unwrap()
            .with_seed(11);
        let mut context = Context::new(free_system(200, 1.0), integrator).unwrap();

        context.step(1000).unwrap();
        let samples = 50;
        let mut mean = 0.0;
        for _ in 0..samples {
            context.step(100).unwrap();
            mean += context.temperature();
        }
        mean /= samples as f64;

        assert!(
            (mean - target).abs() / target < 0.05,
            "mean temperature {} too far from {}",
            mean,
            target
        );
    }

    #[test]
    fn equal_seeds_reproduce_identical_trajectories() {
        let run = |seed: u64| {
            let integrator = LangevinIntegrator::new(750.0, 100.0, 0.01)
                .unwrap()
                .with_seed(seed);
            let mut context = Context::new(surface_system(5, 1.0), integrator).unwrap();
            context.set_positions(vec![Point3::origin(); 5]).unwrap();
            context.step(50).unwrap();
            context.state().positions
        };

        assert_eq!(run(42), run(42));
        assert_ne!(run(42), run(43));
    }

    #[test]
    fn oversized_step_is_reported_as_unstable() {
        let integrator = LangevinIntegrator::new(0.0, 0.0, 1.0).unwrap();
        let mut context = Context::new(surface_system(1, 1.0), integrator).unwrap();
        context
            .set_positions(vec![Point3::new(0.0, 0.0, 0.1)])
            .unwrap();

        let result = context.step(1000);
        assert!(matches!(result, Err(EngineError::Unstable { .. })));
    }
}

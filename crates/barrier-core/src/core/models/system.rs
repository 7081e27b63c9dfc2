use super::ids::ParticleId;
use super::particle::Particle;
use crate::core::forcefield::external::ExternalForce;
use slotmap::SlotMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Particle mass must be positive and finite, got {mass}")]
    InvalidMass { mass: f64 },

    #[error("Force references a particle that is not part of the system: {id:?}")]
    UnknownParticle { id: ParticleId },
}

/// The particles of a simulation and the external forces acting on them.
///
/// Particles never interact with each other; every force term is a function of a single
/// particle position. Iteration order is insertion order, which the simulation context
/// uses as the dense index of each particle.
#[derive(Debug, Clone, Default)]
pub struct System {
    particles: SlotMap<ParticleId, Particle>,
    forces: Vec<ExternalForce>,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a particle of the given mass (amu).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidMass`] if `mass` is not positive and finite.
    pub fn add_particle(&mut self, mass: f64) -> Result<ParticleId, ModelError> {
        self.insert_particle(Particle::new(mass))
    }

    pub fn insert_particle(&mut self, particle: Particle) -> Result<ParticleId, ModelError> {
        if !(particle.mass.is_finite() && particle.mass > 0.0) {
            return Err(ModelError::InvalidMass {
                mass: particle.mass,
            });
        }
        Ok(self.particles.insert(particle))
    }

    /// Registers a force and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownParticle`] if the force references a particle that
    /// has not been added to this system.
    pub fn add_force(&mut self, force: ExternalForce) -> Result<usize, ModelError> {
        if let Some(&id) = force
            .particles()
            .iter()
            .find(|&&id| !self.particles.contains_key(id))
        {
            return Err(ModelError::UnknownParticle { id });
        }
        self.forces.push(force);
        Ok(self.forces.len() - 1)
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id)
    }

    pub fn particle_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.particles.get_mut(id)
    }

    pub fn particles_iter(&self) -> impl Iterator<Item = (ParticleId, &Particle)> {
        self.particles.iter()
    }

    pub fn particle_ids(&self) -> impl Iterator<Item = ParticleId> + '_ {
        self.particles.keys()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn masses(&self) -> Vec<f64> {
        self.particles.values().map(|p| p.mass).collect()
    }

    pub fn forces(&self) -> &[ExternalForce] {
        &self.forces
    }

    /// Translational degrees of freedom; no constraints are supported.
    pub fn degrees_of_freedom(&self) -> usize {
        3 * self.particles.len()
    }
}

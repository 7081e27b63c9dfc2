use crate::core::models::ids::ParticleId;
use nalgebra::{Point3, Vector3};
use std::fmt;
use std::sync::Arc;

/// A potential that depends only on the position of a single particle.
///
/// Implementors supply the energy and its gradient; the force is derived from the
/// gradient unless overridden.
pub trait ExternalPotential: Send + Sync + fmt::Debug {
    fn energy(&self, position: &Point3<f64>) -> f64;

    fn gradient(&self, position: &Point3<f64>) -> Vector3<f64>;

    #[inline]
    fn force(&self, position: &Point3<f64>) -> Vector3<f64> {
        -self.gradient(position)
    }

    /// Energy and force in one call, for implementors that can share intermediate terms.
    #[inline]
    fn energy_and_force(&self, position: &Point3<f64>) -> (f64, Vector3<f64>) {
        (self.energy(position), self.force(position))
    }
}

/// Binds an [`ExternalPotential`] to the particles it acts on.
#[derive(Clone)]
pub struct ExternalForce {
    potential: Arc<dyn ExternalPotential>,
    particles: Vec<ParticleId>,
}

impl ExternalForce {
    pub fn new(potential: Arc<dyn ExternalPotential>) -> Self {
        Self {
            potential,
            particles: Vec::new(),
        }
    }

    /// Registers a particle with this force. Returns the index of the particle within
    /// the force; adding the same particle twice is a no-op.
    pub fn add_particle(&mut self, id: ParticleId) -> usize {
        if let Some(index) = self.particles.iter().position(|&p| p == id) {
            return index;
        }
        self.particles.push(id);
        self.particles.len() - 1
    }

    pub fn particles(&self) -> &[ParticleId] {
        &self.particles
    }

    pub fn potential(&self) -> &Arc<dyn ExternalPotential> {
        &self.potential
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }
}

impl fmt::Debug for ExternalForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalForce")
            .field("potential", &self.potential)
            .field("particles", &self.particles.len())
            .finish()
    }
}

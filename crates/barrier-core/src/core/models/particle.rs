/// A point particle. Only the mass is intrinsic; positions and velocities belong to the
/// simulation context that propagates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Mass in amu.
    pub mass: f64,
    pub label: Option<String>,
}

impl Particle {
    pub fn new(mass: f64) -> Self {
        Self { mass, label: None }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[inline]
    pub fn inverse_mass(&self) -> f64 {
        1.0 / self.mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_particle_has_no_label() {
        let particle = Particle::new(2.0);
        assert_eq!(particle.mass, 2.0);
        assert!(particle.label.is_none());
        assert_eq!(particle.inverse_mass(), 0.5);
    }

    #[test]
    fn with_label_sets_label() {
        let particle = Particle::new(1.0).with_label("walker-7");
        assert_eq!(particle.label.as_deref(), Some("walker-7"));
    }
}

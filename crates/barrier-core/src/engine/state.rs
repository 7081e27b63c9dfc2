use crate::core::analysis::instantaneous_temperature;
use crate::core::models::trajectory::Frame;
use nalgebra::{Point3, Vector3};

/// A snapshot of a simulation context.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub step: u64,
    /// Simulated time in ps.
    pub time: f64,
    pub positions: Vec<Point3<f64>>,
    pub velocities: Vec<Vector3<f64>>,
    pub forces: Vec<Vector3<f64>>,
    /// kJ/mol.
    pub potential_energy: f64,
    /// kJ/mol.
    pub kinetic_energy: f64,
}

impl State {
    pub fn total_energy(&self) -> f64 {
        self.potential_energy + self.kinetic_energy
    }

    pub fn degrees_of_freedom(&self) -> usize {
        3 * self.positions.len()
    }

    pub fn temperature(&self) -> f64 {
        instantaneous_temperature(self.kinetic_energy, self.degrees_of_freedom())
    }

    pub fn to_frame(&self) -> Frame {
        Frame {
            step: self.step,
            time: self.time,
            positions: self.positions.clone(),
        }
    }
}

impl From<State> for Frame {
    fn from(state: State) -> Self {
        Frame {
            step: state.step,
            time: state.time,
            positions: state.positions,
        }
    }
}

use crate::core::models::trajectory::{Frame, Trajectory};
use crate::core::units::BOLTZMANN_KJ_PER_MOL_K;
use nalgebra::Vector3;

/// Region of the x axis delimited by the two barrier centres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Basin {
    Left,
    Central,
    Right,
}

impl Basin {
    /// Classifies `x` against barrier centres `(lower, upper)`. Points exactly on a
    /// barrier centre count as central.
    #[inline]
    pub fn classify(x: f64, barriers: (f64, f64)) -> Self {
        if x < barriers.0 {
            Basin::Left
        } else if x > barriers.1 {
            Basin::Right
        } else {
            Basin::Central
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasinOccupancy {
    pub left: usize,
    pub central: usize,
    pub right: usize,
}

impl BasinOccupancy {
    pub fn total(&self) -> usize {
        self.left + self.central + self.right
    }

    pub fn count(&self, basin: Basin) -> usize {
        match basin {
            Basin::Left => self.left,
            Basin::Central => self.central,
            Basin::Right => self.right,
        }
    }

    pub fn fraction(&self, basin: Basin) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.count(basin) as f64 / total as f64
        }
    }

    fn record(&mut self, basin: Basin) {
        match basin {
            Basin::Left => self.left += 1,
            Basin::Central => self.central += 1,
            Basin::Right => self.right += 1,
        }
    }
}

pub fn basin_occupancy(frame: &Frame, barriers: (f64, f64)) -> BasinOccupancy {
    let mut occupancy = BasinOccupancy::default();
    for p in &frame.positions {
        occupancy.record(Basin::classify(p.x, barriers));
    }
    occupancy
}

/// Counts basin changes between consecutive frames, summed over particles.
///
/// Jumping from the left basin straight to the right one between two samples counts as
/// two crossings. Particles missing from either frame are skipped.
pub fn count_barrier_crossings(trajectory: &Trajectory, barriers: (f64, f64)) -> usize {
    trajectory
        .frames()
        .windows(2)
        .map(|pair| {
            pair[0]
                .positions
                .iter()
                .zip(&pair[1].positions)
                .map(|(a, b)| {
                    let from = Basin::classify(a.x, barriers);
                    let to = Basin::classify(b.x, barriers);
                    match (from, to) {
                        (Basin::Left, Basin::Right) | (Basin::Right, Basin::Left) => 2,
                        (f, t) if f != t => 1,
                        _ => 0,
                    }
                })
                .sum::<usize>()
        })
        .sum()
}

pub fn kinetic_energy(velocities: &[Vector3<f64>], masses: &[f64]) -> f64 {
    velocities
        .iter()
        .zip(masses)
        .map(|(v, &m)| 0.5 * m * v.norm_squared())
        .sum()
}

/// Instantaneous temperature `2·KE / (dof·kB)` in K; zero when there are no degrees
/// of freedom.
pub fn instantaneous_temperature(kinetic_energy: f64, degrees_of_freedom: usize) -> f64 {
    if degrees_of_freedom == 0 {
        return 0.0;
    }
    2.0 * kinetic_energy / (degrees_of_freedom as f64 * BOLTZMANN_KJ_PER_MOL_K)
}

use crate::core::forcefield::external::ExternalPotential;
use crate::core::models::ids::ParticleId;
use crate::core::models::system::System;
use nalgebra::{Point3, Vector3};
use slotmap::SecondaryMap;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// An external force resolved against the dense particle ordering of a context.
#[derive(Debug, Clone)]
struct BoundForce {
    potential: Arc<dyn ExternalPotential>,
    indices: Vec<usize>,
}

/// Evaluates every registered external force for a full set of positions.
#[derive(Debug, Clone)]
pub(crate) struct ForceEvaluator {
    terms: Vec<BoundForce>,
}

impl ForceEvaluator {
    pub(crate) fn from_system(system: &System, index_of: &SecondaryMap<ParticleId, usize>) -> Self {
        let terms = system
            .forces()
            .iter()
            .map(|force| BoundForce {
                potential: Arc::clone(force.potential()),
                indices: force
                    .particles()
                    .iter()
                    .filter_map(|&id| index_of.get(id).copied())
                    .collect(),
            })
            .collect();
        Self { terms }
    }

    /// Overwrites `forces` and returns the total potential energy.
    pub(crate) fn evaluate(&self, positions: &[Point3<f64>], forces: &mut [Vector3<f64>]) -> f64 {
        forces.iter_mut().for_each(|f| *f = Vector3::zeros());
        let mut energy = 0.0;

        for term in &self.terms {
            let potential = term.potential.as_ref();
            let evaluate = |&i: &usize| {
                let (e, f) = potential.energy_and_force(&positions[i]);
                (i, e, f)
            };

            #[cfg(feature = "parallel")]
            let contributions: Vec<(usize, f64, Vector3<f64>)> =
                term.indices.par_iter().map(evaluate).collect();
            #[cfg(not(feature = "parallel"))]
            let contributions: Vec<(usize, f64, Vector3<f64>)> =
                term.indices.iter().map(evaluate).collect();

            for (i, e, f) in contributions {
                energy += e;
                forces[i] += f;
            }
        }
        energy
    }

    /// Potential energy only, without touching any force buffer.
    pub(crate) fn energy(&self, positions: &[Point3<f64>]) -> f64 {
        self.terms
            .iter()
            .map(|term| {
                term.indices
                    .iter()
                    .map(|&i| term.potential.energy(&positions[i]))
                    .sum::<f64>()
            })
            .sum()
    }
}

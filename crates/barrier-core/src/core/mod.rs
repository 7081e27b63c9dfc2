//! # Core Module
//!
//! Stateless building blocks shared by the engine and the workflows.
//!
//! - **Units** ([`units`]) - Physical constants in the nm / ps / amu / kJ·mol⁻¹ system
//! - **Potentials** ([`forcefield`]) - The two-barrier surface and the external-force mechanism
//! - **Models** ([`models`]) - Particles, systems and sampled trajectories
//! - **Plot Data** ([`io`]) - Contour grids and CSV export for external plotting tools
//! - **Analysis** ([`analysis`]) - Basin occupancy, barrier crossings and temperature

pub mod analysis;
pub mod forcefield;
pub mod io;
pub mod models;
pub mod units;

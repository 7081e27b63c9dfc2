//! # Workflows Module
//!
//! High-level entry points that run a complete procedure from a configuration.
//!
//! - [`simulate`] - Langevin dynamics of independent particles on the two-barrier surface,
//!   sampled periodically into a [`crate::core::models::trajectory::Trajectory`]

pub mod simulate;

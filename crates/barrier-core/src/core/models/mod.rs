//! # Models Module
//!
//! Data structures describing what is simulated and what was sampled.
//!
//! - [`ids`] - Slot-map keys identifying particles
//! - [`particle`] - A massive point particle
//! - [`system`] - The particle set plus the external forces acting on it
//! - [`trajectory`] - Periodically sampled position snapshots

pub mod ids;
pub mod particle;
pub mod system;
pub mod trajectory;

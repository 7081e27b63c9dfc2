//! # Force Field Module
//!
//! The analytic potential energy surface and the generic mechanism used to attach it
//! to particles.
//!
//! ## Key Components
//!
//! - [`params`] - Coefficients of the two-barrier surface, loadable from TOML
//! - [`surface`] - Closed-form energy and analytic gradient of the surface
//! - [`external`] - The [`external::ExternalPotential`] trait and [`external::ExternalForce`],
//!   which binds a position-only potential to a set of particles
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use barriermd::core::forcefield::{external::ExternalForce, surface::TwoBarrierSurface};
//!
//! let surface = Arc::new(TwoBarrierSurface::default());
//! let mut force = ExternalForce::new(surface);
//! force.add_particle(particle_id);
//! ```

pub mod external;
pub mod params;
pub mod surface;

//! # barriermd Core Library
//!
//! Langevin dynamics of independent point particles on a hand-authored
//! two-dimensional potential energy surface with two barriers.
//!
//! ## Architecture
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless pieces: physical units, the analytic
//!   surface and the external-force mechanism it plugs into, particle/system models,
//!   plot-data export and trajectory analysis.
//!
//! - **[`engine`]: The Propagation Backend.** The stateful side: configuration, the
//!   Langevin integrator, the simulation `Context` that owns positions and velocities,
//!   state snapshots and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together into a
//!   complete run: surface definition, system assembly, integration with periodic
//!   sampling, and a summary of what the particles did.

pub mod core;
pub mod engine;
pub mod workflows;

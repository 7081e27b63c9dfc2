//! # Engine Module
//!
//! The propagation backend: everything that carries state while particles move.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Run parameters and their validating builder
//! - **Force Evaluation** ([`forces`]) - Binds registered external forces to dense particle indices
//! - **Integration** ([`integrator`]) - BAOAB Langevin integrator
//! - **Simulation Context** ([`context`]) - Owns positions, velocities and forces of a system
//! - **State Snapshots** ([`state`]) - Read-only copies of the context at one step
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod config;
pub mod context;
pub mod error;
pub(crate) mod forces;
pub mod integrator;
pub mod progress;
pub mod state;

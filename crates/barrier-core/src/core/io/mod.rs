//! # Plot Data Module
//!
//! Produces the data a contour/scatter plot of a run needs, without rendering it:
//! the potential sampled on a regular grid and the sampled particle positions, both
//! exported as CSV for external plotting tools.

pub mod export;
pub mod grid;

use super::config::ConfigError;
use crate::core::forcefield::params::ParamLoadError;
use crate::core::io::export::ExportError;
use crate::core::models::system::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("System assembly failed: {source}")]
    Model {
        #[from]
        source: ModelError,
    },

    #[error("Failed to load surface parameters: {source}")]
    Parameters {
        #[from]
        source: ParamLoadError,
    },

    #[error("Expected {expected} values (one per particle), got {actual}")]
    ParticleCountMismatch { expected: usize, actual: usize },

    #[error("Invalid integrator parameter '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },

    #[error("Simulation became unstable at step {step}: non-finite coordinates")]
    Unstable { step: u64 },

    #[error("Export failed: {source}")]
    Export {
        #[from]
        source: ExportError,
    },
}

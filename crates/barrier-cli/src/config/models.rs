use barriermd::core::io::grid::GridSpec;
use barriermd::engine::config as core_config;
use std::path::PathBuf;

pub struct AppConfig {
    pub output_dir: PathBuf,
    /// `None` when contour data should not be written.
    pub grid: Option<GridSpec>,
    pub core_config: core_config::SimulationConfig,
}
